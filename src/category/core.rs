//! Defines the category model and the list of categories every new store starts with.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    input::{NumberOrText, is_blank},
};

/// The display color of categories without a color of their own.
pub const FALLBACK_COLOR: &str = "#AED6F1";

/// The categories a new store is seeded with, as (name, color) pairs.
pub const PREDEFINED_CATEGORIES: [(&str, &str); 10] = [
    ("Food & Dining", "#FF6B6B"),
    ("Transportation", "#4ECDC4"),
    ("Shopping", "#45B7D1"),
    ("Entertainment", "#96CEB4"),
    ("Bills & Utilities", "#FFEAA7"),
    ("Healthcare", "#DDA0DD"),
    ("Education", "#98D8C8"),
    ("Travel", "#F7DC6F"),
    ("Investment", "#BB8FCE"),
    ("Other", FALLBACK_COLOR),
];

/// The predefined categories, ready to be stored.
pub fn predefined_categories() -> Vec<NewCategory> {
    PREDEFINED_CATEGORIES
        .iter()
        .map(|(name, color)| NewCategory {
            name: (*name).to_owned(),
            color: (*color).to_owned(),
            budget: None,
        })
        .collect()
}

/// The display color for the category `name`.
///
/// Only the predefined categories have a known color, everything else gets
/// [FALLBACK_COLOR].
pub fn category_color(name: &str) -> &'static str {
    PREDEFINED_CATEGORIES
        .iter()
        .find(|(predefined, _)| *predefined == name)
        .map_or(FALLBACK_COLOR, |(_, color)| color)
}

/// A named, colored grouping for transactions and budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    #[serde(rename = "_id")]
    pub id: DatabaseId,
    /// The name of the category, e.g. "Travel".
    pub name: String,
    /// The display color as a CSS hex color.
    pub color: String,
    /// A default monthly budget for the category.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub budget: Option<f64>,
}

/// A category that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The name of the category.
    pub name: String,
    /// The display color as a CSS hex color.
    pub color: String,
    /// A default monthly budget for the category.
    pub budget: Option<f64>,
}

impl NewCategory {
    /// Attach the store-assigned ID.
    pub fn into_category(self, id: DatabaseId) -> Category {
        Category {
            id,
            name: self.name,
            color: self.color,
            budget: self.budget,
        }
    }
}

/// Changes to apply to an existing category, `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    /// The new name.
    pub name: Option<String>,
    /// The new color.
    pub color: Option<String>,
    /// The new default budget.
    pub budget: Option<f64>,
}

impl CategoryUpdate {
    /// Apply the changes to `category`.
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(budget) = self.budget {
            category.budget = Some(budget);
        }
    }
}

/// The JSON body for creating or updating a category.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    /// The name of the category.
    pub name: Option<String>,
    /// The display color, defaults to [FALLBACK_COLOR] on creation.
    pub color: Option<String>,
    /// A default monthly budget as a number or numeric text.
    pub budget: Option<NumberOrText>,
}

impl CategoryPayload {
    /// Validate the body of a create request.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if the name is absent or empty, or
    /// [Error::InvalidField] if the budget is not a number.
    pub fn into_new_category(self) -> Result<NewCategory, Error> {
        let name = match self.name {
            Some(name) if !is_blank(Some(&name)) => name,
            _ => return Err(Error::MissingFields),
        };

        let color = match self.color {
            Some(color) if !is_blank(Some(&color)) => color,
            _ => FALLBACK_COLOR.to_owned(),
        };

        Ok(NewCategory {
            name,
            color,
            budget: parse_budget(self.budget)?,
        })
    }

    /// Validate the body of an update request.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if the budget is not a number.
    pub fn into_update(self) -> Result<CategoryUpdate, Error> {
        Ok(CategoryUpdate {
            name: self.name,
            color: self.color,
            budget: parse_budget(self.budget)?,
        })
    }
}

fn parse_budget(budget: Option<NumberOrText>) -> Result<Option<f64>, Error> {
    match budget {
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(budget) => budget.to_f64("budget").map(Some),
        None => Ok(None),
    }
}
