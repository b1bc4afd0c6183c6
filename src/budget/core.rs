//! Defines the core data models for monthly budgets and the validation of
//! budget request bodies.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Month, OffsetDateTime};

use crate::{
    Error,
    database_id::DatabaseId,
    input::{NumberOrText, is_blank},
};

/// A month of the year as written on a budget, `"01"` through `"12"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BudgetMonth(u8);

impl BudgetMonth {
    /// Create a budget month from its number, 1 for January through 12 for December.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if `month` is not in 1..=12.
    pub fn new(month: u8) -> Result<Self, Error> {
        if (1..=12).contains(&month) {
            Ok(Self(month))
        } else {
            Err(Error::InvalidField {
                field: "month",
                reason: format!("{month} is not a month between 1 and 12"),
            })
        }
    }

    /// The number of the month, 1 for January.
    pub fn number(&self) -> u8 {
        self.0
    }

    fn from_input(input: &NumberOrText) -> Result<Self, Error> {
        match input {
            NumberOrText::Text(text) => text.parse(),
            number => {
                let month = number.to_i32("month")?;
                u8::try_from(month)
                    .map_err(|_| Error::InvalidField {
                        field: "month",
                        reason: format!("{month} is not a month between 1 and 12"),
                    })
                    .and_then(Self::new)
            }
        }
    }
}

impl From<Month> for BudgetMonth {
    fn from(month: Month) -> Self {
        Self(month.into())
    }
}

impl Display for BudgetMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for BudgetMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let month = s.trim().parse::<u8>().map_err(|_| Error::InvalidField {
            field: "month",
            reason: format!("\"{s}\" is not a month, expected \"01\" to \"12\""),
        })?;

        Self::new(month)
    }
}

impl Serialize for BudgetMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BudgetMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A spending limit for one category in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    #[serde(rename = "_id")]
    pub id: DatabaseId,
    /// The name of the category the budget applies to.
    pub category: String,
    /// How much may be spent.
    pub amount: f64,
    /// The month the budget applies to.
    pub month: BudgetMonth,
    /// The year the budget applies to.
    pub year: i32,
    /// When the budget was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the budget was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Budget {
    /// Create a new budget.
    ///
    /// Shortcut for [NewBudget] for discoverability.
    pub fn build(category: &str, amount: f64, month: BudgetMonth, year: i32) -> NewBudget {
        NewBudget {
            category: category.to_owned(),
            amount,
            month,
            year,
        }
    }

    /// Whether the budget applies to `month` of `year`.
    pub fn applies_to(&self, month: BudgetMonth, year: i32) -> bool {
        self.month == month && self.year == year
    }
}

/// A validated budget that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The category name.
    pub category: String,
    /// How much may be spent.
    pub amount: f64,
    /// The month the budget applies to.
    pub month: BudgetMonth,
    /// The year the budget applies to.
    pub year: i32,
}

impl NewBudget {
    /// Attach the store-assigned fields.
    pub fn into_budget(self, id: DatabaseId, now: OffsetDateTime) -> Budget {
        Budget {
            id,
            category: self.category,
            amount: self.amount,
            month: self.month,
            year: self.year,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changes to apply to an existing budget, `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetUpdate {
    /// The new category name.
    pub category: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new month.
    pub month: Option<BudgetMonth>,
    /// The new year.
    pub year: Option<i32>,
}

impl BudgetUpdate {
    /// Apply the changes to `budget` and bump its update time.
    pub fn apply(self, budget: &mut Budget, now: OffsetDateTime) {
        if let Some(category) = self.category {
            budget.category = category;
        }
        if let Some(amount) = self.amount {
            budget.amount = amount;
        }
        if let Some(month) = self.month {
            budget.month = month;
        }
        if let Some(year) = self.year {
            budget.year = year;
        }
        budget.updated_at = now;
    }
}

/// The JSON body for creating or updating a budget.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetPayload {
    /// The category name.
    pub category: Option<String>,
    /// The amount as a number or numeric text.
    pub amount: Option<NumberOrText>,
    /// The month as a number or text, e.g. 7, "7" or "07".
    pub month: Option<NumberOrText>,
    /// The year as a number or numeric text.
    pub year: Option<NumberOrText>,
}

impl BudgetPayload {
    /// Validate the body of a create request.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if the category, amount, month or year
    /// is absent or empty, or [Error::InvalidField] if a value cannot be parsed.
    pub fn into_new_budget(self) -> Result<NewBudget, Error> {
        let (Some(category), Some(amount), Some(month), Some(year)) =
            (self.category, self.amount, self.month, self.year)
        else {
            return Err(Error::MissingFields);
        };

        if is_blank(Some(&category)) || amount.is_blank() || month.is_blank() || year.is_blank() {
            return Err(Error::MissingFields);
        }

        Ok(NewBudget {
            category,
            amount: amount.to_f64("amount")?,
            month: BudgetMonth::from_input(&month)?,
            year: year.to_i32("year")?,
        })
    }

    /// Validate the body of an update request.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if a present value cannot be parsed.
    pub fn into_update(self) -> Result<BudgetUpdate, Error> {
        Ok(BudgetUpdate {
            category: self.category,
            amount: self
                .amount
                .map(|amount| amount.to_f64("amount"))
                .transpose()?,
            month: self
                .month
                .map(|month| BudgetMonth::from_input(&month))
                .transpose()?,
            year: self.year.map(|year| year.to_i32("year")).transpose()?,
        })
    }
}

/// The query string accepted when listing budgets.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetFilter {
    /// Only list budgets for this month.
    pub month: Option<String>,
    /// Only list budgets for this year.
    pub year: Option<String>,
}

impl BudgetFilter {
    /// The month and year to filter by, if both are given.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if the month or year cannot be parsed.
    pub fn month_and_year(&self) -> Result<Option<(BudgetMonth, i32)>, Error> {
        match (self.month.as_deref(), self.year.as_deref()) {
            (Some(month), Some(year)) if !is_blank(Some(month)) && !is_blank(Some(year)) => {
                let month = month.parse()?;
                let year = year.trim().parse().map_err(|_| Error::InvalidField {
                    field: "year",
                    reason: format!("\"{year}\" is not a year"),
                })?;

                Ok(Some((month, year)))
            }
            _ => Ok(None),
        }
    }
}
