//! Defines the core data models for transactions and the validation of
//! transaction request bodies.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::DatabaseId,
    input::{NumberOrText, is_blank, parse_date},
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was spent.
    #[default]
    Expense,
    /// Money that was earned.
    Income,
}

impl TransactionType {
    /// The name used in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(Error::InvalidField {
                field: "type",
                reason: format!("\"{other}\" is not one of \"expense\" or \"income\""),
            }),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    #[serde(rename = "_id")]
    pub id: DatabaseId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The name of the category the transaction belongs to.
    pub category: String,
    /// Whether this is an expense or an income.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str, category: &str) -> NewTransaction {
        NewTransaction {
            amount,
            date,
            description: description.to_owned(),
            category: category.to_owned(),
            kind: TransactionType::Expense,
        }
    }

    /// Whether this transaction is an expense.
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Whether this transaction is an income.
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }
}

/// A validated transaction that has not been stored yet.
///
/// The store assigns the ID and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction was for.
    pub description: String,
    /// The name of the category, e.g. "Food & Dining".
    pub category: String,
    /// Whether this is an expense or an income.
    pub kind: TransactionType,
}

impl NewTransaction {
    /// Set the transaction type.
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = kind;
        self
    }

    /// Attach the store-assigned fields.
    pub fn into_transaction(self, id: DatabaseId, now: OffsetDateTime) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            category: self.category,
            kind: self.kind,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changes to apply to an existing transaction, `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    /// The new amount.
    pub amount: Option<f64>,
    /// The new date.
    pub date: Option<Date>,
    /// The new description.
    pub description: Option<String>,
    /// The new category name.
    pub category: Option<String>,
    /// The new transaction type.
    pub kind: Option<TransactionType>,
}

impl TransactionUpdate {
    /// Apply the changes to `transaction` and bump its update time.
    pub fn apply(self, transaction: &mut Transaction, now: OffsetDateTime) {
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(description) = self.description {
            transaction.description = description;
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
        transaction.updated_at = now;
    }
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

/// The JSON body for creating or updating a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPayload {
    /// The amount as a number or numeric text.
    pub amount: Option<NumberOrText>,
    /// The date as `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: Option<String>,
    /// What the transaction was for.
    pub description: Option<String>,
    /// The category name.
    pub category: Option<String>,
    /// "expense" or "income", defaults to "expense" on creation.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TransactionPayload {
    /// Validate the body of a create request.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if the amount, date, description or
    /// category is absent or empty, or [Error::InvalidField] if a value cannot
    /// be parsed.
    pub fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let (Some(amount), Some(date), Some(description), Some(category)) =
            (self.amount, self.date, self.description, self.category)
        else {
            return Err(Error::MissingFields);
        };

        if amount.is_blank()
            || is_blank(Some(&date))
            || is_blank(Some(&description))
            || is_blank(Some(&category))
        {
            return Err(Error::MissingFields);
        }

        let kind = match self.kind.as_deref() {
            Some(kind) if !kind.trim().is_empty() => kind.parse()?,
            _ => TransactionType::default(),
        };

        Ok(NewTransaction {
            amount: amount.to_f64("amount")?,
            date: parse_date(&date, "date")?,
            description,
            category,
            kind,
        })
    }

    /// Validate the body of an update request.
    ///
    /// Absent fields are left unchanged.
    ///
    /// # Errors
    /// Returns [Error::InvalidField] if a present value cannot be parsed.
    pub fn into_update(self) -> Result<TransactionUpdate, Error> {
        Ok(TransactionUpdate {
            amount: self
                .amount
                .map(|amount| amount.to_f64("amount"))
                .transpose()?,
            date: self
                .date
                .map(|date| parse_date(&date, "date"))
                .transpose()?,
            description: self.description,
            category: self.category,
            kind: self.kind.map(|kind| kind.parse()).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        input::NumberOrText,
        transaction::{Transaction, TransactionType},
    };

    use super::{TransactionPayload, TransactionUpdate};

    fn full_payload() -> TransactionPayload {
        TransactionPayload {
            amount: Some(NumberOrText::Number(25.99)),
            date: Some("2024-12-15".to_owned()),
            description: Some("Lunch at restaurant".to_owned()),
            category: Some("Food & Dining".to_owned()),
            kind: None,
        }
    }

    #[test]
    fn payload_defaults_to_expense() {
        let transaction = full_payload().into_new_transaction().unwrap();

        assert_eq!(
            transaction,
            Transaction::build(
                25.99,
                date!(2024 - 12 - 15),
                "Lunch at restaurant",
                "Food & Dining"
            )
        );
    }

    #[test]
    fn payload_accepts_text_amount_and_income() {
        let payload = TransactionPayload {
            amount: Some(NumberOrText::Text("3000".to_owned())),
            kind: Some("income".to_owned()),
            ..full_payload()
        };

        let transaction = payload.into_new_transaction().unwrap();

        assert_eq!(transaction.amount, 3000.0);
        assert_eq!(transaction.kind, TransactionType::Income);
    }

    #[test]
    fn payload_missing_any_required_field_is_rejected() {
        let payloads = [
            TransactionPayload {
                amount: None,
                ..full_payload()
            },
            TransactionPayload {
                date: Some(String::new()),
                ..full_payload()
            },
            TransactionPayload {
                description: None,
                ..full_payload()
            },
            TransactionPayload {
                category: Some("   ".to_owned()),
                ..full_payload()
            },
            TransactionPayload {
                amount: Some(NumberOrText::Number(0.0)),
                ..full_payload()
            },
        ];

        for payload in payloads {
            assert_eq!(payload.into_new_transaction(), Err(Error::MissingFields));
        }
    }

    #[test]
    fn payload_with_unknown_type_is_invalid() {
        let payload = TransactionPayload {
            kind: Some("transfer".to_owned()),
            ..full_payload()
        };

        assert!(matches!(
            payload.into_new_transaction(),
            Err(Error::InvalidField { field: "type", .. })
        ));
    }

    #[test]
    fn update_only_touches_present_fields() {
        let created = datetime!(2024-12-15 10:00 UTC);
        let updated = datetime!(2024-12-16 10:00 UTC);
        let mut transaction = Transaction::build(
            25.99,
            date!(2024 - 12 - 15),
            "Lunch at restaurant",
            "Food & Dining",
        )
        .into_transaction(1, created);

        TransactionUpdate {
            amount: Some(30.0),
            ..Default::default()
        }
        .apply(&mut transaction, updated);

        assert_eq!(transaction.amount, 30.0);
        assert_eq!(transaction.description, "Lunch at restaurant");
        assert_eq!(transaction.created_at, created);
        assert_eq!(transaction.updated_at, updated);
    }

    #[test]
    fn serializes_with_document_field_names() {
        let transaction = Transaction::build(
            45.0,
            date!(2024 - 12 - 08),
            "Gas for car",
            "Transportation",
        )
        .into_transaction(4, datetime!(2024-12-08 09:15 UTC));

        let value = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            value,
            json!({
                "_id": 4,
                "amount": 45.0,
                "date": "2024-12-08",
                "description": "Gas for car",
                "category": "Transportation",
                "type": "expense",
                "createdAt": "2024-12-08T09:15:00Z",
                "updatedAt": "2024-12-08T09:15:00Z"
            })
        );
    }
}
