//! Lenient parsing of request body values.
//!
//! Clients submit numbers either as JSON numbers or as the text typed into a
//! form field, and dates either as a calendar date or a full timestamp.

use serde::Deserialize;
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::Error;

/// A numeric request field that may arrive as a number or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    /// A JSON number.
    Number(f64),
    /// A string holding a number, e.g. "12.50".
    Text(String),
}

impl NumberOrText {
    /// Whether the value counts as absent: zero or an empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            NumberOrText::Number(number) => *number == 0.0 || number.is_nan(),
            NumberOrText::Text(text) => text.trim().is_empty(),
        }
    }

    /// Read the value as a finite decimal number.
    pub fn to_f64(&self, field: &'static str) -> Result<f64, Error> {
        let number = match self {
            NumberOrText::Number(number) => *number,
            NumberOrText::Text(text) => text.trim().parse::<f64>().map_err(|_| Error::InvalidField {
                field,
                reason: format!("\"{text}\" is not a number"),
            })?,
        };

        if number.is_finite() {
            Ok(number)
        } else {
            Err(Error::InvalidField {
                field,
                reason: "must be a finite number".to_owned(),
            })
        }
    }

    /// Read the value as a whole number.
    pub fn to_i32(&self, field: &'static str) -> Result<i32, Error> {
        let invalid = || Error::InvalidField {
            field,
            reason: "must be a whole number".to_owned(),
        };

        match self {
            NumberOrText::Number(number) => {
                if number.fract() == 0.0 && *number >= i32::MIN as f64 && *number <= i32::MAX as f64
                {
                    Ok(*number as i32)
                } else {
                    Err(invalid())
                }
            }
            NumberOrText::Text(text) => text.trim().parse::<i32>().map_err(|_| invalid()),
        }
    }
}

/// Whether an optional text field is absent or empty.
pub fn is_blank(text: Option<&str>) -> bool {
    text.is_none_or(|text| text.trim().is_empty())
}

/// Parse a date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// Only the calendar date of a timestamp is kept.
pub fn parse_date(text: &str, field: &'static str) -> Result<Date, Error> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }

    OffsetDateTime::parse(text, &Rfc3339)
        .map(|timestamp| timestamp.date())
        .map_err(|_| Error::InvalidField {
            field,
            reason: format!("\"{text}\" is not a date, expected YYYY-MM-DD"),
        })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::{NumberOrText, is_blank, parse_date};

    #[test]
    fn numbers_and_numeric_text_both_parse() {
        assert_eq!(NumberOrText::Number(12.5).to_f64("amount"), Ok(12.5));
        assert_eq!(
            NumberOrText::Text(" 89.50 ".to_owned()).to_f64("amount"),
            Ok(89.5)
        );
    }

    #[test]
    fn non_numeric_text_is_invalid() {
        let result = NumberOrText::Text("lots".to_owned()).to_f64("amount");

        assert!(matches!(
            result,
            Err(Error::InvalidField {
                field: "amount",
                ..
            })
        ));
    }

    #[test]
    fn zero_and_empty_text_are_blank() {
        assert!(NumberOrText::Number(0.0).is_blank());
        assert!(NumberOrText::Text("".to_owned()).is_blank());
        assert!(!NumberOrText::Number(0.01).is_blank());
    }

    #[test]
    fn year_must_be_whole() {
        assert_eq!(NumberOrText::Number(2025.0).to_i32("year"), Ok(2025));
        assert_eq!(NumberOrText::Text("2025".to_owned()).to_i32("year"), Ok(2025));
        assert!(NumberOrText::Number(2025.5).to_i32("year").is_err());
    }

    #[test]
    fn blank_text() {
        assert!(is_blank(None));
        assert!(is_blank(Some("  ")));
        assert!(!is_blank(Some("Lunch")));
    }

    #[test]
    fn parses_calendar_dates_and_timestamps() {
        assert_eq!(parse_date("2024-12-15", "date"), Ok(date!(2024 - 12 - 15)));
        assert_eq!(
            parse_date("2024-12-15T08:30:00.000Z", "date"),
            Ok(date!(2024 - 12 - 15))
        );
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_date("15/12/2024", "date").is_err());
        assert!(parse_date("2024-02-30", "date").is_err());
    }
}
