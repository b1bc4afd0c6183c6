//! Calendar months used to bucket transactions and match budgets.

use std::cmp::Ordering;

use time::{Date, Month};

use crate::budget::BudgetMonth;

/// A month of a specific year, e.g. October 2026.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthOfYear {
    year: i32,
    month: Month,
}

impl Ord for MonthOfYear {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, u8::from(self.month)).cmp(&(other.year, u8::from(other.month)))
    }
}

impl PartialOrd for MonthOfYear {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl MonthOfYear {
    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month before this one.
    pub fn previous(self) -> Self {
        let year = if self.month == Month::January {
            self.year - 1
        } else {
            self.year
        };

        Self {
            year,
            month: self.month.previous(),
        }
    }

    /// The month `count` months before this one.
    pub fn months_back(self, count: u32) -> Self {
        (0..count).fold(self, |month, _| month.previous())
    }

    /// The year of this month.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month as it is written on a budget, e.g. "07".
    pub fn budget_month(&self) -> BudgetMonth {
        BudgetMonth::from(self.month)
    }

    /// Full month name and year, e.g. "October 2026".
    pub fn long_label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }

    /// Abbreviated month name and year, e.g. "Oct 2026".
    pub fn short_label(&self) -> String {
        let name = self.month.to_string();
        format!("{} {}", &name[..3], self.year)
    }
}
