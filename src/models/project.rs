use std::fmt;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A project row. `id` stays `None` until the record has been committed
/// through a [`crate::db::ProjectStore`].
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: Option<i32>,
    pub name: String,
    pub sector: String,
    pub budget: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Project {
    pub const NAME_MAX_LENGTH: usize = 200;
    pub const SECTOR_MAX_LENGTH: usize = 100;
    pub const BUDGET_MAX_DIGITS: u64 = 15;
    pub const BUDGET_DECIMAL_PLACES: u64 = 2;

    pub fn new(
        name: impl Into<String>,
        sector: impl Into<String>,
        budget: BigDecimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            sector: sector.into(),
            budget,
            start_date,
            end_date,
        }
    }

    /// Human readable label, identical to `name`.
    pub fn label(&self) -> &str {
        &self.name
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
