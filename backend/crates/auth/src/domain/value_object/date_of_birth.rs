//! Date of Birth Value Object
//!
//! Accepts ISO-8601 calendar dates (`YYYY-MM-DD`). Must lie in the past
//! and no earlier than 1900-01-01.

use chrono::{NaiveDate, Utc};
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    pub fn parse(input: &str) -> AppResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::bad_request("Date of birth is required"));
        }

        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map_err(|_| AppError::bad_request("Date of birth must be a date (YYYY-MM-DD)"))?;

        Self::new(date)
    }

    pub fn new(date: NaiveDate) -> AppResult<Self> {
        let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
        if date < earliest || date >= Utc::now().date_naive() {
            return Err(AppError::bad_request("Date of birth is out of range"));
        }
        Ok(Self(date))
    }

    pub fn from_db(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let dob = DateOfBirth::parse("2012-04-01").unwrap();
        assert_eq!(dob.to_string(), "2012-04-01");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(DateOfBirth::parse("").is_err());
        assert!(DateOfBirth::parse("01/04/2012").is_err());
        assert!(DateOfBirth::parse("2012-02-30").is_err());
        assert!(DateOfBirth::parse("1899-12-31").is_err());
    }

    #[test]
    fn test_future_rejected() {
        let tomorrow = Utc::now().date_naive() + chrono::Days::new(1);
        assert!(DateOfBirth::new(tomorrow).is_err());
    }
}
