//! Parsing of the `month` query parameter.
//!
//! Months select records by calendar month regardless of year, so "March"
//! matches sales in March 2021 and March 2022 alike.

use std::str::FromStr;

use serde::Deserialize;
use time::Month;

use crate::Error;

const MONTH_NAMES: [(&str, Month); 12] = [
    ("january", Month::January),
    ("february", Month::February),
    ("march", Month::March),
    ("april", Month::April),
    ("may", Month::May),
    ("june", Month::June),
    ("july", Month::July),
    ("august", Month::August),
    ("september", Month::September),
    ("october", Month::October),
    ("november", Month::November),
    ("december", Month::December),
];

/// A calendar month selected by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleMonth(Month);

impl SaleMonth {
    /// The month as a number between 1 and 12.
    pub fn number(self) -> u8 {
        self.0 as u8
    }

    /// The full English name of the month, e.g. "March".
    pub fn name(self) -> &'static str {
        match self.0 {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = SaleMonth> {
        MONTH_NAMES.iter().map(|&(_, month)| SaleMonth(month))
    }
}

impl Default for SaleMonth {
    fn default() -> Self {
        Self(Month::March)
    }
}

impl From<Month> for SaleMonth {
    fn from(value: Month) -> Self {
        Self(value)
    }
}

impl FromStr for SaleMonth {
    type Err = Error;

    /// Parse a month name ("March"), abbreviation ("Mar") or number ("3").
    ///
    /// Names are matched case-insensitively and surrounding whitespace is ignored.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();

        if let Ok(number) = trimmed.parse::<u8>() {
            return Month::try_from(number)
                .map(SaleMonth)
                .map_err(|_| Error::InvalidMonth(text.to_owned()));
        }

        let lowercase = trimmed.to_lowercase();

        MONTH_NAMES
            .iter()
            .find(|(name, _)| {
                *name == lowercase || (lowercase.len() == 3 && name.starts_with(&lowercase))
            })
            .map(|&(_, month)| SaleMonth(month))
            .ok_or_else(|| Error::InvalidMonth(text.to_owned()))
    }
}

/// The query parameters for the per-month reports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    /// The month to report on, e.g. "March" or "3".
    pub month: Option<String>,
}

/// Parse an optional month query parameter, treating an empty string as absent.
pub fn parse_optional_month(text: Option<&str>) -> Result<Option<SaleMonth>, Error> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some),
    }
}

/// Parse a required month query parameter.
pub fn parse_required_month(text: Option<&str>) -> Result<SaleMonth, Error> {
    parse_optional_month(text)?.ok_or(Error::MissingMonth)
}
