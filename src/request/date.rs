//! Report date ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Serialize, Serializer};

use crate::error::{ReportError, ReportResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One end of a date range.
///
/// The service accepts calendar dates as well as the relative forms
/// `today`, `yesterday` and `NdaysAgo`, which it evaluates in the
/// property's time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateSpec {
    Date(NaiveDate),
    Today,
    Yesterday,
    DaysAgo(u32),
}

impl DateSpec {
    /// The calendar date this spec denotes when "today" is `today`.
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        let back = |n: u32| {
            today
                .checked_sub_days(Days::new(n.into()))
                .unwrap_or(NaiveDate::MIN)
        };
        match self {
            DateSpec::Date(date) => *date,
            DateSpec::Today => today,
            DateSpec::Yesterday => back(1),
            DateSpec::DaysAgo(n) => back(*n),
        }
    }

    pub fn is_relative(&self) -> bool {
        !matches!(self, DateSpec::Date(_))
    }
}

impl fmt::Display for DateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSpec::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            DateSpec::Today => f.write_str("today"),
            DateSpec::Yesterday => f.write_str("yesterday"),
            DateSpec::DaysAgo(n) => write!(f, "{n}daysAgo"),
        }
    }
}

impl FromStr for DateSpec {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "today" => return Ok(DateSpec::Today),
            "yesterday" => return Ok(DateSpec::Yesterday),
            _ => {}
        }

        if let Some(count) = s.strip_suffix("daysAgo") {
            return count.parse().map(DateSpec::DaysAgo).map_err(|_| {
                ReportError::InvalidDateRange(format!("'{s}' is not a valid relative date"))
            });
        }

        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(DateSpec::Date)
            .map_err(|_| {
                ReportError::InvalidDateRange(format!(
                    "'{s}' is not a date in YYYY-MM-DD form"
                ))
            })
    }
}

impl From<NaiveDate> for DateSpec {
    fn from(date: NaiveDate) -> Self {
        DateSpec::Date(date)
    }
}

impl Serialize for DateSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(rename = "startDate")]
    pub start: DateSpec,
    #[serde(rename = "endDate")]
    pub end: DateSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DateRange {
    /// Parse a range from its two ends. Ordering is checked when the request
    /// is built, not here.
    pub fn new(start: &str, end: &str) -> ReportResult<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
            name: None,
        })
    }

    /// A range between two calendar dates.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: DateSpec::Date(start),
            end: DateSpec::Date(end),
            name: None,
        }
    }

    /// Name the range; the service labels rows with it when several ranges
    /// are requested.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check that the range does not end before it starts.
    ///
    /// `today` is only an approximation of the property's own day, which can
    /// be one day either side of it. When exactly one end is relative the
    /// check allows that day of slack; when both are relative they shift
    /// together and compare exactly.
    pub fn validate(&self, today: NaiveDate) -> ReportResult<()> {
        let start = self.start.resolve(today);
        let end = self.end.resolve(today);
        let slack = if self.start.is_relative() != self.end.is_relative() {
            Days::new(1)
        } else {
            Days::new(0)
        };
        if end.checked_add_days(slack).is_some_and(|latest| start > latest) {
            return Err(ReportError::InvalidDateRange(format!(
                "end date {} is before start date {}",
                self.end, self.start
            )));
        }
        Ok(())
    }
}
