use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Completion-state filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::All,
        StatusFilter::Active,
        StatusFilter::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }

    /// Next filter in tab order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Due-date range filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailFilter {
    #[default]
    All,
    Today,
    NextDay,
    Overdue,
    NextWeek,
    NextMonth,
}

impl DetailFilter {
    pub const ALL: [DetailFilter; 6] = [
        DetailFilter::All,
        DetailFilter::Today,
        DetailFilter::NextDay,
        DetailFilter::Overdue,
        DetailFilter::NextWeek,
        DetailFilter::NextMonth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DetailFilter::All => "all",
            DetailFilter::Today => "today",
            DetailFilter::NextDay => "nextday",
            DetailFilter::Overdue => "overdue",
            DetailFilter::NextWeek => "nextweek",
            DetailFilter::NextMonth => "nextmonth",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailFilter::All => "Any date",
            DetailFilter::Today => "Today",
            DetailFilter::NextDay => "Next day",
            DetailFilter::Overdue => "Overdue",
            DetailFilter::NextWeek => "Next week",
            DetailFilter::NextMonth => "Next month",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Error for unrecognized filter names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} filter '{value}' (expected one of: {expected})")]
pub struct ParseFilterError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl FromStr for StatusFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| ParseFilterError {
                kind: "status",
                value: s.to_string(),
                expected: Self::ALL.map(|f| f.as_str()).join(", "),
            })
    }
}

impl FromStr for DetailFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| ParseFilterError {
                kind: "due",
                value: s.to_string(),
                expected: Self::ALL.map(|f| f.as_str()).join(", "),
            })
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DetailFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full set of view parameters the projector takes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilters {
    pub status: StatusFilter,
    /// Free-text keyword, matched case-insensitively
    pub search: String,
    pub detail: DetailFilter,
}

impl ViewFilters {
    /// True when any filter narrows the list
    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All
            || !self.search.is_empty()
            || self.detail != DetailFilter::All
    }
}
