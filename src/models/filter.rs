//! Selectors used to narrow the lead collection for statistics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Manager;

/// Relative time window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::All,
        Period::Week,
        Period::Month,
        Period::Quarter,
        Period::Year,
    ];

    /// Window length in days; `None` for the unbounded period.
    pub fn threshold_days(&self) -> Option<i64> {
        match self {
            Period::All => None,
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::Quarter => Some(90),
            Period::Year => Some(365),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::All => "Все время",
            Period::Week => "Неделя",
            Period::Month => "Месяц",
            Period::Quarter => "Квартал",
            Period::Year => "Год",
        }
    }
}

/// Either every manager or exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ManagerFilter {
    #[default]
    All,
    Only(Manager),
}

impl ManagerFilter {
    pub fn matches(&self, manager: Manager) -> bool {
        match self {
            ManagerFilter::All => true,
            ManagerFilter::Only(selected) => *selected == manager,
        }
    }
}

impl FromStr for ManagerFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(ManagerFilter::All);
        }
        s.parse().map(ManagerFilter::Only)
    }
}

impl TryFrom<String> for ManagerFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ManagerFilter> for String {
    fn from(filter: ManagerFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for ManagerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerFilter::All => f.write_str("all"),
            ManagerFilter::Only(manager) => write!(f, "{}", manager),
        }
    }
}
