//! Locations and the active location scope

use crate::config::DateFormat;
use serde::{Deserialize, Serialize};

/// Id of the headquarters location; assets of deleted locations move here
pub const HQ_ID: &str = "hq";
pub const HQ_NAME: &str = "Headquarters";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub date_format: DateFormat,
    pub timezone: String,
    #[serde(default)]
    pub users: Vec<String>,
}

impl Location {
    fn seeded(id: &str, name: &str, currency: &str, date_format: DateFormat, tz: &str, user: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            currency: currency.to_string(),
            date_format,
            timezone: tz.to_string(),
            users: vec![user.to_string()],
        }
    }

    /// The three offices every new inventory starts with
    pub fn defaults() -> Vec<Location> {
        vec![
            Self::seeded(HQ_ID, HQ_NAME, "$", DateFormat::MonthDayYear, "EST", "admin@company.com"),
            Self::seeded(
                "europe",
                "Europe Office",
                "€",
                DateFormat::DayMonthYear,
                "CET",
                "europe@company.com",
            ),
            Self::seeded("asia", "Asia Pacific", "¥", DateFormat::Iso, "JST", "asia@company.com"),
        ]
    }
}

/// Editable location fields
#[derive(Debug, Clone)]
pub struct LocationInput {
    pub name: String,
    pub currency: String,
    pub date_format: DateFormat,
    pub timezone: String,
}

/// Active location context: everything, or one location
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Global,
    Location(String),
}

impl Scope {
    pub fn location_id(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::Location(id) => Some(id),
        }
    }

    pub fn includes(&self, location_id: &str) -> bool {
        match self {
            Scope::Global => true,
            Scope::Location(id) => id == location_id,
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("global") || s.is_empty() {
            Ok(Scope::Global)
        } else {
            Ok(Scope::Location(s.to_string()))
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Location(id) => write!(f, "{}", id),
        }
    }
}
