//! 详情页可编辑区块

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An independently editable region of a detail page.
///
/// Every section owns its own edit state; editing one never locks another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    General,
    Pricing,
    Stock,
    Supplier,
    Characteristics,
    Descriptions,
    Identifiers,
    Address,
    Commercial,
    Contact,
    OrderHeader,
    OrderItems,
}

impl Section {
    pub const ALL: [Self; 12] = [
        Self::General,
        Self::Pricing,
        Self::Stock,
        Self::Supplier,
        Self::Characteristics,
        Self::Descriptions,
        Self::Identifiers,
        Self::Address,
        Self::Commercial,
        Self::Contact,
        Self::OrderHeader,
        Self::OrderItems,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Pricing => "pricing",
            Self::Stock => "stock",
            Self::Supplier => "supplier",
            Self::Characteristics => "characteristics",
            Self::Descriptions => "descriptions",
            Self::Identifiers => "identifiers",
            Self::Address => "address",
            Self::Commercial => "commercial",
            Self::Contact => "contact",
            Self::OrderHeader => "order_header",
            Self::OrderItems => "order_items",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == wanted)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown section: '{s}'")))
    }
}
