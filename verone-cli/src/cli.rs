use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use serde_json::Value;
use verone_core::types::{Draft, EntityKind, Section};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "verone-edit",
    version,
    about = "Edit and save one section of a Vérone back-office record"
)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, env = "VERONE_CONFIG", default_value = "verone.toml")]
    pub config: PathBuf,

    /// Kind of record to edit
    #[arg(value_enum)]
    pub target: TargetKind,

    /// Record id
    pub id: String,

    /// Section to edit (general, pricing, stock, address, order-header, ...)
    #[arg(value_parser = parse_section)]
    pub section: Section,

    /// Field assignment; the value is read as JSON, or as a plain string otherwise
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment, required = true)]
    pub assignments: Vec<(String, Value)>,

    /// Only save if the record's `updated_at` still has this value (RFC 3339)
    #[arg(long, value_parser = parse_timestamp)]
    pub expect_updated_at: Option<String>,
}

impl Cli {
    /// Assignments as a draft; later assignments of a field win.
    pub fn draft(&self) -> Draft {
        self.assignments.iter().cloned().collect()
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Product,
    Organisation,
    Contact,
    SalesOrder,
    PurchaseOrder,
}

impl From<TargetKind> for EntityKind {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Product => Self::Product,
            TargetKind::Organisation => Self::Organisation,
            TargetKind::Contact => Self::Contact,
            TargetKind::SalesOrder => Self::SalesOrder,
            TargetKind::PurchaseOrder => Self::PurchaseOrder,
        }
    }
}

fn parse_section(s: &str) -> Result<Section, String> {
    Section::from_str(s).map_err(|e| e.to_string())
}

/// `field=value`. `price=12.5` is a number, `notes=null` is null,
/// `name=Table basse` is a string.
pub fn parse_assignment(s: &str) -> Result<(String, Value), String> {
    let (field, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}

fn parse_timestamp(s: &str) -> Result<String, String> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|_| s.to_string())
        .map_err(|e| format!("invalid RFC 3339 timestamp '{s}': {e}"))
}
