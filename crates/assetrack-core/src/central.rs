//! Central (master) CSV files and their typed records

use crate::asset::{AssetStatus, StockLevel};
use crate::config::{FieldKey, FieldLabels};
use crate::csv::{CsvTable, Row};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An uploaded master CSV. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralFile {
    pub id: String,
    pub filename: String,
    /// Version label, `v{n}` unless given
    pub version: String,
    pub upload_date: DateTime<Utc>,
    pub row_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub table: CsvTable,
}

impl CentralFile {
    pub fn rows(&self) -> &[Row] {
        &self.table.rows
    }
}

/// Maps asset fields to the header names of one CSV
///
/// A header matches a field by canonical key (`itemName`), snake_case key
/// (`item_name`) or configured label (`Item Name`), ignoring case.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: Vec<(FieldKey, String)>,
}

impl ColumnMap {
    pub fn resolve(headers: &[String], labels: &FieldLabels) -> Self {
        let columns = FieldKey::ALL
            .into_iter()
            .filter_map(|field| {
                headers
                    .iter()
                    .find(|h| {
                        let h = h.trim();
                        h.eq_ignore_ascii_case(field.key())
                            || h.eq_ignore_ascii_case(field.snake())
                            || h.eq_ignore_ascii_case(labels.get(field))
                    })
                    .map(|h| (field, h.clone()))
            })
            .collect();
        Self { columns }
    }

    pub fn header(&self, field: FieldKey) -> Option<&str> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, h)| h.as_str())
    }

    /// Non-empty value of a field in a row
    pub fn get<'r>(&self, row: &'r Row, field: FieldKey) -> Option<&'r str> {
        let header = self.header(field)?;
        row.get(header).map(|v| v.trim()).filter(|v| !v.is_empty())
    }
}

/// Parse a whole, non-negative quantity ("7" or "7.0")
pub fn parse_quantity(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(q) = value.parse::<u32>() {
        return Some(q);
    }
    let d = Decimal::from_str(value).ok()?;
    if d.fract().is_zero() {
        d.to_u32()
    } else {
        None
    }
}

/// Parse a non-negative decimal price
pub fn parse_price(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim())
        .ok()
        .filter(|p| *p >= Decimal::ZERO)
}

/// Why a central row took no part in a sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "value")]
pub enum SkipReason {
    MissingItemName,
    InvalidQuantity(String),
    InvalidPrice(String),
    InvalidStatus(String),
    DuplicateKey(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingItemName => write!(f, "missing item name"),
            SkipReason::InvalidQuantity(v) => write!(f, "invalid quantity '{}'", v),
            SkipReason::InvalidPrice(v) => write!(f, "invalid unit price '{}'", v),
            SkipReason::InvalidStatus(v) => write!(f, "invalid status '{}'", v),
            SkipReason::DuplicateKey(k) => write!(f, "repeats {}", k),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based data row number
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    pub reason: SkipReason,
}

/// A central row with typed values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CentralRecord {
    /// 1-based data row number
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub item_name: String,
    /// Location column, if the row had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_quantity: Option<u32>,
    pub level: StockLevel,
}

impl CentralRecord {
    /// Type one raw row; `row` is its 1-based position in the file
    pub fn from_row(row: usize, raw: &Row, columns: &ColumnMap) -> Result<Self, SkippedRow> {
        let item_name = columns.get(raw, FieldKey::ItemName).map(str::to_string);
        let skip = |reason| SkippedRow {
            row,
            item_name: item_name.clone(),
            reason,
        };

        let Some(name) = item_name.clone() else {
            return Err(skip(SkipReason::MissingItemName));
        };

        let quantity_raw = columns.get(raw, FieldKey::CurrentQuantity).unwrap_or("");
        let current_quantity = parse_quantity(quantity_raw)
            .ok_or_else(|| skip(SkipReason::InvalidQuantity(quantity_raw.to_string())))?;

        let price_raw = columns.get(raw, FieldKey::UnitPrice).unwrap_or("");
        let unit_price = parse_price(price_raw)
            .ok_or_else(|| skip(SkipReason::InvalidPrice(price_raw.to_string())))?;

        let status = match columns.get(raw, FieldKey::Status) {
            Some(status_raw) => AssetStatus::from_str(status_raw)
                .map_err(|_| skip(SkipReason::InvalidStatus(status_raw.to_string())))?,
            None => AssetStatus::Active,
        };

        Ok(Self {
            row,
            sku: columns.get(raw, FieldKey::Sku).map(str::to_string),
            item_name: name,
            location: columns.get(raw, FieldKey::Location).map(str::to_string),
            starting_quantity: columns
                .get(raw, FieldKey::StartingQuantity)
                .and_then(parse_quantity),
            level: StockLevel {
                current_quantity,
                unit_price,
                status,
            },
        })
    }
}
