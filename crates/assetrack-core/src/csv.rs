//! Minimal CSV codec
//!
//! Quote-aware on a single line only: no embedded newlines, no escaped
//! quotes inside quoted fields.

use crate::config::{FieldKey, FieldLabels};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One data row, keyed by header name
pub type Row = BTreeMap<String, String>;

/// Parsed CSV text: header order plus the rows that matched it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Parse CSV text with a header line
///
/// Blank lines are ignored. Rows whose field count differs from the
/// header's are dropped without error.
pub fn parse(text: &str) -> Result<CsvTable> {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(Error::CsvTooShort);
    }

    let headers: Vec<String> = split_line(lines[0])
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for (index, line) in lines[1..].iter().enumerate() {
        let values = split_line(line);
        if values.len() != headers.len() {
            tracing::debug!(
                row = index + 1,
                expected = headers.len(),
                found = values.len(),
                "dropping CSV row with wrong field count"
            );
            continue;
        }
        let row: Row = headers
            .iter()
            .cloned()
            .zip(values.into_iter().map(|v| v.trim().to_string()))
            .collect();
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}

/// Split one line on commas outside double quotes; quotes are removed
pub fn split_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => result.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    result.push(current);
    result
}

/// Quote a value if it contains a comma or quote, doubling inner quotes
pub fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn join_line<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.map(escape).collect::<Vec<_>>().join(",")
}

/// Serialize rows keyed by canonical field key, with labelled headers
///
/// Missing values become empty fields.
pub fn serialize(rows: &[Row], fields: &[FieldKey], labels: &FieldLabels) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_line(fields.iter().map(|f| labels.get(*f))));
    for row in rows {
        lines.push(join_line(
            fields
                .iter()
                .map(|f| row.get(f.key()).map(String::as_str).unwrap_or("")),
        ));
    }
    lines.join("\n")
}

/// Serialize rows with their own header names, in the given order
pub fn serialize_table(table: &CsvTable) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(join_line(table.headers.iter().map(String::as_str)));
    for row in &table.rows {
        lines.push(join_line(
            table
                .headers
                .iter()
                .map(|h| row.get(h).map(String::as_str).unwrap_or("")),
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_counts_rows() {
        let text = "itemName,currentQuantity\nWidget,5\nGadget,3\n\nBolt,100\n";
        let table = parse(text).unwrap();
        assert_eq!(table.headers, vec!["itemName", "currentQuantity"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[2]["itemName"], "Bolt");
    }

    #[test]
    fn test_parse_drops_mismatched_rows() {
        let text = "a,b,c\n1,2,3\n1,2\n1,2,3,4\n4,5,6";
        let table = parse(text).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1]["c"], "6");
    }

    #[test]
    fn test_parse_requires_header_and_row() {
        assert!(matches!(parse("a,b\n"), Err(Error::CsvTooShort)));
        assert!(matches!(parse(""), Err(Error::CsvTooShort)));
        assert!(matches!(parse("\n\n  \n"), Err(Error::CsvTooShort)));
    }

    #[test]
    fn test_quoted_commas_and_trimming() {
        let text = "name , price\r\n\"Desk, oak\" , 120.50\r\n";
        let table = parse(text).unwrap();
        assert_eq!(table.headers, vec!["name", "price"]);
        assert_eq!(table.rows[0]["name"], "Desk, oak");
        assert_eq!(table.rows[0]["price"], "120.50");
    }

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
        assert_eq!(split_line(""), vec![""]);
        assert_eq!(split_line("a,,"), vec!["a", "", ""]);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_serialize_roundtrips_plain_values() {
        let text = "itemName,currentQuantity,unitPrice,status\nWidget,5,2.50,active\nGadget,0,10,retired";
        let table = parse(text).unwrap();
        let fields = [
            FieldKey::ItemName,
            FieldKey::CurrentQuantity,
            FieldKey::UnitPrice,
            FieldKey::Status,
        ];

        let out = serialize(&table.rows, &fields, &FieldLabels::default());
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("Item Name,Current Quantity,Unit Price,Status")
        );
        let body: Vec<&str> = lines.collect();
        assert_eq!(body, vec!["Widget,5,2.50,active", "Gadget,0,10,retired"]);
    }

    #[test]
    fn test_serialize_quotes_values() {
        let mut row = Row::new();
        row.insert("itemName".to_string(), "Desk, oak".to_string());
        let out = serialize(&[row], &[FieldKey::ItemName, FieldKey::Sku], &FieldLabels::default());
        assert_eq!(out, "Item Name,SKU\n\"Desk, oak\",");
    }

    #[test]
    fn test_serialize_table_keeps_headers() {
        let text = "Name,Qty\n\"Desk, oak\",2";
        let table = parse(text).unwrap();
        assert_eq!(serialize_table(&table), "Name,Qty\n\"Desk, oak\",2");
    }
}
