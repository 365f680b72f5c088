use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Raw ledger row with its spreadsheet line number (header is line 1).
#[derive(Debug)]
pub(crate) struct LedgerRecord {
    pub(crate) line: usize,
    pub(crate) id: Option<String>,
    pub(crate) date: String,
    pub(crate) lot: String,
    pub(crate) kind: String,
    pub(crate) gallons: f64,
    pub(crate) tax_class: Option<String>,
    pub(crate) wine_type: Option<String>,
    pub(crate) alcohol_pct: Option<f64>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<LedgerRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<LedgerRow>().enumerate() {
        let row = record?;
        records.push(LedgerRecord {
            line: index + 2,
            id: row.id,
            date: row.date,
            lot: row.lot,
            kind: row.kind,
            gallons: row.gallons,
            tax_class: row.tax_class,
            wine_type: row.wine_type,
            alcohol_pct: row.alcohol_pct,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    #[serde(rename = "ID", default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Lot")]
    lot: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Gallons")]
    gallons: f64,
    #[serde(rename = "Tax Class", default, deserialize_with = "empty_string_as_none")]
    tax_class: Option<String>,
    #[serde(rename = "Wine Type", default, deserialize_with = "empty_string_as_none")]
    wine_type: Option<String>,
    #[serde(rename = "Alcohol %", default, deserialize_with = "empty_string_as_number")]
    alcohol_pct: Option<f64>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_string_as_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = empty_string_as_none(deserializer)?;
    opt.map(|raw| {
        raw.trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(serde::de::Error::custom)
    })
    .transpose()
}

/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, or an RFC 3339 timestamp.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}
