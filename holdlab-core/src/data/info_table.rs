//! 13F information-table parsing and per-security aggregation.
//!
//! Filers publish the table with or without a namespace prefix
//! (`infoTable`, `ns1:infoTable`, `n1:infoTable`, ...). Elements are matched
//! on their local name, so every spelling lands in the same row fields.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::provider::DataError;
use crate::domain::{Holding, Holdings, SecurityId, UNKNOWN_NAME};

/// One `infoTable` entry as disclosed, before aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoTableRow {
    pub name: Option<String>,
    pub cusip: Option<String>,
    /// Thousands of currency units.
    pub value: u64,
    pub shares: u64,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Name,
    Cusip,
    Value,
    Shares,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"nameOfIssuer" => Some(Self::Name),
            b"cusip" => Some(Self::Cusip),
            b"value" => Some(Self::Value),
            b"sshPrnamt" => Some(Self::Shares),
            _ => None,
        }
    }
}

impl InfoTableRow {
    fn set(&mut self, field: Field, text: &str) {
        match field {
            Field::Name => self.name = Some(text.to_string()).filter(|s| !s.is_empty()),
            Field::Cusip => self.cusip = Some(text.to_string()).filter(|s| !s.is_empty()),
            Field::Value => self.value = parse_quantity(text),
            Field::Shares => self.shares = parse_quantity(text),
        }
    }
}

/// Parse every `infoTable` element of an information-table document.
///
/// A well-formed document without any `infoTable` element yields no rows.
pub fn parse_info_table(xml: &str) -> Result<Vec<InfoTableRow>, DataError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rows = Vec::new();
    let mut row: Option<InfoTableRow> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let local = e.local_name();
                if local.as_ref() == b"infoTable" {
                    row = Some(InfoTableRow::default());
                    field = None;
                } else {
                    field = Field::from_local_name(local.as_ref());
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(r), Some(f)) = (row.as_mut(), field) {
                    let text = t
                        .unescape()
                        .map_err(|e| DataError::Parse(format!("info table text: {e}")))?;
                    r.set(f, text.trim());
                }
            }
            Ok(Event::CData(t)) => {
                if let (Some(r), Some(f)) = (row.as_mut(), field) {
                    let text = t
                        .decode()
                        .map_err(|e| DataError::Parse(format!("info table CDATA: {e}")))?;
                    r.set(f, text.trim());
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"infoTable" {
                    if let Some(r) = row.take() {
                        rows.push(r);
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DataError::Parse(format!(
                    "info table XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(rows)
}

/// Lenient integer parse: drops thousands separators and any fractional
/// part; anything unparseable counts as zero.
pub fn parse_quantity(text: &str) -> u64 {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if let Ok(n) = cleaned.parse::<u64>() {
        return n;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.trunc() as u64)
        .unwrap_or(0)
}

/// Sum rows per CUSIP. The first row's issuer name is kept.
pub fn aggregate_holdings(rows: &[InfoTableRow]) -> Holdings {
    let mut holdings = Holdings::new();
    for row in rows {
        let id = SecurityId::new(row.cusip.as_deref().unwrap_or(UNKNOWN_NAME));
        let entry = holdings.entry(id).or_insert_with(|| {
            Holding::new(row.name.as_deref().unwrap_or(UNKNOWN_NAME), 0, 0)
        });
        entry.shares = entry.shares.saturating_add(row.shares);
        entry.value = entry.value.saturating_add(row.value);
    }
    holdings
}

/// Parse and aggregate in one step.
pub fn holdings_from_xml(xml: &str) -> Result<Holdings, DataError> {
    parse_info_table(xml).map(|rows| aggregate_holdings(&rows))
}
