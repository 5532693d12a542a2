use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use std::collections::HashSet;

/// Parsed CSV: header names plus records aligned with them, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandTable {
    pub columns: Vec<String>,
    pub records: Vec<DemandRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandRecord {
    /// 1-based line in the source text where the record starts.
    pub line: u64,
    pub fields: Vec<String>,
}

impl DemandTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Strict UTF-8 decode. A UTF-8 BOM is dropped; anything else that is not UTF-8 is rejected.
pub fn decode_utf8(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let bom_len = match Encoding::for_bom(bytes) {
        Some((enc, bom_len)) if enc == UTF_8 => bom_len,
        Some((enc, _)) => anyhow::bail!("expected UTF-8 text, found {} byte order mark", enc.name()),
        None => 0,
    };
    let body = &bytes[bom_len..];

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        return Ok(text);
    }

    // Offsets are reported against the raw upload, BOM included.
    let valid = std::str::from_utf8(body)
        .err()
        .map(|e| e.valid_up_to())
        .unwrap_or_default();
    let position = bom_len + valid;
    let byte = bytes.get(position).copied().unwrap_or_default();
    anyhow::bail!(
        "'utf-8' codec can't decode byte 0x{byte:02x} in position {position}: invalid byte sequence"
    )
}

pub fn parse_demand_csv(text: &str) -> Result<DemandTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("failed to read CSV header")?.clone();
    anyhow::ensure!(!headers.is_empty(), "no columns to parse from file");

    let mut seen = HashSet::with_capacity(headers.len());
    let mut columns = Vec::with_capacity(headers.len());
    for name in headers.iter() {
        anyhow::ensure!(seen.insert(name), "duplicate column name '{name}' in CSV header");
        columns.push(name.to_string());
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.context("malformed CSV")?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        // Whitespace-only lines count as blank.
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        anyhow::ensure!(
            record.len() == columns.len(),
            "malformed CSV: line {line} has {} fields, expected {}",
            record.len(),
            columns.len()
        );

        records.push(DemandRecord {
            line,
            fields: record.iter().map(str::to_string).collect(),
        });
    }

    tracing::debug!(
        columns = columns.len(),
        records = records.len(),
        "parsed demand CSV"
    );

    Ok(DemandTable { columns, records })
}
