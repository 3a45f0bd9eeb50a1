//! Multi-encoding CSV reading shared by the pool loader and the history log.
//!
//! Hand-edited spreadsheets arrive in whatever the editor felt like saving, so
//! tabular files are decoded with each [`TextEncoding`] of [`CSV_ENCODINGS`] in
//! turn and the first one that yields a readable table wins.

use crate::utils::error::{PickerError, Result};
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{Encoding, GBK, UTF_16BE, UTF_16LE, UTF_8};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8Sig,
    Utf8,
    Gbk,
    Cp936,
    /// UTF-16 with a byte-order mark deciding endianness.
    Utf16,
    Utf16Le,
    Utf16Be,
}

/// 讀取表格檔時依序嘗試的編碼
pub const CSV_ENCODINGS: &[TextEncoding] = &[
    TextEncoding::Utf8Sig,
    TextEncoding::Utf8,
    TextEncoding::Gbk,
    TextEncoding::Cp936,
    TextEncoding::Utf16,
    TextEncoding::Utf16Le,
    TextEncoding::Utf16Be,
];

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Gbk => "gbk",
            TextEncoding::Cp936 => "cp936",
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Utf16Le => "utf-16-le",
            TextEncoding::Utf16Be => "utf-16-be",
        }
    }

    /// Strict decode: any malformed sequence yields `None`.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let decoded = match self {
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            // cp936 is the Windows code page name for GBK
            TextEncoding::Gbk | TextEncoding::Cp936 => {
                GBK.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Utf16 => {
                let (encoding, bom_len) = Encoding::for_bom(bytes)?;
                if encoding != UTF_16LE && encoding != UTF_16BE {
                    return None;
                }
                encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            }
            TextEncoding::Utf16Le => {
                UTF_16LE.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Utf16Be => {
                UTF_16BE.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }?;
        Some(decoded.into_owned())
    }
}

/// A decoded CSV file: trimmed header names plus the raw rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
    pub encoding: TextEncoding,
}

impl Table {
    /// Index of the column whose header equals `name`, ignoring ASCII case.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Cell at `index` in `row`, empty when the row is short.
    pub fn cell<'a>(row: &'a StringRecord, index: usize) -> &'a str {
        row.get(index).unwrap_or("")
    }
}

fn parse_table(text: &str, encoding: TextEncoding) -> std::result::Result<Table, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Table {
        headers,
        rows,
        encoding,
    })
}

/// Decode `bytes` with every encoding of [`CSV_ENCODINGS`] until one parses.
pub fn parse_csv_any_encoding(path: &Path, bytes: &[u8]) -> Result<Table> {
    for encoding in CSV_ENCODINGS {
        let Some(text) = encoding.decode(bytes) else {
            tracing::debug!("{} is not valid {}", path.display(), encoding.label());
            continue;
        };
        match parse_table(&text, *encoding) {
            Ok(table) => {
                tracing::debug!(
                    "Read {} rows from {} as {}",
                    table.rows.len(),
                    path.display(),
                    encoding.label()
                );
                return Ok(table);
            }
            Err(e) => {
                tracing::debug!("CSV parse failed for {} as {}: {}", path.display(), encoding.label(), e);
            }
        }
    }

    Err(PickerError::Encoding {
        path: path.to_path_buf(),
        tried: CSV_ENCODINGS.iter().map(|e| e.label().to_string()).collect(),
    })
}

pub fn read_csv_any_encoding(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path)?;
    parse_csv_any_encoding(path, &bytes)
}
