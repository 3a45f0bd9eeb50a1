use crate::core::encoding::{read_csv_any_encoding, Table, TextEncoding};
use crate::domain::model::{normalize, Candidate};
use crate::utils::error::{PickerError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Bullets (`-`, `*`, `•`) and enumerators (`1.`, `2)`), possibly stacked.
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:[-*•]|\d+[.)])\s*)+").expect("list marker pattern is valid")
});

pub fn is_tabular(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// 讀取候選清單，`.csv` 走表格解析，其餘逐行解析
pub fn load_pool(path: &Path) -> Result<Vec<Candidate>> {
    if !path.exists() {
        return Err(PickerError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let pool = if is_tabular(path) {
        load_tabular(path)?
    } else {
        load_lines(path)?
    };

    tracing::info!("📋 Loaded {} candidates from {}", pool.len(), path.display());
    Ok(pool)
}

fn load_tabular(path: &Path) -> Result<Vec<Candidate>> {
    let table = read_csv_any_encoding(path)?;
    Ok(candidates_from_table(&table, path))
}

fn candidates_from_table(table: &Table, path: &Path) -> Vec<Candidate> {
    let Some(column) = table.column("title") else {
        tracing::warn!("⚠️ {} has no 'title' column", path.display());
        return Vec::new();
    };

    table
        .rows
        .iter()
        .filter_map(|row| Candidate::parse(Table::cell(row, column)))
        .collect()
}

fn load_lines(path: &Path) -> Result<Vec<Candidate>> {
    let bytes = std::fs::read(path)?;
    let encoding = TextEncoding::Utf8Sig;
    let text = encoding.decode(&bytes).ok_or_else(|| PickerError::Encoding {
        path: path.to_path_buf(),
        tried: vec![encoding.label().to_string()],
    })?;

    Ok(parse_lines(&text))
}

/// Parse a line-oriented pool: one candidate per line, `#`/`>` comments skipped.
pub fn parse_lines(text: &str) -> Vec<Candidate> {
    text.lines()
        .filter_map(|line| {
            let line = normalize(line);
            if line.is_empty() || line.starts_with('#') || line.starts_with('>') {
                return None;
            }
            let stripped = LIST_MARKER.replace(&line, "");
            Candidate::parse(&stripped)
        })
        .collect()
}
