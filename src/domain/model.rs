use crate::utils::error::Result;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use url::Url;

/// Collapse every whitespace run into a single space and trim both ends.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 拆分 "標題 | 連結"，只切第一個分隔符
pub fn split_title_url(s: &str) -> (String, Option<String>) {
    match s.split_once('|') {
        Some((left, right)) => {
            let url = normalize(right);
            (normalize(left), (!url.is_empty()).then_some(url))
        }
        None => (normalize(s), None),
    }
}

/// One entry of the pool.
///
/// `text` is the normalized source line and is what exclusion words are matched
/// against. `title` and `url` are the two halves of `text` split on the first `|`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub title: String,
    pub url: Option<String>,
}

impl Candidate {
    /// Returns `None` when the normalized title would be empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = normalize(raw);
        let (title, url) = split_title_url(&text);
        if title.is_empty() {
            return None;
        }
        Some(Self { text, title, url })
    }

    /// The link part, when it is an absolute URL.
    pub fn link(&self) -> Option<Url> {
        self.url.as_deref().and_then(|u| Url::parse(u).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub title: String,
}

/// Per-draw options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub exclusion_words: Vec<String>,
    pub dedup_days: u32,
    pub sample_count: usize,
}

impl SelectionRequest {
    /// 排除詞以空白分隔
    pub fn new(exclude: &str, dedup_days: u32, sample_count: usize) -> Self {
        Self {
            exclusion_words: exclude.split_whitespace().map(str::to_string).collect(),
            dedup_days,
            sample_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTier {
    /// Exclusion words and the dedup window both applied.
    Strict,
    /// Dedup window dropped because the strict pass left nothing.
    ExclusionOnly,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub candidates: Vec<Candidate>,
    pub tier: FilterTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawReport {
    pub picks: Vec<Candidate>,
    pub pool_size: usize,
    pub eligible: usize,
    pub tier: FilterTier,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrawOutcome {
    Picked(DrawReport),
    Exhausted { pool_size: usize },
}

impl DrawOutcome {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Write \t a   haiku \n"), "Write a haiku");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_outcome_json_is_tagged() {
        let json = DrawOutcome::Exhausted { pool_size: 4 }.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "exhausted");
        assert_eq!(value["pool_size"], 4);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["  a  b ", "Learn a chord | https://example.com/chord", "\u{3000}全形 空白"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_candidate_split_title_url() {
        let c = Candidate::parse("Learn a chord  |  https://example.com/chord").unwrap();
        assert_eq!(c.text, "Learn a chord | https://example.com/chord");
        assert_eq!(c.title, "Learn a chord");
        assert_eq!(c.url.as_deref(), Some("https://example.com/chord"));
        assert_eq!(c.link().unwrap().path(), "/chord");
    }

    #[test]
    fn test_candidate_without_url() {
        let c = Candidate::parse("Clean desk").unwrap();
        assert_eq!(c.title, "Clean desk");
        assert!(c.url.is_none());
        assert!(c.link().is_none());
    }

    #[test]
    fn test_candidate_with_empty_title_is_rejected() {
        assert!(Candidate::parse("   ").is_none());
        assert!(Candidate::parse("| https://example.com").is_none());
    }

    #[test]
    fn test_non_url_link_part() {
        let c = Candidate::parse("Read | chapter 3").unwrap();
        assert_eq!(c.url.as_deref(), Some("chapter 3"));
        assert!(c.link().is_none());
    }

    #[test]
    fn test_selection_request_splits_words() {
        let req = SelectionRequest::new("  交易 策略   量化 ", 30, 1);
        assert_eq!(req.exclusion_words, vec!["交易", "策略", "量化"]);
    }
}
