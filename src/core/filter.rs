use crate::domain::model::{Candidate, FilterOutcome, FilterTier};
use std::collections::HashSet;

fn is_excluded(candidate: &Candidate, words: &[&str]) -> bool {
    words.iter().any(|w| candidate.text.contains(w))
}

fn is_recent(candidate: &Candidate, recent_titles: &HashSet<String>) -> bool {
    recent_titles.contains(&candidate.text) || recent_titles.contains(&candidate.title)
}

/// Drop candidates containing an exclusion word or picked inside the dedup window.
///
/// Exclusion is plain case-sensitive substring matching, so `"art"` also
/// removes `"Start a journal"`. When both rules together leave nothing, the
/// dedup window is dropped and only exclusion words apply; if that is still
/// empty the outcome is [`FilterTier::Exhausted`].
pub fn filter(
    pool: &[Candidate],
    exclusion_words: &[String],
    recent_titles: &HashSet<String>,
) -> FilterOutcome {
    let words: Vec<&str> = exclusion_words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();

    let strict: Vec<Candidate> = pool
        .iter()
        .filter(|c| !is_excluded(c, &words) && !is_recent(c, recent_titles))
        .cloned()
        .collect();
    if !strict.is_empty() {
        return FilterOutcome {
            candidates: strict,
            tier: FilterTier::Strict,
        };
    }

    // 全部都在去重期內時，退回只用排除詞過濾
    let relaxed: Vec<Candidate> = pool
        .iter()
        .filter(|c| !is_excluded(c, &words))
        .cloned()
        .collect();
    if !relaxed.is_empty() {
        tracing::info!("🔁 Every candidate was picked recently, ignoring the dedup window");
        return FilterOutcome {
            candidates: relaxed,
            tier: FilterTier::ExclusionOnly,
        };
    }

    FilterOutcome {
        candidates: Vec::new(),
        tier: FilterTier::Exhausted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(items: &[&str]) -> Vec<Candidate> {
        items.iter().filter_map(|s| Candidate::parse(s)).collect()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn titles(outcome: &FilterOutcome) -> Vec<&str> {
        outcome.candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_strict_filter() {
        let p = pool(&["Write a haiku", "Trading journal", "Clean desk"]);
        let out = filter(&p, &words(&["Trading"]), &set(&["Clean desk"]));
        assert_eq!(out.tier, FilterTier::Strict);
        assert_eq!(titles(&out), vec!["Write a haiku"]);
    }

    #[test]
    fn test_fallback_drops_recency_only() {
        let p = pool(&["Walk", "Trading journal", "Nap"]);
        let out = filter(&p, &words(&["Trading"]), &set(&["Walk", "Nap"]));
        assert_eq!(out.tier, FilterTier::ExclusionOnly);
        assert_eq!(titles(&out), vec!["Walk", "Nap"]);
    }

    #[test]
    fn test_fallback_returns_single_survivor() {
        let p = pool(&["Walk outside", "Walk the dog", "Read"]);
        let out = filter(&p, &words(&["Walk"]), &set(&["Read"]));
        assert_eq!(out.tier, FilterTier::ExclusionOnly);
        assert_eq!(titles(&out), vec!["Read"]);
    }

    #[test]
    fn test_exhausted_when_everything_excluded() {
        let p = pool(&["Trading", "Strategy"]);
        let out = filter(&p, &words(&["Trad", "Strat"]), &HashSet::new());
        assert_eq!(out.tier, FilterTier::Exhausted);
        assert!(out.candidates.is_empty());
    }

    #[test]
    fn test_empty_pool_is_exhausted() {
        let out = filter(&[], &[], &HashSet::new());
        assert_eq!(out.tier, FilterTier::Exhausted);
    }

    #[test]
    fn test_exclusion_is_case_sensitive_substring() {
        let p = pool(&["Start a journal", "ART class", "Nap"]);
        let out = filter(&p, &words(&["art"]), &HashSet::new());
        assert_eq!(titles(&out), vec!["ART class", "Nap"]);
    }

    #[test]
    fn test_blank_exclusion_words_are_ignored() {
        let p = pool(&["Walk", "Nap"]);
        let out = filter(&p, &words(&["", "   "]), &HashSet::new());
        assert_eq!(out.candidates.len(), 2);
    }

    #[test]
    fn test_exclusion_matches_url_part() {
        let p = pool(&["Watch a talk | https://youtube.com/x", "Nap"]);
        let out = filter(&p, &words(&["youtube"]), &HashSet::new());
        assert_eq!(titles(&out), vec!["Nap"]);
    }

    #[test]
    fn test_recent_matches_title_of_linked_candidate() {
        let p = pool(&["Learn a chord | https://example.com/chord", "Nap"]);
        let out = filter(&p, &[], &set(&["Learn a chord"]));
        assert_eq!(titles(&out), vec!["Nap"]);
    }
}
