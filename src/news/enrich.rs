use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heuristic sentiment label derived from keyword counting, not a trained
/// classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

const POSITIVE_WORDS: [&str; 8] = [
    "gain", "rise", "up", "increase", "profit", "bull", "growth", "positive",
];
const NEGATIVE_WORDS: [&str; 8] = [
    "loss", "fall", "down", "decrease", "deficit", "bear", "recession", "negative",
];

/// Case-insensitive keyword presence count over the whole content; ties and
/// empty content are neutral.
pub fn classify_sentiment(content: &str) -> Sentiment {
    let lowered = content.to_lowercase();

    let positive = POSITIVE_WORDS
        .iter()
        .filter(|&&word| lowered.contains(word))
        .count();
    let negative = NEGATIVE_WORDS
        .iter()
        .filter(|&&word| lowered.contains(word))
        .count();

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Pull `$TICKER` style tokens out of free text: whitespace tokens starting
/// with `$` whose remainder is non-empty and entirely alphabetic. Distinct,
/// in order of first appearance, case as found.
pub fn extract_symbols(content: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();

    for token in content.split_whitespace() {
        let Some(rest) = token.strip_prefix('$') else {
            continue;
        };
        if rest.is_empty() || !rest.chars().all(char::is_alphabetic) {
            continue;
        }
        if !symbols.iter().any(|s| s == rest) {
            symbols.push(rest.to_string());
        }
    }

    symbols
}

const SUMMARY_LIMIT: usize = 300;

/// First 300 characters of the content, with an ellipsis only when text was
/// actually dropped.
pub fn summarize(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(SUMMARY_LIMIT).collect();

    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Best-effort ISO-8601 parse of a provider-supplied publication date.
/// Callers default to retrieval time on `None`.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&parsed));
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&parsed.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_positive() {
        assert_eq!(
            classify_sentiment("stocks gain and rise today"),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_sentiment_negative() {
        assert_eq!(
            classify_sentiment("market loss and recession fears"),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_sentiment_neutral_on_ties_and_empty() {
        assert_eq!(classify_sentiment(""), Sentiment::Neutral);
        assert_eq!(
            classify_sentiment("quarterly report published"),
            Sentiment::Neutral
        );
        // One word from each list cancels out.
        assert_eq!(
            classify_sentiment("gains offset by losses"),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_sentiment_is_case_insensitive() {
        assert_eq!(
            classify_sentiment("BULL market GROWTH continues"),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_extract_symbols() {
        let symbols = extract_symbols("Shares of $AAPL and $MSFT rallied");
        assert_eq!(symbols, ["AAPL", "MSFT"]);
    }

    #[test]
    fn test_extract_symbols_rejects_non_alphabetic() {
        assert!(extract_symbols("raised $3M in funding").is_empty());
        assert!(extract_symbols("pay with $ today").is_empty());
        // Trailing punctuation disqualifies the token; no further cleaning.
        assert!(extract_symbols("watch $AAPL, closely").is_empty());
    }

    #[test]
    fn test_extract_symbols_deduplicates() {
        let symbols = extract_symbols("$TSLA up as $TSLA deliveries beat");
        assert_eq!(symbols, ["TSLA"]);
    }

    #[test]
    fn test_summarize_truncates_long_content() {
        let content = "a".repeat(450);
        let summary = summarize(&content);

        assert_eq!(summary.len(), 303);
        assert!(summary.ends_with("..."));
        assert_eq!(&summary[..300], &content[..300]);
    }

    #[test]
    fn test_summarize_keeps_short_content_unmodified() {
        assert_eq!(summarize("brief update"), "brief update");
        assert_eq!(summarize(""), "");

        let exactly_limit = "b".repeat(300);
        assert_eq!(summarize(&exactly_limit), exactly_limit);
    }

    #[test]
    fn test_summarize_counts_chars_not_bytes() {
        let content = "é".repeat(301);
        let summary = summarize(&content);
        assert_eq!(summary.chars().count(), 303);
    }

    #[test]
    fn test_parse_published_variants() {
        assert!(parse_published("2024-01-15T10:30:00+00:00").is_some());
        assert!(parse_published("2024-01-15T10:30:00").is_some());
        assert!(parse_published("2024-01-15").is_some());
        assert!(parse_published("yesterday").is_none());
        assert!(parse_published("").is_none());
    }

    #[test]
    fn test_parse_published_normalizes_offsets() {
        let parsed = parse_published("2024-01-15T10:30:00-05:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T15:30:00+00:00");
    }
}
