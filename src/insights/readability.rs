//! Flesch reading-ease scoring of page text

use serde::{Deserialize, Serialize};

/// Score reported when there is no text to measure
pub const NOT_AVAILABLE: &str = "N/A (No content found)";

/// Readability of the user's page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readability {
    /// Flesch reading ease, or the "N/A" sentinel
    pub readability_score: ReadabilityScore,
}

/// A numeric score or a sentinel string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadabilityScore {
    /// Flesch reading ease, rounded to one decimal
    Score(f64),
    /// No content to score
    NotAvailable(String),
}

/// Score a page's body text
pub fn analyze_readability(text: Option<&str>) -> Readability {
    let readability_score = match text.map(str::trim) {
        Some(text) if !text.is_empty() => ReadabilityScore::Score(flesch_reading_ease(text)),
        _ => ReadabilityScore::NotAvailable(NOT_AVAILABLE.to_string()),
    };
    Readability { readability_score }
}

/// Flesch reading ease: 206.835 - 1.015 (words/sentences) - 84.6 (syllables/words)
///
/// Higher is easier. Not clamped, so very dense text can go negative.
pub fn flesch_reading_ease(text: &str) -> f64 {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect();

    if words.is_empty() {
        return 0.0;
    }

    let word_count = words.len() as f64;
    let sentence_count = count_sentences(text).max(1) as f64;
    let syllable_count: usize = words.iter().map(|word| count_syllables(word)).sum();

    let score = 206.835
        - 1.015 * (word_count / sentence_count)
        - 84.6 * (syllable_count as f64 / word_count);
    (score * 10.0).round() / 10.0
}

/// Sentences are runs of text ended by `.`, `!` or `?`
fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|sentence| sentence.chars().any(char::is_alphanumeric))
        .count()
}

/// Vowel-group syllable estimate with a silent-e adjustment
fn count_syllables(word: &str) -> usize {
    if word.chars().all(|c| c.is_ascii_digit()) {
        return 1;
    }

    let mut syllables = 0;
    let mut prev_was_vowel = false;
    for c in word.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !prev_was_vowel {
            syllables += 1;
        }
        prev_was_vowel = is_vowel;
    }

    if word.ends_with('e') && !word.ends_with("le") && syllables > 1 {
        syllables -= 1;
    }

    syllables.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_not_available() {
        assert_eq!(
            analyze_readability(None).readability_score,
            ReadabilityScore::NotAvailable(NOT_AVAILABLE.to_string())
        );
        assert_eq!(
            analyze_readability(Some("   ")).readability_score,
            ReadabilityScore::NotAvailable(NOT_AVAILABLE.to_string())
        );
    }

    #[test]
    fn test_simple_text_scores_high() {
        // 8 words, 2 sentences, 8 syllables: 206.835 - 4.06 - 84.6 = 118.175
        let score = flesch_reading_ease("The cat sat. The dog ran to me.");

        assert_eq!(score, 118.2);
    }

    #[test]
    fn test_dense_text_scores_lower() {
        let simple = flesch_reading_ease("We like to run. It is fun.");
        let dense = flesch_reading_ease(
            "Comprehensive institutional interoperability necessitates sophisticated organizational infrastructure",
        );

        assert!(dense < simple);
    }

    #[test]
    fn test_count_syllables() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("reading"), 2);
        assert_eq!(count_syllables("happy"), 2);
        assert_eq!(count_syllables("2024"), 1);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(analyze_readability(Some("The cat sat."))).unwrap();
        assert!(json["readabilityScore"].is_number());

        let json = serde_json::to_value(analyze_readability(None)).unwrap();
        assert_eq!(json["readabilityScore"], NOT_AVAILABLE);
    }
}
