//! Lexicon-based polarity scoring.
//!
//! Scores are averaged over the sentiment-bearing words of a text, with
//! intensifiers scaling the next word and negations flipping words that
//! follow within a short window. The result lies in `[-1.0, 1.0]`.

use std::collections::HashMap;

const NEGATIONS: &[&str] = &["not", "no", "never", "without", "cannot", "nor"];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("significantly", 1.4),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

const LEXICON: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("better", 0.5),
    ("best", 1.0),
    ("improve", 0.5),
    ("improved", 0.5),
    ("improves", 0.5),
    ("faster", 0.4),
    ("fast", 0.2),
    ("stable", 0.4),
    ("clean", 0.4),
    ("simple", 0.2),
    ("easy", 0.4),
    ("new", 0.14),
    ("nice", 0.6),
    ("correct", 0.3),
    ("safe", 0.5),
    ("robust", 0.4),
    ("efficient", 0.5),
    ("excellent", 1.0),
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("broken", -0.4),
    ("wrong", -0.5),
    ("slow", -0.3),
    ("crash", -0.6),
    ("crashes", -0.6),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failing", -0.5),
    ("failure", -0.5),
    ("error", -0.4),
    ("incorrect", -0.5),
    ("unstable", -0.4),
    ("unsafe", -0.5),
    ("critical", -0.2),
    ("leak", -0.4),
    ("panic", -0.5),
    ("ugly", -0.7),
    ("hack", -0.2),
];

/// Scores text polarity from a fixed word lexicon.
#[derive(Debug, Clone)]
pub struct PolarityScorer {
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negation_window: usize,
}

impl PolarityScorer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negation_window: 3,
        }
    }

    /// Polarity of `text` in `[-1.0, 1.0]`; `0.0` when no word is scored.
    pub fn score(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut scored = 0usize;
        let mut modifier = 1.0;
        let mut words_since_negation: Option<usize> = None;

        for token in text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|t| !t.is_empty())
        {
            let word = token.to_lowercase();

            if NEGATIONS.contains(&word.as_str()) || word.ends_with("n't") {
                words_since_negation = Some(0);
                continue;
            }

            if let Some(&factor) = self.intensifiers.get(word.as_str()) {
                modifier = factor;
                continue;
            }

            if let Some(&base) = self.lexicon.get(word.as_str()) {
                let mut value = base * modifier;
                if words_since_negation.is_some_and(|n| n < self.negation_window) {
                    value *= -0.5;
                }
                total += value;
                scored += 1;
                modifier = 1.0;
            }

            words_since_negation = match words_since_negation {
                Some(n) if n + 1 < self.negation_window => Some(n + 1),
                _ => None,
            };
        }

        if scored == 0 {
            return 0.0;
        }
        (total / scored as f64).clamp(-1.0, 1.0)
    }
}

impl Default for PolarityScorer {
    fn default() -> Self {
        Self::new()
    }
}
