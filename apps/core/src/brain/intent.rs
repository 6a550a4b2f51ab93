//! Intent Classification using keyword patterns.
//!
//! Coarse topic routing for portfolio questions. Exact substring containment
//! only: no tokenization, stemming or fuzzy matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight applied to top-level pattern matches, in tenths (2.0).
pub const TOP_LEVEL_WEIGHT_TENTHS: u64 = 20;
/// Weight applied to subtopic pattern matches, in tenths (2.5), so a specific
/// keyword beats a generic one of similar length.
pub const SUBTOPIC_WEIGHT_TENTHS: u64 = 25;

/// Detected topic of a user utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Technical skills (frontend, backend, devops)
    Skills,
    /// Portfolio projects
    Projects,
    /// Contact channels
    Contact,
    /// Background, biography and interests
    Personal,
    /// Start the conversation over
    Reset,
    /// Nothing matched
    Unknown,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Topic {
    /// Returns a human-readable label for the topic
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Skills => "skills",
            Topic::Projects => "projects",
            Topic::Contact => "contact",
            Topic::Personal => "personal",
            Topic::Reset => "reset",
            Topic::Unknown => "unknown",
        }
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Detected topic
    pub topic: Topic,
    /// Finer-grained subtopic, if a subtopic pattern won
    pub subtopic: Option<String>,
    /// Winning score (0.0 when nothing matched)
    pub score: f32,
    /// Pattern that produced the winning score
    pub matched_pattern: Option<String>,
}

impl IntentResult {
    /// The sentinel result for input that matched nothing.
    pub fn unknown() -> Self {
        Self {
            topic: Topic::Unknown,
            subtopic: None,
            score: 0.0,
            matched_pattern: None,
        }
    }

    pub fn subtopic(&self) -> Option<&str> {
        self.subtopic.as_deref()
    }
}

/// One row of the intent table.
#[derive(Debug, Clone, Copy)]
pub struct IntentPattern {
    pub topic: Topic,
    pub subtopic: Option<&'static str>,
    pub patterns: &'static [&'static str],
    pub weight_tenths: u64,
}

impl IntentPattern {
    pub const fn top_level(topic: Topic, patterns: &'static [&'static str]) -> Self {
        Self {
            topic,
            subtopic: None,
            patterns,
            weight_tenths: TOP_LEVEL_WEIGHT_TENTHS,
        }
    }

    pub const fn subtopic(
        topic: Topic,
        subtopic: &'static str,
        patterns: &'static [&'static str],
    ) -> Self {
        Self {
            topic,
            subtopic: Some(subtopic),
            patterns,
            weight_tenths: SUBTOPIC_WEIGHT_TENTHS,
        }
    }
}

// Row order is the tie-break order: each topic's own patterns, then its subtopics.
const DEFAULT_TABLE: &[IntentPattern] = &[
    IntentPattern::top_level(
        Topic::Skills,
        &["skills", "good at", "know", "technologies", "tech stack", "abilities", "can do", "proficient", "experience"],
    ),
    IntentPattern::subtopic(
        Topic::Skills,
        "frontend",
        &["front", "frontend", "ui", "react", "javascript", "typescript", "css", "html", "tailwind"],
    ),
    IntentPattern::subtopic(
        Topic::Skills,
        "backend",
        &["back", "backend", "server", "database", "api", "node", "express", "sql", "postgres", "mongodb"],
    ),
    IntentPattern::subtopic(
        Topic::Skills,
        "devops",
        &["devops", "deployment", "git", "version control"],
    ),
    IntentPattern::top_level(
        Topic::Projects,
        &["project", "portfolio", "work", "built", "created", "developed", "showcase", "github", "demo"],
    ),
    IntentPattern::subtopic(
        Topic::Projects,
        "portfolio",
        &["portfolio", "website", "portfolio website", "portfolio site"],
    ),
    IntentPattern::subtopic(
        Topic::Projects,
        "dashboard",
        &["dashboard", "project dashboard", "metrics", "performance", "visualization"],
    ),
    IntentPattern::subtopic(
        Topic::Projects,
        "taskapp",
        &["task", "management", "app", "task app", "todo"],
    ),
    IntentPattern::top_level(
        Topic::Contact,
        &["contact", "email", "reach out", "connect", "linkedin", "github", "social", "dm", "message"],
    ),
    IntentPattern::top_level(
        Topic::Personal,
        &["yourself", "about you", "background", "interests", "hobbies", "passion", "who are you", "tell me about"],
    ),
    IntentPattern::top_level(
        Topic::Reset,
        &["reset", "start over", "beginning", "restart", "start again", "go back", "fresh"],
    ),
];

/// Intent classifier over a fixed, ordered pattern table
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    table: Vec<IntentPattern>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier over the portfolio intent table
    pub fn new() -> Self {
        Self::with_table(DEFAULT_TABLE.to_vec())
    }

    /// Create a classifier over a custom table. Rows are scanned in order.
    pub fn with_table(table: Vec<IntentPattern>) -> Self {
        Self { table }
    }

    /// Classify the topic of an utterance
    pub fn classify(&self, utterance: &str) -> IntentResult {
        let query = utterance.to_lowercase();
        let query_len = query.chars().count();

        if query.trim().is_empty() {
            return IntentResult::unknown();
        }

        let mut best = IntentResult::unknown();
        // Every row shares the utterance length as denominator, so ranking
        // on `pattern_chars * weight_tenths` is exact where f32 is not.
        let mut best_rank: u64 = 0;

        for row in &self.table {
            for pattern in row.patterns {
                if pattern.is_empty() || !query.contains(pattern) {
                    continue;
                }
                let pattern_len = pattern.chars().count() as u64;
                let rank = pattern_len * row.weight_tenths;
                // Strictly greater: ties keep the first-seen match.
                if rank > best_rank {
                    best_rank = rank;
                    best = IntentResult {
                        topic: row.topic,
                        subtopic: row.subtopic.map(str::to_string),
                        score: rank as f32 / 10.0 / query_len as f32,
                        matched_pattern: Some(pattern.to_string()),
                    };
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_without_subtopic() {
        let classifier = IntentClassifier::new();

        let result = classifier.classify("What are your skills?");
        assert_eq!(result.topic, Topic::Skills);
        assert_eq!(result.subtopic(), None);
        assert_eq!(result.matched_pattern.as_deref(), Some("skills"));
    }

    #[test]
    fn test_subtopic_detection() {
        let classifier = IntentClassifier::new();

        let result = classifier.classify("frontend");
        assert_eq!(result.topic, Topic::Skills);
        assert_eq!(result.subtopic(), Some("frontend"));

        let result = classifier.classify("Your backend skills?");
        assert_eq!(result.topic, Topic::Skills);
        assert_eq!(result.subtopic(), Some("backend"));
    }

    #[test]
    fn test_score_formula() {
        let classifier = IntentClassifier::new();

        // "contact" (7 chars) in a 7-char utterance at weight 2.0
        let result = classifier.classify("contact");
        assert_eq!(result.topic, Topic::Contact);
        assert!((result.score - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reset_detection() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("reset").topic, Topic::Reset);
        assert_eq!(classifier.classify("Go back to the beginning").topic, Topic::Reset);
        assert_eq!(classifier.classify("Start over").topic, Topic::Reset);
    }

    #[test]
    fn test_unknown_detection() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("").topic, Topic::Unknown);
        assert_eq!(classifier.classify("   ").topic, Topic::Unknown);
        assert_eq!(classifier.classify("banana").topic, Topic::Unknown);
    }

    #[test]
    fn test_ties_keep_first_seen_row() {
        const TABLE: &[IntentPattern] = &[
            IntentPattern::top_level(Topic::Contact, &["abc"]),
            IntentPattern::top_level(Topic::Personal, &["abc"]),
        ];
        let classifier = IntentClassifier::with_table(TABLE.to_vec());

        let result = classifier.classify("abc");
        assert_eq!(result.topic, Topic::Contact);
    }

    #[test]
    fn test_mixed_weight_ties_keep_first_seen_row() {
        let classifier = IntentClassifier::new();

        // "node" (4 × 2.5) ties "email" (5 × 2.0); backend comes first.
        let result = classifier.classify("node email zzzzzzzzzzzzzz");
        assert_eq!(result.topic, Topic::Skills);
        assert_eq!(result.subtopic(), Some("backend"));
        assert_eq!(result.matched_pattern.as_deref(), Some("node"));
        assert!((result.score - 0.4).abs() < 1e-6);

        const TABLE: &[IntentPattern] = &[
            IntentPattern::top_level(Topic::Contact, &["abcde"]),
            IntentPattern::subtopic(Topic::Skills, "frontend", &["wxyz"]),
        ];
        let classifier = IntentClassifier::with_table(TABLE.to_vec());
        for input in ["abcde wxyz", "wxyz abcde", "abcde wxyz and a longer tail"] {
            let result = classifier.classify(input);
            assert_eq!(result.topic, Topic::Contact, "Expected first row for '{}'", input);
            assert_eq!(result.subtopic(), None);
        }
    }

    #[test]
    fn test_generic_phrase_can_outscore_subtopic() {
        let classifier = IntentClassifier::new();

        // "tell me about" is longer than "backend", so the personal topic wins.
        let result = classifier.classify("Tell me about your backend skills");
        assert_eq!(result.topic, Topic::Personal);
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("SHOW ME YOUR PROJECTS").topic, Topic::Projects);
    }
}
