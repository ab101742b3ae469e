//! Bilingual text classifier for job-posting fragments.
//!
//! A fragment is labelled as a responsibility, a requirement or page noise.
//! The rules are ordered so that qualification language always wins over a
//! leading action verb:
//!
//! 1. length outside the configured window (in characters) is noise;
//! 2. a noise pattern or a brand term is noise, and so is an all-caps banner
//!    of two or more words without a qualification or skill signal;
//! 3. a qualification signal is a requirement;
//! 4. a leading action verb or a responsibility phrase is a responsibility;
//! 5. a skill term is a requirement;
//! 6. anything else is noise.

pub mod rules;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::config::ExtractionConfig;
use crate::utils::char_len;

pub use rules::{
    ClassifierRules, ACTION_VERBS_EN, ACTION_VERBS_ZH, BANNER_PATTERN, NOISE_PATTERNS,
    QUALIFICATION_PATTERNS, REQUIREMENT_SECTION_KEYWORDS, RESPONSIBILITY_PHRASES,
    RESPONSIBILITY_SECTION_KEYWORDS, SKILL_TERMS,
};

/// The label assigned to a text fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationVerdict {
    /// Something the hire will do.
    Responsibility,
    /// Something the candidate must have.
    Requirement,
    /// Page chrome, navigation or unrelated text.
    Noise,
}

impl fmt::Display for ClassificationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Responsibility => "responsibility",
            Self::Requirement => "requirement",
            Self::Noise => "noise",
        };
        write!(f, "{s}")
    }
}

/// Compiles `pattern`, logging and skipping it when it is invalid.
pub(crate) fn compile(table: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(table, pattern, error = %e, "Skipping invalid classifier pattern");
            None
        }
    }
}

/// Builds one case-insensitive alternation over escaped literals.
fn alternation(table: &str, prefix: &str, terms: &[String], bounded: bool) -> Option<Regex> {
    let parts: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| {
            if bounded {
                rules::bounded_literal(t)
            } else {
                regex::escape(t)
            }
        })
        .collect();
    if parts.is_empty() {
        return None;
    }
    compile(table, &format!("(?i){prefix}(?:{})", parts.join("|")))
}

/// Classifies job-posting fragments.
///
/// Rule tables are compiled once per instance. Instances are cheap to share
/// by reference and classification never mutates state.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    min_chars: usize,
    max_chars: usize,
    noise: Vec<Regex>,
    banner: Option<Regex>,
    brand: Option<Regex>,
    qualification: Vec<Regex>,
    leading_verb_en: Option<Regex>,
    leading_verb_zh: Option<Regex>,
    responsibility_phrase: Option<Regex>,
    skill: Option<Regex>,
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TextClassifier {
    /// Creates a classifier with the default rules and an 8–500 character window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(&ClassifierRules::default())
    }

    /// Creates a classifier from a rule set.
    #[must_use]
    pub fn with_rules(rules: &ClassifierRules) -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            min_chars: defaults.min_fragment_chars,
            max_chars: defaults.max_fragment_chars,
            noise: rules
                .noise_patterns
                .iter()
                .filter_map(|p| compile("noise", p))
                .collect(),
            banner: compile("banner", BANNER_PATTERN),
            brand: alternation("brand", "", &rules.brand_terms, false),
            qualification: rules
                .qualification_patterns
                .iter()
                .filter_map(|p| compile("qualification", p))
                .collect(),
            leading_verb_en: alternation(
                "action_verbs_en",
                r"^(?:you\s+will\s+|you['’]ll\s+)?",
                &rules.action_verbs_en,
                false,
            ),
            leading_verb_zh: alternation("action_verbs_zh", "^", &rules.action_verbs_zh, false),
            responsibility_phrase: alternation(
                "responsibility_phrases",
                "",
                &rules.responsibility_phrases,
                true,
            ),
            skill: alternation("skill_terms", "", &rules.skill_terms, true),
        }
    }

    /// Creates a classifier whose length window and brand terms come from
    /// `config`.
    #[must_use]
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let rules = ClassifierRules::default().with_brand_terms(config.brand_terms.clone());
        Self::with_rules(&rules).with_length_window(config.min_fragment_chars, config.max_fragment_chars)
    }

    /// Sets the accepted length window, in characters, inclusive on both ends.
    #[must_use]
    pub fn with_length_window(mut self, min_chars: usize, max_chars: usize) -> Self {
        self.min_chars = min_chars;
        self.max_chars = max_chars.max(min_chars);
        self
    }

    /// Classifies a fragment. Surrounding whitespace is ignored.
    #[must_use]
    pub fn classify(&self, fragment: &str) -> ClassificationVerdict {
        let text = fragment.trim();
        let len = char_len(text);
        if len < self.min_chars || len > self.max_chars {
            return ClassificationVerdict::Noise;
        }

        if self.is_noise(text) {
            return ClassificationVerdict::Noise;
        }

        let qualified = self.qualification.iter().any(|re| re.is_match(text));
        let skilled = matches_opt(&self.skill, text);
        if !qualified && !skilled && self.is_banner(text) {
            return ClassificationVerdict::Noise;
        }

        if qualified {
            return ClassificationVerdict::Requirement;
        }

        if self.begins_with_action_verb(text) || matches_opt(&self.responsibility_phrase, text) {
            return ClassificationVerdict::Responsibility;
        }

        if skilled {
            return ClassificationVerdict::Requirement;
        }

        ClassificationVerdict::Noise
    }

    /// Whether `fragment` classifies as a responsibility.
    #[must_use]
    pub fn is_responsibility(&self, fragment: &str) -> bool {
        self.classify(fragment) == ClassificationVerdict::Responsibility
    }

    /// Whether `fragment` classifies as a requirement.
    #[must_use]
    pub fn is_requirement(&self, fragment: &str) -> bool {
        self.classify(fragment) == ClassificationVerdict::Requirement
    }

    fn is_noise(&self, text: &str) -> bool {
        matches_opt(&self.brand, text) || self.noise.iter().any(|re| re.is_match(text))
    }

    fn is_banner(&self, text: &str) -> bool {
        text.split_whitespace().nth(1).is_some() && matches_opt(&self.banner, text)
    }

    fn begins_with_action_verb(&self, text: &str) -> bool {
        matches_opt(&self.leading_verb_en, text) || matches_opt(&self.leading_verb_zh, text)
    }
}

fn matches_opt(re: &Option<Regex>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClassificationVerdict::{Noise, Requirement, Responsibility};

    fn classifier() -> TextClassifier {
        TextClassifier::new()
    }

    #[test]
    fn test_length_bounds() {
        let c = classifier();
        assert_eq!(c.classify("Develop"), Noise);
        assert_eq!(c.classify(&"Develop ".repeat(70)), Noise);
        assert_eq!(c.classify("Develop APIs"), Responsibility);
    }

    #[test]
    fn test_length_window_is_inclusive() {
        let c = classifier();
        assert_eq!(char_len("Develop."), 8);
        assert_eq!(c.classify("Develop."), Responsibility);
        let long = format!("Develop {}", "a".repeat(492));
        assert_eq!(char_len(&long), 500);
        assert_eq!(c.classify(&long), Responsibility);
        assert_eq!(c.classify(&format!("{long}a")), Noise);
    }

    #[test]
    fn test_length_is_measured_in_chars() {
        let c = classifier();
        // 7 CJK chars, 21 bytes.
        assert_eq!(c.classify("負責系統開發工"), Noise);
        assert_eq!(c.classify("負責系統開發及維護"), Responsibility);
    }

    #[test]
    fn test_action_verbs() {
        let c = classifier();
        assert_eq!(c.classify("Develop and maintain backend services"), Responsibility);
        assert_eq!(c.classify("Developing internal tooling for finance"), Responsibility);
        assert_eq!(c.classify("You will lead a team of five engineers"), Responsibility);
        assert_eq!(c.classify("You'll own the onboarding flow end to end"), Responsibility);
    }

    #[test]
    fn test_responsibility_phrase_anywhere() {
        let c = classifier();
        assert_eq!(
            c.classify("The analyst is responsible for month-end closing"),
            Responsibility
        );
    }

    #[test]
    fn test_qualifications() {
        let c = classifier();
        assert_eq!(c.classify("Bachelor's degree in Computer Science"), Requirement);
        assert_eq!(c.classify("5+ years in backend development"), Requirement);
        assert_eq!(c.classify("Familiarity with payment systems"), Requirement);
    }

    #[test]
    fn test_qualification_beats_leading_action_verb() {
        let c = classifier();
        assert_eq!(
            c.classify("Manage a team with at least 3 years of experience"),
            Requirement
        );
        assert_eq!(c.classify("Develop strong knowledge of SQL tuning"), Requirement);
    }

    #[test]
    fn test_skill_terms_without_verb() {
        let c = classifier();
        assert_eq!(c.classify("Excellent communication skills in English"), Requirement);
        assert_eq!(c.classify("Hands-on Docker and Kubernetes"), Requirement);
    }

    #[test]
    fn test_cjk_fragments() {
        let c = classifier();
        assert_eq!(c.classify("負責系統開發及日常維護工作"), Responsibility);
        assert_eq!(c.classify("具備三年以上相關工作經驗"), Requirement);
        assert_eq!(c.classify("良好的英語及粵語溝通能力"), Requirement);
    }

    #[test]
    fn test_noise() {
        let c = classifier();
        assert_eq!(c.classify("Quick apply"), Noise);
        assert_eq!(c.classify("View all jobs at this company"), Noise);
        assert_eq!(c.classify("Posted 3d ago"), Noise);
        assert_eq!(c.classify("FULL TIME PERMANENT"), Noise);
        assert_eq!(c.classify("Develop your career on JobsDB"), Noise);
        assert_eq!(c.classify("分享此職位到社交媒體"), Noise);
        assert_eq!(c.classify("We use cookies to improve your experience"), Noise);
    }

    #[test]
    fn test_all_caps_banner_needs_two_words_without_signals() {
        let c = classifier();
        assert_eq!(c.classify("FULL TIME PERMANENT"), Noise);
        assert_eq!(c.classify("JOB HIGHLIGHTS"), Noise);
        assert_eq!(c.classify("HKDSE / CPA"), Requirement);
        assert_eq!(c.classify("SQL, AWS, GCP"), Requirement);
    }

    #[test]
    fn test_share_and_print_need_word_boundaries() {
        let c = classifier();
        assert_eq!(c.classify("Prepare blueprint reviews for clients"), Responsibility);
        assert_eq!(c.classify("Report to shareholders each quarter"), Responsibility);
    }

    #[test]
    fn test_unmatched_text_is_noise() {
        let c = classifier();
        assert_eq!(c.classify("Our office is near the harbour"), Noise);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let c = classifier();
        let fragment = "Develop and maintain backend services";
        assert_eq!(c.classify(fragment), c.classify(fragment));
    }

    #[test]
    fn test_predicates() {
        let c = classifier();
        assert!(c.is_responsibility("Coordinate with vendors on delivery"));
        assert!(c.is_requirement("Minimum 2 years of relevant experience"));
        assert!(!c.is_requirement("Apply now"));
    }

    #[test]
    fn test_extended_rules() {
        let rules = ClassifierRules::new()
            .with_brand_term("acmejobs")
            .with_action_verb("orchestrate")
            .with_qualification_term("security clearance");
        let c = TextClassifier::with_rules(&rules);

        assert_eq!(c.classify("Orchestrate nightly data loads"), Responsibility);
        assert_eq!(c.classify("Browse more roles on AcmeJobs"), Noise);
        assert_eq!(c.classify("Active security clearance"), Requirement);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let rules = ClassifierRules::new().with_noise_pattern("(unclosed");
        let c = TextClassifier::with_rules(&rules);
        assert_eq!(c.classify("Develop and maintain backend services"), Responsibility);
    }

    #[test]
    fn test_from_config_window() {
        let config = ExtractionConfig {
            min_fragment_chars: 20,
            ..ExtractionConfig::default()
        };
        let c = TextClassifier::from_config(&config);
        assert_eq!(c.classify("Develop APIs"), Noise);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Responsibility.to_string(), "responsibility");
        assert_eq!(serde_json::to_string(&Requirement).unwrap(), "\"requirement\"");
    }
}
