//! Named rule tables used by the [`TextClassifier`](super::TextClassifier).
//!
//! Word lists are plain literals and are escaped before compilation. Pattern
//! lists are regular expressions and carry their own flags.

/// Leading English action verbs. Matched as prefixes at the start of a
/// fragment so inflections ("developing", "managed") count too.
pub const ACTION_VERBS_EN: &[&str] = &[
    "develop",
    "manage",
    "lead",
    "oversee",
    "analyze",
    "analyse",
    "troubleshoot",
    "maintain",
    "create",
    "build",
    "implement",
    "conduct",
    "provide",
    "mentor",
    "support",
    "prepare",
    "coordinate",
    "design",
    "ensure",
    "establish",
    "execute",
    "deliver",
    "collaborate",
    "work",
    "assist",
    "help",
    "handle",
    "process",
    "perform",
    "review",
    "monitor",
    "supervise",
    "organize",
    "organise",
    "plan",
    "research",
    "investigate",
    "test",
    "evaluate",
    "assess",
    "document",
    "report",
    "communicate",
    "participate",
    "contribute",
    "facilitate",
    "optimize",
    "optimise",
    "enhance",
    "improve",
    "streamline",
    "drive",
    "own",
    "write",
    "responsible",
    "accountable",
];

/// Leading CJK action verbs.
pub const ACTION_VERBS_ZH: &[&str] = &[
    "負責", "管理", "開發", "維護", "設計", "創建", "實施", "執行", "協調", "領導", "支援",
    "協助", "處理", "進行", "完成", "制定", "規劃", "監督", "評估", "分析", "審查", "改善",
    "優化", "建立", "確保", "提供", "參與", "配合", "溝通", "撰寫", "報告", "研究", "測試",
    "培訓", "指導", "推動", "落實",
];

/// Phrases that mark a responsibility wherever they appear.
pub const RESPONSIBILITY_PHRASES: &[&str] = &[
    "responsible for",
    "accountable for",
    "工作內容",
    "職責範圍",
    "主要職責",
    "工作職責",
    "負責事項",
    "工作任務",
    "具體職責",
    "崗位職責",
    "主要工作",
    "日常工作",
    "核心職責",
];

/// Strong requirement signals. A fragment matching one of these is a
/// requirement even when it opens with an action verb.
pub const QUALIFICATION_PATTERNS: &[&str] = &[
    r"(?i)\bbachelor",
    r"(?i)\bmaster(?:'s|’s)?\s+(?:degree|of|in)\b",
    r"(?i)\bdegree\b",
    r"(?i)\bdiploma\b",
    r"(?i)\bph\.?\s?d\b",
    r"(?i)\b\d+\s*\+?\s*(?:years?|yrs?)\b",
    r"(?i)\byears?\s+of\s+(?:\w+\s+)?experience\b",
    r"(?i)\bproficien(?:t|cy)\b",
    r"(?i)\bknowledge\s+of\b",
    r"(?i)\bfamiliar",
    r"(?i)\bat\s+least\b",
    r"(?i)\bminimum\b",
    r"(?i)\bcertifi(?:cation|cations|ed)\b",
    r"(?i)\brequired\b",
    r"(?i)\bpreferred\b",
    r"(?i)\bmust\s+have\b",
    r"(?i)\bfluen(?:t|cy)\b",
    r"(?i)\bgood\s+command\b",
    r"\b(?:HKDSE|HKCEE|HKALE|HKICPA|CPA|ACCA|CFA)\b",
    "學位",
    "學士",
    "碩士",
    "年經驗",
    "年以上",
    "熟練",
    "熟悉",
    "了解",
    "至少",
    "最少",
    "認證",
    "必須",
    "需要",
    "具備",
    "擁有",
    "優先",
    "學歷",
];

/// Weak requirement signals: skill and soft-skill vocabulary.
pub const SKILL_TERMS: &[&str] = &[
    "sql",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "git",
    "agile",
    "scrum",
    "programming",
    "interpersonal",
    "problem solving",
    "problem-solving",
    "written",
    "spoken",
    "english",
    "cantonese",
    "mandarin",
    "strong",
    "proven",
    "solid",
    "excellent",
    "英語",
    "粵語",
    "普通話",
    "溝通能力",
];

/// Text set entirely in capitals. Treated as a banner unless it carries a
/// qualification or skill signal.
pub const BANNER_PATTERN: &str = r"^[A-Z0-9][A-Z0-9\s&/:|.,\-]*$";

/// Page chrome and navigation text.
pub const NOISE_PATTERNS: &[&str] = &[
    r"(?i)\bquick\s+apply\b",
    r"(?i)\bview\s+all\b",
    r"(?i)\bshow\s+(?:all|more)\b",
    r"(?i)\bapply\s+now\b",
    r"(?i)\bsave\s+job\b",
    r"(?i)\bhow\s+you\s+match\b",
    r"(?i)\bskills\s+and\s+credentials\b",
    r"(?i)\breport\s+this\s+job\b",
    r"(?i)\bsign\s+(?:in|up)\b",
    r"(?i)\bshare\b",
    r"(?i)\bprint\b",
    r"^\s*\d+\s*/\s*\d+\s*$",
    r"(?i)^\s*page\s+\d+",
    r"(?i)^\s*(?:next|previous|prev)(?:\s+page)?\s*$",
    r"(?i)\b\d+\s*(?:d|h|m|days?|hours?|minutes?)\s+ago\b",
    r"^\s*[×✕✖xX]\s*$",
    r"(?i)\bcookies?\b",
    r"(?i)\bprivacy\s+policy\b",
    r"(?i)\bterms\s+(?:of\s+(?:use|service)|and\s+conditions)\b",
    "申請",
    "分享",
    "打印",
    "收藏",
    "登錄",
    "註冊",
    "搜索",
    "查看",
    "關於我們",
];

/// Keywords that identify a responsibilities section heading.
pub const RESPONSIBILITY_SECTION_KEYWORDS: &[&str] = &[
    "responsibilities",
    "job responsibilities",
    "duties",
    "key responsibilities",
    "what you will do",
    "what you'll do",
    "your role",
    "職責",
    "工作職責",
    "主要職責",
    "你將要做",
    "工作內容",
];

/// Keywords that identify a requirements section heading.
pub const REQUIREMENT_SECTION_KEYWORDS: &[&str] = &[
    "requirements",
    "job requirements",
    "qualifications",
    "skills",
    "experience",
    "education",
    "what we are looking for",
    "who you are",
    "要求",
    "職位要求",
    "資格",
    "技能",
    "經驗",
    "學歷",
    "我們尋找",
    "申請條件",
];

/// The full rule set a classifier is compiled from.
///
/// Defaults come from the tables above. Each list can be extended per locale
/// or per site without touching the classification order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRules {
    /// Leading Latin action verbs (literals).
    pub action_verbs_en: Vec<String>,
    /// Leading CJK action verbs (literals).
    pub action_verbs_zh: Vec<String>,
    /// Responsibility phrases (literals).
    pub responsibility_phrases: Vec<String>,
    /// Strong requirement signals (patterns).
    pub qualification_patterns: Vec<String>,
    /// Weak requirement signals (literals, matched on word boundaries).
    pub skill_terms: Vec<String>,
    /// Noise patterns.
    pub noise_patterns: Vec<String>,
    /// Platform brand names, treated as noise (literals).
    pub brand_terms: Vec<String>,
}

fn owned(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| (*s).to_string()).collect()
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            action_verbs_en: owned(ACTION_VERBS_EN),
            action_verbs_zh: owned(ACTION_VERBS_ZH),
            responsibility_phrases: owned(RESPONSIBILITY_PHRASES),
            qualification_patterns: owned(QUALIFICATION_PATTERNS),
            skill_terms: owned(SKILL_TERMS),
            noise_patterns: owned(NOISE_PATTERNS),
            brand_terms: vec!["jobsdb".to_string()],
        }
    }
}

impl ClassifierRules {
    /// Creates the default rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the brand terms.
    #[must_use]
    pub fn with_brand_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brand_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a brand term.
    #[must_use]
    pub fn with_brand_term(mut self, term: impl Into<String>) -> Self {
        self.brand_terms.push(term.into());
        self
    }

    /// Adds a noise pattern.
    #[must_use]
    pub fn with_noise_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.noise_patterns.push(pattern.into());
        self
    }

    /// Adds a leading action verb. Verbs containing CJK characters go to the
    /// CJK table, everything else to the Latin one.
    #[must_use]
    pub fn with_action_verb(mut self, verb: impl Into<String>) -> Self {
        let verb = verb.into();
        if verb.chars().any(is_cjk) {
            self.action_verbs_zh.push(verb);
        } else {
            self.action_verbs_en.push(verb);
        }
        self
    }

    /// Adds a responsibility phrase.
    #[must_use]
    pub fn with_responsibility_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.responsibility_phrases.push(phrase.into());
        self
    }

    /// Adds a literal qualification term.
    #[must_use]
    pub fn with_qualification_term(mut self, term: impl Into<String>) -> Self {
        let pattern = format!("(?i){}", bounded_literal(&term.into()));
        self.qualification_patterns.push(pattern);
        self
    }

    /// Adds a skill term.
    #[must_use]
    pub fn with_skill_term(mut self, term: impl Into<String>) -> Self {
        self.skill_terms.push(term.into());
        self
    }
}

/// Escapes `term` and anchors it on word boundaries where its edges are word
/// characters. CJK text has no word boundaries, so CJK terms stay unanchored.
pub(crate) fn bounded_literal(term: &str) -> String {
    let escaped = regex::escape(term);
    let anchor = |c: Option<char>| match c {
        Some(c) if c.is_alphanumeric() && !is_cjk(c) => r"\b",
        _ => "",
    };
    format!(
        "{}{}{}",
        anchor(term.chars().next()),
        escaped,
        anchor(term.chars().last())
    )
}

/// Whether `c` is a CJK ideograph.
#[must_use]
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_builtin_patterns_compile() {
        for pattern in QUALIFICATION_PATTERNS
            .iter()
            .chain(NOISE_PATTERNS)
            .chain([&BANNER_PATTERN])
        {
            assert!(Regex::new(pattern).is_ok(), "pattern failed: {pattern}");
        }
    }

    #[test]
    fn test_tables_have_no_blank_entries() {
        for table in [
            ACTION_VERBS_EN,
            ACTION_VERBS_ZH,
            RESPONSIBILITY_PHRASES,
            SKILL_TERMS,
            RESPONSIBILITY_SECTION_KEYWORDS,
            REQUIREMENT_SECTION_KEYWORDS,
        ] {
            assert!(!table.is_empty());
            assert!(table.iter().all(|entry| !entry.trim().is_empty()));
        }
    }

    #[test]
    fn test_default_rules_include_brand() {
        let rules = ClassifierRules::default();
        assert_eq!(rules.brand_terms, vec!["jobsdb".to_string()]);
    }

    #[test]
    fn test_with_action_verb_routes_by_script() {
        let rules = ClassifierRules::new()
            .with_action_verb("orchestrate")
            .with_action_verb("統籌");

        assert!(rules.action_verbs_en.contains(&"orchestrate".to_string()));
        assert!(rules.action_verbs_zh.contains(&"統籌".to_string()));
    }

    #[test]
    fn test_with_qualification_term_is_escaped() {
        let rules = ClassifierRules::new().with_qualification_term("C++");
        let pattern = rules.qualification_patterns.last().unwrap();
        assert!(Regex::new(pattern).is_ok());
    }

    #[test]
    fn test_bounded_literal() {
        assert_eq!(bounded_literal("sql"), r"\bsql\b");
        assert_eq!(bounded_literal("C++"), r"\bC\+\+");
        assert_eq!(bounded_literal("英語"), "英語");

        let re = Regex::new(&format!("(?i){}", bounded_literal("C++"))).unwrap();
        assert!(re.is_match("Strong C++ skills"));
    }

    #[test]
    fn test_is_cjk() {
        assert!(is_cjk('負'));
        assert!(!is_cjk('a'));
        assert!(!is_cjk('•'));
    }
}
