//! Injection-signature rule table
//!
//! Detection is data-driven: every rule is a row with a stable name, a regex
//! source, and a category. Extending coverage means adding a row, not
//! another branch. Rows that fail to compile are skipped at startup so one
//! bad pattern never takes the whole matcher down.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Rule table version, bumped whenever rows change
pub const PATTERN_TABLE_VERSION: &str = "1.0.0";

/// What a detection rule flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    /// Script or markup smuggled into text fields
    MarkupInjection,
    /// Calls into code-execution sinks
    CodeExecution,
    /// Filesystem path traversal, raw or percent-encoded
    PathTraversal,
    /// SQL keywords in suspicious combination
    SqlInjection,
    /// Access to privileged browser objects
    BrowserAccess,
}

/// A single detection rule
#[derive(Debug, Clone, Copy)]
pub struct SuspiciousPattern {
    /// Stable rule name, recorded when the rule fires
    pub name: &'static str,
    /// Regex source
    pub pattern: &'static str,
    /// What the rule detects
    pub category: PatternCategory,
}

/// The ordered rule set
pub static SUSPICIOUS_PATTERNS: &[SuspiciousPattern] = &[
    // script and markup injection
    SuspiciousPattern {
        name: "script_tag",
        pattern: r"(?i)<script",
        category: PatternCategory::MarkupInjection,
    },
    SuspiciousPattern {
        name: "javascript_url",
        pattern: r"(?i)javascript\s*:",
        category: PatternCategory::MarkupInjection,
    },
    SuspiciousPattern {
        name: "event_handler_attr",
        pattern: r"(?i)\bon\w+\s*=",
        category: PatternCategory::MarkupInjection,
    },
    SuspiciousPattern {
        name: "iframe_tag",
        pattern: r"(?i)<iframe",
        category: PatternCategory::MarkupInjection,
    },
    SuspiciousPattern {
        name: "object_tag",
        pattern: r"(?i)<object",
        category: PatternCategory::MarkupInjection,
    },
    SuspiciousPattern {
        name: "embed_tag",
        pattern: r"(?i)<embed",
        category: PatternCategory::MarkupInjection,
    },
    // code-execution sinks
    SuspiciousPattern {
        name: "eval_call",
        pattern: r"(?i)\beval\s*\(",
        category: PatternCategory::CodeExecution,
    },
    SuspiciousPattern {
        name: "exec_call",
        pattern: r"(?i)\bexec\s*\(",
        category: PatternCategory::CodeExecution,
    },
    SuspiciousPattern {
        name: "system_call",
        pattern: r"(?i)\bsystem\s*\(",
        category: PatternCategory::CodeExecution,
    },
    // path traversal
    SuspiciousPattern {
        name: "dot_dot_slash",
        pattern: r"\.\./",
        category: PatternCategory::PathTraversal,
    },
    SuspiciousPattern {
        name: "dot_dot_backslash",
        pattern: r"\.\.\\",
        category: PatternCategory::PathTraversal,
    },
    SuspiciousPattern {
        name: "encoded_traversal",
        pattern: r"(?i)(\.\.|%2e%2e)(%2f|%5c)|%2e%2e(/|\\)",
        category: PatternCategory::PathTraversal,
    },
    SuspiciousPattern {
        name: "null_byte",
        pattern: r"\x00|%00",
        category: PatternCategory::PathTraversal,
    },
    // SQL keywords in suspicious combination
    SuspiciousPattern {
        name: "sql_select_from",
        pattern: r"(?i)\bselect\b.+\bfrom\b",
        category: PatternCategory::SqlInjection,
    },
    SuspiciousPattern {
        name: "sql_union_select",
        pattern: r"(?i)\bunion\s+(all\s+)?select\b",
        category: PatternCategory::SqlInjection,
    },
    SuspiciousPattern {
        name: "sql_insert_into",
        pattern: r"(?i)\binsert\s+into\b",
        category: PatternCategory::SqlInjection,
    },
    SuspiciousPattern {
        name: "sql_delete_from",
        pattern: r"(?i)\bdelete\s+from\b",
        category: PatternCategory::SqlInjection,
    },
    SuspiciousPattern {
        name: "sql_drop_table",
        pattern: r"(?i)\bdrop\s+table\b",
        category: PatternCategory::SqlInjection,
    },
    SuspiciousPattern {
        name: "sql_update_set",
        pattern: r"(?i)\bupdate\b.+\bset\b",
        category: PatternCategory::SqlInjection,
    },
    // privileged browser object access
    SuspiciousPattern {
        name: "document_cookie",
        pattern: r"(?i)document\s*\.\s*cookie",
        category: PatternCategory::BrowserAccess,
    },
    SuspiciousPattern {
        name: "window_location",
        pattern: r"(?i)window\s*\.\s*location",
        category: PatternCategory::BrowserAccess,
    },
];

/// Compiled rules, in table order
static COMPILED_PATTERNS: Lazy<Vec<(Regex, &'static SuspiciousPattern)>> = Lazy::new(|| {
    SUSPICIOUS_PATTERNS
        .iter()
        .filter_map(|rule| match Regex::new(rule.pattern) {
            Ok(regex) => Some((regex, rule)),
            Err(err) => {
                warn!(rule = rule.name, %err, "skipping uncompilable pattern rule");
                None
            }
        })
        .collect()
});

/// True when `input` matches any rule in the table
pub fn contains_suspicious_patterns(input: &str) -> bool {
    COMPILED_PATTERNS
        .iter()
        .any(|(regex, _)| regex.is_match(input))
}

/// Every rule matching `input`, in table order
pub fn matching_patterns(input: &str) -> Vec<&'static SuspiciousPattern> {
    COMPILED_PATTERNS
        .iter()
        .filter(|(regex, _)| regex.is_match(input))
        .map(|(_, rule)| *rule)
        .collect()
}
