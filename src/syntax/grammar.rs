//! Grammar resources and their compiled form
//!
//! A grammar is loaded from YAML (or JSON) into [`GrammarData`] and then
//! compiled into a [`Grammar`]: every pattern becomes an anchored regex and
//! every style entry becomes a [`BreakPolicy`]. Compilation is where all
//! configuration errors surface; a compiled grammar never fails to scan.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GrammarConfigError;

/// Name and class of the built-in fallback token type
pub const PLAIN_TYPE: &str = "plain";

/// Grammar id of the built-in plain text grammar
pub const PLAIN_GRAMMAR_ID: &str = "text";

/// Matches exactly one character, newlines included
const ANY_CHAR: &str = "(?s:.)";

// ============================================================================
// Raw resource data
// ============================================================================

/// Raw grammar as parsed from a resource file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub mime_types: Vec<String>,
    /// Ordered rules; the first eligible match wins
    #[serde(default)]
    pub rules: Vec<RuleData>,
    /// Style and break policy per token type name
    #[serde(default)]
    pub styles: BTreeMap<String, StyleData>,
}

/// A single token type rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleData {
    pub name: String,
    pub pattern: String,
    /// Only eligible when the previous token's type is one of these
    #[serde(default)]
    pub from: Option<Vec<String>>,
}

/// Style entry for a token type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleData {
    #[serde(alias = "className")]
    pub class: String,
    #[serde(default, alias = "breakOn")]
    pub break_on: Option<String>,
    #[serde(default, alias = "breakAfter")]
    pub break_after: Option<String>,
}

impl GrammarData {
    pub fn from_yaml(content: &str) -> Result<Self, GrammarConfigError> {
        serde_yaml::from_str(content).map_err(|e| GrammarConfigError::Parse(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self, GrammarConfigError> {
        serde_json::from_str(content).map_err(|e| GrammarConfigError::Parse(e.to_string()))
    }
}

// ============================================================================
// Compiled grammar
// ============================================================================

/// A regex that only matches anchored at the offset it is tested at
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    fn any_char() -> Self {
        Self::new(ANY_CHAR).expect("single-character pattern compiles")
    }

    /// The pattern as written in the resource
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte length of the match anchored at byte offset `at`, if any.
    ///
    /// A zero-length match is reported as `Some(0)`; callers decide whether
    /// that counts.
    pub fn match_len(&self, text: &str, at: usize) -> Option<usize> {
        self.regex.find(&text[at..]).map(|m| m.end())
    }
}

/// How the extent of a token of some type is determined
#[derive(Debug, Clone)]
pub enum BreakPolicy {
    /// Grow one character at a time until `boundary` matches
    ContinuousScan { boundary: Pattern },
    /// Take the whole anchored match of `span` in one step
    ChunkMatch { span: Pattern },
}

/// Presentation class and break policy of a token type
#[derive(Debug, Clone)]
pub struct TokenStyle {
    pub class_name: Arc<str>,
    pub policy: BreakPolicy,
}

/// Compiled rule: the token type `name` begins wherever `pattern` matches
#[derive(Debug, Clone)]
pub struct TokenTypeRule {
    pub name: Arc<str>,
    pub pattern: Pattern,
    pub predecessors: Option<HashSet<String>>,
}

impl TokenTypeRule {
    /// Whether this rule may fire after a token of type `previous`
    pub fn accepts_predecessor(&self, previous: Option<&str>) -> bool {
        match &self.predecessors {
            None => true,
            Some(allowed) => previous.is_some_and(|p| allowed.contains(p)),
        }
    }
}

/// A validated, ready-to-scan grammar
#[derive(Debug, Clone)]
pub struct Grammar {
    id: String,
    name: String,
    rules: Vec<TokenTypeRule>,
    styles: HashMap<String, TokenStyle>,
    plain_name: Arc<str>,
    plain_style: TokenStyle,
}

impl Grammar {
    /// Validate and compile raw grammar data
    pub fn compile(data: GrammarData) -> Result<Self, GrammarConfigError> {
        let mut styles = HashMap::with_capacity(data.styles.len());
        for (type_name, style) in &data.styles {
            let policy = match (&style.break_on, &style.break_after) {
                (Some(boundary), None) => BreakPolicy::ContinuousScan {
                    boundary: compile_pattern(type_name, boundary)?,
                },
                (None, Some(span)) => BreakPolicy::ChunkMatch {
                    span: compile_pattern(type_name, span)?,
                },
                (Some(_), Some(_)) => {
                    return Err(GrammarConfigError::AmbiguousBreakPolicy {
                        token_type: type_name.clone(),
                    })
                }
                (None, None) => {
                    return Err(GrammarConfigError::MissingBreakPolicy {
                        token_type: type_name.clone(),
                    })
                }
            };
            styles.insert(
                type_name.clone(),
                TokenStyle {
                    class_name: Arc::from(style.class.as_str()),
                    policy,
                },
            );
        }

        let mut rules = Vec::with_capacity(data.rules.len());
        for rule in &data.rules {
            if !styles.contains_key(&rule.name) {
                return Err(GrammarConfigError::UnknownTokenType {
                    rule: rule.name.clone(),
                });
            }
            rules.push(TokenTypeRule {
                name: Arc::from(rule.name.as_str()),
                pattern: compile_pattern(&rule.name, &rule.pattern)?,
                predecessors: rule
                    .from
                    .as_ref()
                    .map(|names| names.iter().cloned().collect()),
            });
        }

        let name = data.name.clone().unwrap_or_else(|| data.id.clone());
        tracing::debug!(
            "Compiled grammar '{}' ({} rules, {} styles)",
            data.id,
            rules.len(),
            styles.len()
        );

        Ok(Self {
            id: data.id,
            name,
            rules,
            styles,
            plain_name: Arc::from(PLAIN_TYPE),
            plain_style: plain_style(),
        })
    }

    /// The built-in plain text grammar: every character is its own `plain` token
    pub fn plain_text() -> Self {
        Self::plain_text_with_id(PLAIN_GRAMMAR_ID)
    }

    /// Plain text grammar registered under another language's id (fallback)
    pub fn plain_text_with_id(id: &str) -> Self {
        let plain_name: Arc<str> = Arc::from(PLAIN_TYPE);
        let mut styles = HashMap::new();
        styles.insert(PLAIN_TYPE.to_string(), plain_style());
        Self {
            id: id.to_string(),
            name: "Plain Text".to_string(),
            rules: vec![TokenTypeRule {
                name: plain_name.clone(),
                pattern: Pattern::any_char(),
                predecessors: None,
            }],
            styles,
            plain_name,
            plain_style: plain_style(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[TokenTypeRule] {
        &self.rules
    }

    /// Style entry for a realized token type
    pub fn style(&self, type_name: &str) -> Option<&TokenStyle> {
        self.styles.get(type_name)
    }

    /// The fallback type used where no rule matches
    pub fn plain_name(&self) -> &Arc<str> {
        &self.plain_name
    }

    pub fn plain_style(&self) -> &TokenStyle {
        &self.plain_style
    }
}

fn plain_style() -> TokenStyle {
    TokenStyle {
        class_name: Arc::from(PLAIN_TYPE),
        policy: BreakPolicy::ContinuousScan {
            boundary: Pattern::any_char(),
        },
    }
}

fn compile_pattern(owner: &str, source: &str) -> Result<Pattern, GrammarConfigError> {
    Pattern::new(source).map_err(|e| GrammarConfigError::InvalidPattern {
        owner: owner.to_string(),
        pattern: source.to_string(),
        message: e.to_string(),
    })
}
