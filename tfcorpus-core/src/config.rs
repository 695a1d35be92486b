//! Configuration management for `tfcorpus-core`.
//!
//! This module defines the redaction rules and the tunable knobs of the cleaning
//! pipeline (size limits, quote tracking, instruction template). Configuration is
//! YAML; the built-in defaults are embedded at compile time and a user file can be
//! merged over them.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::comments::QuoteTracking;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Files shorter than this (in characters) are rejected, before and after cleaning.
pub const DEFAULT_MIN_CHARS: usize = 50;

/// Files longer than this (in characters) are rejected.
pub const DEFAULT_MAX_CHARS: usize = 50_000;

pub const DEFAULT_INSTRUCTION_TEMPLATE: &str =
    "Write Terraform code for {cloud} {service} ({topic} configuration).";

/// How a rule's replacement is spliced into the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleShape {
    /// Group 1 (key and opening quote) and group 2 (closing quote) are kept,
    /// only the value between them becomes the placeholder.
    #[default]
    KeyValue,
    /// The entire match is replaced by the placeholder.
    Bare,
}

/// A single sensitive-value detection rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactionRule {
    /// Unique identifier for the rule (e.g., "password").
    pub name: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: Option<String>,
    pub shape: RuleShape,
    /// Placeholder reference emitted in place of the secret.
    pub replace_with: String,
    /// If true, enables multiline mode for the regex engine.
    pub multiline: bool,
    /// If true, the dot character `.` in regex will match newlines.
    pub dot_matches_new_line: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl Hash for RedactionRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.pattern.hash(state);
        self.shape.hash(state);
        self.replace_with.hash(state);
        self.multiline.hash(state);
        self.dot_matches_new_line.hash(state);
        self.enabled.hash(state);
    }
}

impl Default for RedactionRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            pattern: None,
            shape: RuleShape::KeyValue,
            replace_with: "var.redacted".to_string(),
            multiline: false,
            dot_matches_new_line: false,
            enabled: None,
        }
    }
}

/// Size gates of the pipeline. `None` falls back to the built-in default.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LimitsConfig {
    pub min_chars: Option<usize>,
    pub max_chars: Option<usize>,
}

impl LimitsConfig {
    pub fn min_chars(&self) -> usize {
        self.min_chars.unwrap_or(DEFAULT_MIN_CHARS)
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars.unwrap_or(DEFAULT_MAX_CHARS)
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CommentsConfig {
    pub quote_tracking: Option<QuoteTracking>,
}

impl CommentsConfig {
    pub fn quote_tracking(&self) -> QuoteTracking {
        self.quote_tracking.unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RecordsConfig {
    /// TinyTemplate source with `cloud`, `service` and `topic` in scope.
    pub instruction_template: Option<String>,
}

impl RecordsConfig {
    pub fn instruction_template(&self) -> &str {
        self.instruction_template
            .as_deref()
            .unwrap_or(DEFAULT_INSTRUCTION_TEMPLATE)
    }
}

/// Top-level configuration of a cleaning run.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CleanerConfig {
    /// Redaction rules, applied in this order.
    pub rules: Vec<RedactionRule>,
    pub limits: LimitsConfig,
    pub comments: CommentsConfig,
    pub records: RecordsConfig,
}

impl CleanerConfig {
    /// Loads a configuration from a YAML file and validates its rules.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading cleaner config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: CleanerConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rules(&config.rules)?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in configuration embedded in the library.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: CleanerConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Drops the named rules. Unknown names are reported and otherwise ignored.
    pub fn disable_rules(&mut self, disable_rules: &[String]) {
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();
        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable` list does not exist.", rule_name);
        }

        self.rules.retain(|rule| !disable_set.contains(rule.name.as_str()));
        debug!("Active rules count after filtering: {}", self.rules.len());
    }
}

/// Merges a user configuration over the defaults.
///
/// A user rule replaces the default rule of the same name in place, so rule
/// order stays stable; rules with new names are appended. Scalar settings are
/// taken from the user file only when it sets them.
pub fn merge_config(default_config: CleanerConfig, user_config: Option<CleanerConfig>) -> CleanerConfig {
    let Some(user_cfg) = user_config else {
        return default_config;
    };
    debug!("Merging {} user rules over {} defaults.", user_cfg.rules.len(), default_config.rules.len());

    let mut rules = default_config.rules;
    for user_rule in user_cfg.rules {
        match rules.iter_mut().find(|r| r.name == user_rule.name) {
            Some(existing) => *existing = user_rule,
            None => rules.push(user_rule),
        }
    }

    CleanerConfig {
        rules,
        limits: LimitsConfig {
            min_chars: user_cfg.limits.min_chars.or(default_config.limits.min_chars),
            max_chars: user_cfg.limits.max_chars.or(default_config.limits.max_chars),
        },
        comments: CommentsConfig {
            quote_tracking: user_cfg
                .comments
                .quote_tracking
                .or(default_config.comments.quote_tracking),
        },
        records: RecordsConfig {
            instruction_template: user_cfg
                .records
                .instruction_template
                .or(default_config.records.instruction_template),
        },
    }
}

/// Validates rule integrity (names, regex compilation, capture groups).
fn validate_rules(rules: &[RedactionRule]) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        let pattern = match &rule.pattern {
            Some(p) if !p.is_empty() => p,
            _ => {
                errors.push(format!("Rule '{}' is missing the `pattern` field.", rule.name));
                continue;
            }
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.name, e));
                continue;
            }
        };

        let groups = regex.captures_len() - 1;
        if rule.shape == RuleShape::KeyValue && groups < 2 {
            errors.push(format!(
                "Rule '{}': key_value rules need 2 capture groups, pattern has {}.",
                rule.name, groups
            ));
        }
    }

    if !errors.is_empty() {
        Err(anyhow!("Rule validation failed:\n{}", errors.join("\n")))
    } else {
        Ok(())
    }
}
