//! compiler.rs - Manages the compilation and caching of redaction rules.
//!
//! Converts the rule list of a `CleanerConfig` into `CompiledRules`. Compiled
//! sets are cached process-wide, keyed by a hash of the rule list, so building
//! several `Redactor`s from the same config compiles the regexes once.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{RedactionRule, RuleShape, MAX_PATTERN_LENGTH};
use crate::errors::CorpusError;

/// A single compiled redaction rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// Placeholder reference substituted for the secret.
    pub replace_with: String,
    /// The unique name of the redaction rule.
    pub name: String,
    pub shape: RuleShape,
}

/// All compiled rules, in application order.
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

lazy_static! {
    /// Compiled rule sets keyed by a hash of the rule list.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRules>>> = RwLock::new(HashMap::new());
}

/// Order is significant for redaction, so unlike a set hash the rules are
/// hashed in their given order.
fn hash_rules(rules: &[RedactionRule]) -> u64 {
    let mut hasher = DefaultHasher::new();
    rules.hash(&mut hasher);
    hasher.finish()
}

/// Compiles a list of `RedactionRule`s into `CompiledRules`.
///
/// Rules explicitly disabled (`enabled: false`) or without a pattern are skipped.
/// All compilation failures are collected and reported together.
pub fn compile_rules(rules_to_compile: Vec<RedactionRule>) -> Result<CompiledRules, CorpusError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());

    let mut compiled_rules = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if rule.enabled == Some(false) {
            debug!("Skipping disabled rule '{}'.", &rule.name);
            continue;
        }

        let Some(pattern) = rule.pattern.as_ref() else {
            warn!("Skipping rule '{}' because its pattern is missing.", &rule.name);
            continue;
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(CorpusError::PatternLengthExceeded(
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(pattern)
            .multi_line(rule.multiline)
            .dot_matches_new_line(rule.dot_matches_new_line)
            .size_limit(10 * (1 << 20))
            .build();

        match regex_result {
            Ok(regex) => {
                let groups = regex.captures_len() - 1;
                if rule.shape == RuleShape::KeyValue && groups < 2 {
                    compilation_errors.push(CorpusError::MissingCaptureGroups(rule.name, groups));
                    continue;
                }
                debug!(
                    target: "tfcorpus_core::sanitizer",
                    "Rule '{}' compiled successfully.",
                    &rule.name
                );
                compiled_rules.push(CompiledRule {
                    regex,
                    replace_with: rule.replace_with,
                    name: rule.name,
                    shape: rule.shape,
                });
            }
            Err(e) => {
                compilation_errors.push(CorpusError::RuleCompilationError(rule.name, e));
            }
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(CorpusError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
        Ok(CompiledRules { rules: compiled_rules })
    }
}

/// Gets a `CompiledRules` instance from the cache or compiles and caches it.
pub fn get_or_compile_rules(rules: &[RedactionRule]) -> Result<Arc<CompiledRules>> {
    let cache_key = hash_rules(rules);

    {
        let cache = COMPILED_RULES_CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(compiled) = cache.get(&cache_key) {
            debug!("Serving compiled rules from cache for key: {}", &cache_key);
            return Ok(Arc::clone(compiled));
        }
    }

    debug!("Compiled rules not found in cache. Compiling now.");
    let compiled_arc = Arc::new(compile_rules(rules.to_vec())?);

    COMPILED_RULES_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(cache_key, Arc::clone(&compiled_arc));

    Ok(compiled_arc)
}
