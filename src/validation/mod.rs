//! Protocol version validation
//!
//! Checks that the lines of a playlist only use features available at the
//! version declared by EXT-X-VERSION. Without a VERSION tag no constraint
//! applies and validation returns nothing.
//!
//! Violations are data, never errors; the caller decides how severe they are.

pub mod rules;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ValidationConfig;
use crate::error::{PlaylistError, Result};
use crate::tags::Tag;

pub use rules::{builtin_rules, VersionRule};

/// One rule failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionViolation {
    /// 0-based line index
    pub line_number: usize,
    pub line_text: String,
    pub message: String,
}

/// Rule registry
#[derive(Debug)]
pub struct Validator {
    rules: Vec<VersionRule>,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }
}

impl Validator {
    /// Registry holding the built-in rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in rules minus the ones the config disables
    pub fn from_config(config: &ValidationConfig) -> Result<Self> {
        let mut validator = Self::new();
        for name in &config.disabled_rules {
            if !validator.rules.iter().any(|r| r.name() == name) {
                return Err(PlaylistError::Config(format!("unknown version rule: {}", name)));
            }
            validator.rules.retain(|r| r.name() != name);
        }
        debug!(rules = ?validator.rule_names(), "version rules enabled");
        Ok(validator)
    }

    pub fn register(&mut self, rule: VersionRule) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: VersionRule) -> Self {
        self.register(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(VersionRule::name).collect()
    }

    /// Evaluate every rule against every line.
    ///
    /// Violations come out in document order, rules in registry order within
    /// a line.
    pub fn validate<S: AsRef<str>>(&self, lines: &[S]) -> Vec<VersionViolation> {
        let Some(version) = declared_version(lines) else {
            return Vec::new();
        };

        let mut violations = Vec::new();
        for (line_number, line) in lines.iter().enumerate() {
            let line = line.as_ref().trim();
            for rule in &self.rules {
                if let Some(message) = rule.check(line, version) {
                    violations.push(VersionViolation {
                        line_number,
                        line_text: line.to_string(),
                        message,
                    });
                }
            }
        }

        if !violations.is_empty() {
            debug!(version, count = violations.len(), "version violations found");
        }
        violations
    }

    /// Split `text` into lines and validate them
    pub fn validate_text(&self, text: &str) -> Vec<VersionViolation> {
        let lines: Vec<&str> = text.lines().collect();
        self.validate(&lines)
    }
}

/// Validate `lines` with the built-in rules
pub fn validate<S: AsRef<str>>(lines: &[S]) -> Vec<VersionViolation> {
    Validator::new().validate(lines)
}

/// The version declared by the last EXT-X-VERSION line, matching the parser.
///
/// An unparseable value counts as no declaration.
pub fn declared_version<S: AsRef<str>>(lines: &[S]) -> Option<f64> {
    let value = lines.iter().rev().find_map(|line| match Tag::classify(line.as_ref().trim()) {
        Some((Tag::Version, value)) => Some(value.trim().to_string()),
        _ => None,
    })?;

    match value.parse::<f64>() {
        Ok(version) if version.is_finite() => Some(version),
        _ => {
            warn!("ignoring unparseable EXT-X-VERSION value: {}", value);
            None
        }
    }
}
