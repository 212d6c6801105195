//! Configuration validation traits and utilities
//!
//! Validation collects every violation instead of stopping at the first one,
//! so a submitter sees the whole list of missing fields in one response.

use crate::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration
pub trait Validatable {
    /// Every rule this configuration breaks, in field order
    fn violations(&self) -> Vec<String>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                domain: self.domain_name().to_string(),
                violations,
            })
        }
    }
}

/// Record a violation when a required string is blank
pub fn require_non_blank(value: &str, field_name: &str, violations: &mut Vec<String>) {
    if value.trim().is_empty() {
        violations.push(format!("{} is required", field_name));
    }
}

/// Record a violation when a required number is zero
pub fn require_positive<T>(value: T, field_name: &str, violations: &mut Vec<String>)
where
    T: PartialOrd + Default,
{
    if value <= T::default() {
        violations.push(format!("{} is required", field_name));
    }
}

/// Record a violation when a name is not a plain identifier
///
/// Names end up in SQL statements, so only ASCII letters, digits and
/// underscores are accepted, and the first character must not be a digit.
pub fn require_identifier(value: &str, field_name: &str, violations: &mut Vec<String>) {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if !valid && !value.trim().is_empty() {
        violations.push(format!(
            "{} may only contain letters, digits and underscores, got '{}'",
            field_name, value
        ));
    }
}

/// Record a violation when a ratio falls outside `0.0..=1.0`
pub fn require_ratio(value: f64, field_name: &str, violations: &mut Vec<String>) {
    if !(0.0..=1.0).contains(&value) {
        violations.push(format!("{} must be between 0.0 and 1.0, got {}", field_name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: String,
        count: u32,
    }

    impl Validatable for Sample {
        fn violations(&self) -> Vec<String> {
            let mut violations = Vec::new();
            require_non_blank(&self.name, "name", &mut violations);
            require_positive(self.count, "count", &mut violations);
            violations
        }

        fn domain_name(&self) -> &'static str {
            "sample"
        }
    }

    #[test]
    fn validate_collects_every_violation() {
        let sample = Sample {
            name: "   ".to_string(),
            count: 0,
        };

        let err = sample.validate().unwrap_err();
        assert_eq!(err.violations(), ["name is required", "count is required"]);
        assert_eq!(
            err.to_string(),
            "Invalid sample configuration: name is required; count is required"
        );
    }

    #[test]
    fn validate_passes_clean_config() {
        let sample = Sample {
            name: "ok".to_string(),
            count: 1,
        };
        assert!(sample.validate().is_ok());
    }

    #[test]
    fn identifiers_reject_sql_metacharacters() {
        let mut violations = Vec::new();
        require_identifier("records", "collection_name", &mut violations);
        require_identifier("_stores_2", "collection_name", &mut violations);
        assert!(violations.is_empty());

        require_identifier("records; DROP TABLE x", "collection_name", &mut violations);
        require_identifier("9lives", "collection_name", &mut violations);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn blank_identifiers_are_left_to_the_required_check() {
        let mut violations = Vec::new();
        require_identifier("", "collection_name", &mut violations);
        assert!(violations.is_empty());
    }

    #[test]
    fn ratios_must_be_in_unit_interval() {
        let mut violations = Vec::new();
        require_ratio(0.0, "failure_rate", &mut violations);
        require_ratio(1.0, "failure_rate", &mut violations);
        assert!(violations.is_empty());

        require_ratio(1.5, "failure_rate", &mut violations);
        require_ratio(-0.1, "failure_rate", &mut violations);
        assert_eq!(violations.len(), 2);
    }
}
