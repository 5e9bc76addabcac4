//! Validation system for configuration values
//!
//! Each config section implements `ConfigSection`, which includes validation.

pub use crate::error::ValidationError;
use std::ops::RangeInclusive;

/// Trait for configuration sections that can validate themselves
///
/// New sections implement this and are added to `Config`; loading, saving
/// and merging pick them up without further changes.
pub trait ConfigSection: Default {
    /// Validates the configuration section
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another config section into this one
    ///
    /// Values from `other` take precedence.
    fn merge(&mut self, other: Self);

    /// Returns the section name for error reporting
    fn section_name(&self) -> &'static str;
}

/// Field checks shared by the sections
pub struct Validator;

impl Validator {
    /// `value` must lie in `range` (inclusive)
    pub fn in_range<T>(value: T, range: RangeInclusive<T>, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if range.contains(&value) {
            return Ok(());
        }
        Err(ValidationError::with_value(
            field,
            format!("must be between {} and {}", range.start(), range.end()),
            value,
        ))
    }

    /// Rejects empty and whitespace-only strings
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        match value.trim() {
            "" => Err(ValidationError::new(field, "must not be empty")),
            _ => Ok(()),
        }
    }

    /// Requires an http(s) URL with a host part
    pub fn http_url(value: &str, field: &str) -> Result<(), ValidationError> {
        let rest = value
            .strip_prefix("http://")
            .or_else(|| value.strip_prefix("https://"));

        match rest {
            Some(rest) if !rest.is_empty() && !rest.starts_with('/') => Ok(()),
            Some(_) => Err(ValidationError::with_value(field, "must include a host", value)),
            None => Err(ValidationError::with_value(
                field,
                "must start with http:// or https://",
                value,
            )),
        }
    }

    /// Keeps the failures of a batch of checks
    pub fn collect_errors<I>(results: I) -> Result<(), Vec<ValidationError>>
    where
        I: IntoIterator<Item = Result<(), ValidationError>>,
    {
        let errors: Vec<_> = results.into_iter().filter_map(Result::err).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
