//! Post-construction validation
//!
//! A variant declares the fields it needs; [`construct_validated`] runs the
//! caller's construction logic first and checks the declaration afterwards,
//! so fields set during construction are visible to the check.

use klaxon_core::ConfigurationError;
use tracing::debug;

/// Declared required fields of a variant
pub trait RequiredFields {
    /// Type name reported in errors
    fn type_name(&self) -> &str;

    /// Fields that must be present before the operation may run
    fn required_fields(&self) -> &'static [&'static str];

    /// Whether `field` is populated on this instance
    fn has_field(&self, field: &str) -> bool;

    /// Check every required field, failing on the first missing one
    fn validate(&self) -> Result<(), ConfigurationError> {
        match self
            .required_fields()
            .iter()
            .find(|field| !self.has_field(field))
        {
            Some(field) => Err(ConfigurationError::missing_field(self.type_name(), *field)),
            None => Ok(()),
        }
    }
}

/// Run `build`, then validate the instance it produced
pub fn construct_validated<T, F>(build: F) -> Result<T, ConfigurationError>
where
    T: RequiredFields,
    F: FnOnce() -> T,
{
    let instance = build();
    instance.validate()?;
    debug!(
        variant = instance.type_name(),
        fields = ?instance.required_fields(),
        "Post-construction validation passed"
    );
    Ok(instance)
}
