//! Helpers over `validator` errors shared by the form, domain and service
//! layers.

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Builds a field error carrying a human readable message.
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Moves every field error of `other` into `into`.
pub fn merge_errors(into: &mut ValidationErrors, other: ValidationErrors) {
    for (field, kind) in other.into_errors() {
        let ValidationErrorsKind::Field(mut incoming) = kind else {
            continue;
        };
        if let ValidationErrorsKind::Field(existing) = into
            .errors_mut()
            .entry(field)
            .or_insert_with(|| ValidationErrorsKind::Field(Vec::new()))
        {
            existing.append(&mut incoming);
        }
    }
}

/// Messages recorded for `field`, falling back to the error code.
pub fn messages(errors: &ValidationErrors, field: &str) -> Vec<String> {
    match errors.errors().get(field) {
        Some(ValidationErrorsKind::Field(list)) => list.iter().map(message_of).collect(),
        _ => Vec::new(),
    }
}

/// All field messages keyed by field name, in a stable order for templates.
pub fn messages_by_field(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .errors()
        .iter()
        .filter_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => {
                Some((field.to_string(), list.iter().map(message_of).collect()))
            }
            _ => None,
        })
        .collect()
}

fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| error.code.to_string())
}
