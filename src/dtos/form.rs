// src/dtos/form.rs
//! Field-level validation errors shared by every form.
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
/// Key for errors that do not belong to a single field.
pub const NON_FIELD: &str = "__all__";

/// Field name to messages, serialized as a plain JSON object for AJAX callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    /// A blank required text field reports only [`REQUIRED`].
    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.0.insert(field.to_string(), vec![REQUIRED.to_string()]);
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (field, list) in errors.field_errors() {
            for error in list.iter() {
                out.add(&field.to_string(), describe(error));
            }
        }
        out
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "length" => match error.params.get("max") {
            Some(max) => format!("Ensure this value has at most {max} characters."),
            None => REQUIRED.to_string(),
        },
        code => format!("Invalid value ({code})."),
    }
}

/// Parses the `estado` select. Blank means active.
pub fn parse_estado(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "off" | "no"
    )
}

/// Parses a required foreign-key selection.
pub fn parse_reference(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match raw.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Select a valid choice.");
            None
        }
    }
}

pub fn parse_float_or_zero(errors: &mut FieldErrors, field: &str, raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            errors.add(field, "Enter a number.");
            0.0
        }
    }
}

pub fn parse_int_or_zero(errors: &mut FieldErrors, field: &str, raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    raw.parse::<i64>().unwrap_or_else(|_| {
        errors.add(field, "Enter a whole number.");
        0
    })
}

pub fn parse_optional_date(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a valid date.");
            None
        }
    }
}
