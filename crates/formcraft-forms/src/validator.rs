//! Submission validator
//!
//! Checks a raw public payload against a form definition, field by
//! field in form order. Failures are collected rather than short-
//! circuited so the submitter sees every problem at once; gating that
//! precedes validation (publication, expiry, submission caps) lives in
//! the service layer.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::field::{FieldConfig, FieldDefinition};
use crate::form::FormDefinition;
use crate::submission::NormalizedData;

/// One rejected field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_id: String,
    pub message: String,
}

impl FieldError {
    fn new(field_id: &str, message: impl Into<String>) -> Self {
        Self {
            field_id: field_id.to_string(),
            message: message.into(),
        }
    }
}

/// Stateless validator; pure with respect to the form definition.
pub struct SubmissionValidator {
    email: Regex,
    phone: Regex,
}

impl Default for SubmissionValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionValidator {
    pub fn new() -> Self {
        Self {
            email: Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$")
                .expect("valid email pattern"),
            phone: Regex::new(r"^\+?[0-9\s\-()]{6,20}$").expect("valid phone pattern"),
        }
    }

    /// Validate `payload` against `form`, producing either the
    /// normalized data mapping or every per-field failure.
    ///
    /// Optional-and-empty fields are skipped and omitted from the
    /// output; unknown payload keys are ignored. Re-running the
    /// validator over its own output yields the same result.
    pub fn validate(
        &self,
        form: &FormDefinition,
        payload: &Map<String, Value>,
    ) -> Result<NormalizedData, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut normalized = NormalizedData::new();

        for field in &form.fields {
            let value = match payload.get(&field.id) {
                Some(value) if !is_empty(Some(value)) => value,
                _ => {
                    if field.required {
                        errors.push(FieldError::new(&field.id, "This field is required"));
                    }
                    continue;
                }
            };

            match self.check_field(field, value) {
                Ok(coerced) => {
                    normalized.insert(field.id.clone(), coerced);
                }
                Err(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }

    fn check_field(&self, field: &FieldDefinition, value: &Value) -> Result<Value, FieldError> {
        match &field.config {
            FieldConfig::Email { .. } => {
                let text = scalar_text(value)
                    .filter(|text| self.email.is_match(text))
                    .ok_or_else(|| {
                        FieldError::new(&field.id, "Please enter a valid email address")
                    })?;
                Ok(Value::String(text))
            }
            FieldConfig::Tel { .. } => {
                let text = scalar_text(value)
                    .filter(|text| self.phone.is_match(text))
                    .ok_or_else(|| {
                        FieldError::new(&field.id, "Please enter a valid phone number")
                    })?;
                Ok(Value::String(text))
            }
            FieldConfig::Number { bounds, .. } => {
                let number = coerce_number(value).ok_or_else(|| {
                    FieldError::new(&field.id, "Please enter a valid number")
                })?;
                if let Some(min) = bounds.min {
                    if number < min {
                        return Err(FieldError::new(
                            &field.id,
                            format!("Value must be at least {}", format_bound(min)),
                        ));
                    }
                }
                if let Some(max) = bounds.max {
                    if number > max {
                        return Err(FieldError::new(
                            &field.id,
                            format!("Value must be at most {}", format_bound(max)),
                        ));
                    }
                }
                Ok(number_value(number))
            }
            FieldConfig::Checkbox => {
                let checked = coerce_bool(value).ok_or_else(|| {
                    FieldError::new(&field.id, "Please provide a valid value")
                })?;
                if field.required && !checked {
                    return Err(FieldError::new(&field.id, "This field is required"));
                }
                Ok(Value::Bool(checked))
            }
            // No shape check beyond required-and-empty for the rest.
            _ => {
                let text = scalar_text(value).ok_or_else(|| {
                    FieldError::new(&field.id, "Please provide a valid value")
                })?;
                Ok(Value::String(text))
            }
        }
    }
}

/// Absent, null and the empty string count as "no answer".
fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

/// Whole numbers normalize to JSON integers, everything else stays f64.
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Value::Number(Number::from(number as i64))
    } else {
        Number::from_f64(number).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::NumericBounds;
    use crate::form::{FormDraft, FormSettings};
    use crate::registry::FieldTypeRegistry;
    use crate::slug::Slug;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn form_with(fields: serde_json::Value) -> FormDefinition {
        let draft: FormDraft = serde_json::from_value(json!({
            "title": "Test form",
            "fields": fields
        }))
        .unwrap();
        let fields =
            crate::form::validate_draft(&draft, &FieldTypeRegistry::builtin()).unwrap();
        FormDefinition {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: draft.title,
            description: None,
            slug: Slug::parse("test-form").unwrap(),
            is_published: true,
            expires_at: None,
            fields,
            settings: FormSettings::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payload(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn optional_and_empty_is_always_valid() {
        let form = form_with(json!([
            { "id": "email", "type": "email", "label": "Email" },
            { "id": "age", "type": "number", "label": "Age" }
        ]));
        let validator = SubmissionValidator::new();

        let normalized = validator
            .validate(&form, &payload(json!({ "email": "", "age": null })))
            .unwrap();
        assert!(normalized.is_empty());
    }

    #[test]
    fn required_and_missing_yields_exactly_one_error_per_field() {
        let form = form_with(json!([
            { "id": "name", "type": "text", "label": "Name", "required": true },
            { "id": "email", "type": "email", "label": "Email", "required": true }
        ]));
        let validator = SubmissionValidator::new();

        let errors = validator.validate(&form, &payload(json!({}))).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.field_id == "name" && e.message == "This field is required")
                .count(),
            1
        );
    }

    #[test]
    fn invalid_email_rejected_with_message() {
        let form = form_with(json!([
            { "id": "email", "type": "email", "label": "Email", "required": true }
        ]));
        let validator = SubmissionValidator::new();

        let errors = validator
            .validate(&form, &payload(json!({ "email": "not-an-email" })))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_id, "email");
        assert_eq!(errors[0].message, "Please enter a valid email address");

        let accepted = validator
            .validate(&form, &payload(json!({ "email": "ada@example.com" })))
            .unwrap();
        assert_eq!(accepted["email"], json!("ada@example.com"));
    }

    #[test]
    fn number_bounds_are_inclusive_and_name_the_violated_bound() {
        let form = form_with(json!([
            { "id": "rating", "type": "number", "label": "Rating",
              "required": true, "min": 1, "max": 10 }
        ]));
        let validator = SubmissionValidator::new();

        let over = validator
            .validate(&form, &payload(json!({ "rating": 15 })))
            .unwrap_err();
        assert_eq!(over[0].message, "Value must be at most 10");

        let under = validator
            .validate(&form, &payload(json!({ "rating": "0" })))
            .unwrap_err();
        assert_eq!(under[0].message, "Value must be at least 1");

        let ok = validator
            .validate(&form, &payload(json!({ "rating": 5 })))
            .unwrap();
        assert_eq!(ok["rating"], json!(5));

        let edge = validator
            .validate(&form, &payload(json!({ "rating": "10" })))
            .unwrap();
        assert_eq!(edge["rating"], json!(10));
    }

    #[test]
    fn number_coerces_strings_and_rejects_garbage() {
        let form = form_with(json!([
            { "id": "n", "type": "number", "label": "N", "required": true }
        ]));
        let validator = SubmissionValidator::new();

        assert_eq!(
            validator
                .validate(&form, &payload(json!({ "n": "3.5" })))
                .unwrap()["n"],
            json!(3.5)
        );
        let errors = validator
            .validate(&form, &payload(json!({ "n": "three" })))
            .unwrap_err();
        assert_eq!(errors[0].message, "Please enter a valid number");
    }

    #[test]
    fn phone_shape_is_permissive_but_bounded() {
        let form = form_with(json!([
            { "id": "phone", "type": "tel", "label": "Phone", "required": true }
        ]));
        let validator = SubmissionValidator::new();

        assert!(validator
            .validate(&form, &payload(json!({ "phone": "+44 (20) 7946-0958" })))
            .is_ok());
        assert!(validator
            .validate(&form, &payload(json!({ "phone": "12345" })))
            .is_err());
        assert!(validator
            .validate(&form, &payload(json!({ "phone": "not a phone" })))
            .is_err());
    }

    #[test]
    fn required_checkbox_must_be_strictly_true() {
        let form = form_with(json!([
            { "id": "terms", "type": "checkbox", "label": "Terms", "required": true }
        ]));
        let validator = SubmissionValidator::new();

        assert!(validator
            .validate(&form, &payload(json!({ "terms": false })))
            .is_err());
        assert!(validator
            .validate(&form, &payload(json!({ "terms": "yes" })))
            .is_err());

        let ok = validator
            .validate(&form, &payload(json!({ "terms": true })))
            .unwrap();
        assert_eq!(ok["terms"], json!(true));
    }

    #[test]
    fn optional_checkbox_keeps_false() {
        let form = form_with(json!([
            { "id": "news", "type": "checkbox", "label": "Newsletter" }
        ]));
        let validator = SubmissionValidator::new();

        let ok = validator
            .validate(&form, &payload(json!({ "news": false })))
            .unwrap();
        assert_eq!(ok["news"], json!(false));
    }

    #[test]
    fn unknown_payload_keys_are_ignored() {
        let form = form_with(json!([
            { "id": "name", "type": "text", "label": "Name" }
        ]));
        let validator = SubmissionValidator::new();

        let normalized = validator
            .validate(
                &form,
                &payload(json!({ "name": "Ada", "injected": "ignored" })),
            )
            .unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized["name"], json!("Ada"));
    }

    #[test]
    fn all_failures_are_collected() {
        let form = form_with(json!([
            { "id": "email", "type": "email", "label": "Email", "required": true },
            { "id": "age", "type": "number", "label": "Age", "required": true,
              "min": 18 },
            { "id": "name", "type": "text", "label": "Name", "required": true }
        ]));
        let validator = SubmissionValidator::new();

        let errors = validator
            .validate(
                &form,
                &payload(json!({ "email": "nope", "age": 3 })),
            )
            .unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn validation_is_idempotent_over_normalized_output() {
        let form = form_with(json!([
            { "id": "email", "type": "email", "label": "Email", "required": true },
            { "id": "age", "type": "number", "label": "Age", "min": 1, "max": 120 },
            { "id": "terms", "type": "checkbox", "label": "Terms", "required": true }
        ]));
        let validator = SubmissionValidator::new();

        let first = validator
            .validate(
                &form,
                &payload(json!({
                    "email": "ada@example.com",
                    "age": "41",
                    "terms": true
                })),
            )
            .unwrap();
        let second = validator.validate(&form, &first).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn composite_values_are_rejected_not_stored() {
        let form = form_with(json!([
            { "id": "name", "type": "text", "label": "Name", "required": true }
        ]));
        let validator = SubmissionValidator::new();

        let errors = validator
            .validate(&form, &payload(json!({ "name": {"$gt": ""} })))
            .unwrap_err();
        assert_eq!(errors[0].message, "Please provide a valid value");
    }

    #[test]
    fn bounds_format_without_trailing_zeros() {
        let field = FieldDefinition {
            id: "n".into(),
            label: "N".into(),
            required: true,
            help_text: None,
            config: FieldConfig::Number {
                placeholder: None,
                bounds: NumericBounds {
                    min: Some(0.5),
                    max: None,
                },
            },
            extra: Map::new(),
        };
        let validator = SubmissionValidator::new();
        let err = validator.check_field(&field, &json!(0.25)).unwrap_err();
        assert_eq!(err.message, "Value must be at least 0.5");
    }
}
