use std::collections::BTreeMap;

use validator::Validate;

use crate::error::ApiError;

/// Validate a payload, producing a 400 with per-field messages.
pub fn validate<T: Validate>(payload: &T) -> Result<(), ApiError> {
    field_errors(payload).map_err(|fields| ApiError::validation_error("Validation failed", Some(fields)))
}

fn field_errors<T: Validate>(payload: &T) -> Result<(), BTreeMap<String, String>> {
    payload.validate().map_err(|validation_errors| {
        validation_errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let message = errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map(|cow| cow.to_string())
                            .unwrap_or_else(|| "Invalid value".to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                (camel_case(field), message)
            })
            .collect()
    })
}

// payloads are camelCase on the wire
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewOrganization, OrganizationFilter};
    use serde_json::json;

    #[test]
    fn valid_payload_passes() {
        let data: NewOrganization = serde_json::from_value(json!({
            "handle": "acme",
            "name": "Acme",
            "description": "Anvils"
        }))
        .unwrap();
        assert!(validate(&data).is_ok());
    }

    #[test]
    fn violations_name_the_wire_field() {
        let data: NewOrganization = serde_json::from_value(json!({
            "handle": "acme",
            "name": "Acme",
            "description": "Anvils",
            "numEmployees": -1
        }))
        .unwrap();

        match validate(&data) {
            Err(ApiError::ValidationError { field_errors: Some(fields), .. }) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields["numEmployees"], "must not be negative");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn filter_ranges_must_not_be_negative() {
        let filter = OrganizationFilter {
            min_employees: Some(-5),
            ..Default::default()
        };
        let err = validate(&filter).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn camel_cases_snake_names() {
        assert_eq!(camel_case("logo_url"), "logoUrl");
        assert_eq!(camel_case("handle"), "handle");
    }
}
