//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path segments and small request bodies are parsed here so handlers receive
//! domain types and every rejection carries the same `details` shape:
//! `{ "field", "value", "code" }`.

use serde_json::json;

use crate::domain::{
    AccountId, ChecklistDate, ChecklistId, CredentialsValidationError, Error, Role,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidRole,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidRole => "invalid_role",
        }
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// Parse a checklist id path segment.
pub(crate) fn parse_checklist_id(raw: &str) -> Result<ChecklistId, Error> {
    raw.trim().parse().map_err(|_| {
        ValidationError::new("id", "checklist id must be a valid UUID")
            .with_value(ErrorCode::InvalidUuid, raw)
    })
}

/// Parse an account id path segment.
pub(crate) fn parse_account_id(raw: &str) -> Result<AccountId, Error> {
    AccountId::new(raw).map_err(|_| {
        ValidationError::new("id", "user id must be a valid UUID")
            .with_value(ErrorCode::InvalidUuid, raw)
    })
}

/// Parse a `YYYY-MM-DD` date path segment.
pub(crate) fn parse_checklist_date(raw: &str) -> Result<ChecklistDate, Error> {
    raw.parse().map_err(|_| {
        ValidationError::new("date", "date must be formatted as YYYY-MM-DD")
            .with_value(ErrorCode::InvalidDate, raw)
    })
}

/// Parse a role name, listing the accepted values on failure.
pub(crate) fn parse_role(raw: &str) -> Result<Role, Error> {
    raw.parse().map_err(|_| {
        let allowed: Vec<&str> = Role::ALL.iter().map(|role| role.as_str()).collect();
        Error::invalid_request("Invalid role").with_details(json!({
            "field": "role",
            "value": raw,
            "code": ErrorCode::InvalidRole.as_str(),
            "allowed": allowed,
        }))
    })
}

/// Map a credentials failure to a `400` naming the offending field.
pub(crate) fn credentials_error(err: CredentialsValidationError) -> Error {
    let code = match &err {
        CredentialsValidationError::Account(_) => "invalid_value",
        CredentialsValidationError::EmptyPassword => "empty_password",
        CredentialsValidationError::PasswordTooShort { .. } => "password_too_short",
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": code,
    }))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode as DomainCode;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case("2024-05-01", true)]
    #[case(" 2024-05-01 ", true)]
    #[case("2024-5-1", false)]
    #[case("2024-02-30", false)]
    #[case("yesterday", false)]
    fn dates_follow_iso_calendar_rules(#[case] raw: &str, #[case] ok: bool) {
        let result = parse_checklist_date(raw);
        assert_eq!(result.is_ok(), ok);
        if let Err(error) = result {
            assert_eq!(error.code(), DomainCode::InvalidRequest);
            assert_eq!(detail(&error, "field"), Some(&Value::from("date")));
            assert_eq!(detail(&error, "code"), Some(&Value::from("invalid_date")));
        }
    }

    #[test]
    fn checklist_ids_must_be_uuids() {
        let error = parse_checklist_id("abc").expect_err("not a uuid");
        assert_eq!(detail(&error, "value"), Some(&Value::from("abc")));
        assert_eq!(detail(&error, "code"), Some(&Value::from("invalid_uuid")));

        let id = parse_checklist_id("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn account_ids_must_be_uuids() {
        assert!(parse_account_id("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_ok());
        let error = parse_account_id("nope").expect_err("not a uuid");
        assert_eq!(error.message(), "user id must be a valid UUID");
    }

    #[test]
    fn unknown_role_lists_allowed_values() {
        let error = parse_role("owner").expect_err("unknown role");
        assert_eq!(error.message(), "Invalid role");
        assert_eq!(
            detail(&error, "allowed"),
            Some(&serde_json::json!(["admin", "editor", "viewer"]))
        );
    }

    #[rstest]
    #[case(CredentialsValidationError::EmptyPassword, "password", "empty_password")]
    #[case(
        CredentialsValidationError::PasswordTooShort { min: 8 },
        "password",
        "password_too_short"
    )]
    #[case(
        CredentialsValidationError::Account(crate::domain::AccountValidationError::EmptyDisplayName),
        "name",
        "invalid_value"
    )]
    fn credential_failures_name_the_field(
        #[case] err: CredentialsValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = credentials_error(err);
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&error, "field"), Some(&Value::from(field)));
        assert_eq!(detail(&error, "code"), Some(&Value::from(code)));
    }
}
