pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Role, UserSummary};

// Re-export necessary items
pub use extractors::AuthUser;
pub use middleware::{AuthMiddleware, DbGate, RequireRole};
pub use password::{hash_password, verify_password};
pub use token::{Claims, JwtKeys};

lazy_static! {
    // The special-character class of the password policy: anything that is
    // neither alphanumeric nor whitespace.
    static ref SPECIAL_CHAR_REGEX: regex::Regex = regex::Regex::new(r"[^a-zA-Z0-9\s]").unwrap();
}

/// Password policy: 8-128 characters with at least one lowercase letter,
/// one uppercase letter, one digit, and one special character.
fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = (8..=128).contains(&password.chars().count());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = SPECIAL_CHAR_REGEX.is_match(password);

    if long_enough && has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_policy");
        err.message = Some(
            "Password must be 8-128 characters and include uppercase, lowercase, number, and special character"
                .into(),
        );
        Err(err)
    }
}

/// Payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, 2-100 characters.
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    /// Email address; normalized to lowercase before any lookup or write.
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(custom = "validate_password")]
    pub password: String,
    /// Must match `password` exactly.
    #[serde(rename = "confirmPassword")]
    #[validate(must_match(other = "password", message = "Confirm password must match password"))]
    pub confirm_password: String,
    /// Optional role; defaults to USER when omitted. Values outside the
    /// enum are rejected at deserialization time.
    pub role: Option<Role>,
}

/// Payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Response body after successful registration or login: a message, the
/// signed bearer token, and the user summary (never the password hash).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register_request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            role: None,
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register_request("Abcd1234!", "Abcd1234!").validate().is_ok());

        // Confirm-password mismatch
        assert!(register_request("Abcd1234!", "Abcd1234?").validate().is_err());

        // Invalid email
        let mut req = register_request("Abcd1234!", "Abcd1234!");
        req.email = "annx.com".to_string();
        assert!(req.validate().is_err());

        // Name too short
        let mut req = register_request("Abcd1234!", "Abcd1234!");
        req.name = "A".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_password_policy() {
        // Missing character classes
        assert!(validate_password("abcd1234!").is_err()); // no uppercase
        assert!(validate_password("ABCD1234!").is_err()); // no lowercase
        assert!(validate_password("Abcdefgh!").is_err()); // no digit
        assert!(validate_password("Abcd12345").is_err()); // no special char
        assert!(validate_password("Ab1!").is_err()); // too short
        assert!(validate_password(&format!("Ab1!{}", "a".repeat(125))).is_err()); // too long

        assert!(validate_password("Abcd1234!").is_ok());
        assert!(validate_password("p@ssW0rdp@ssW0rd").is_ok());
    }

    #[test]
    fn test_register_collects_all_violations() {
        let mut req = register_request("short", "different");
        req.name = "A".to_string();
        req.email = "not-an-email".to_string();

        let errors = req.validate().unwrap_err();
        let details = crate::error::validation_messages(&errors);
        // name, email, password, and confirm_password all failed
        assert_eq!(details.len(), 4);
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "ann@x.com".to_string(),
            password: "Abcd1234!".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "annx.com".to_string(),
            password: "Abcd1234!".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = LoginRequest {
            email: "ann@x.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_confirm_password_field_uses_camel_case() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Ann",
            "email": "ann@x.com",
            "password": "Abcd1234!",
            "confirmPassword": "Abcd1234!",
            "role": "ADMIN"
        }))
        .unwrap();
        assert_eq!(req.confirm_password, "Abcd1234!");
        assert_eq!(req.role, Some(Role::Admin));

        // Unknown fields are ignored rather than rejected.
        let req: Result<RegisterRequest, _> = serde_json::from_value(serde_json::json!({
            "name": "Ann",
            "email": "ann@x.com",
            "password": "Abcd1234!",
            "confirmPassword": "Abcd1234!",
            "unexpected": true
        }));
        assert!(req.is_ok());
    }
}
