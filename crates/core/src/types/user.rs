//! Shopper identity and registration input.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{Email, UserId};

/// The signed-in shopper, exactly as returned by the remote auth endpoints.
///
/// The `id` is assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

/// Registration profile submitted to the remote service.
///
/// `Debug` is derived; `SecretString` redacts the password.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_remote_json() {
        let user: User =
            serde_json::from_str(r#"{"id":17,"name":"Ana","email":"a@x.com"}"#).unwrap();
        assert_eq!(user.id, UserId::new(17));
        assert_eq!(user.email.as_str(), "a@x.com");
    }

    #[test]
    fn test_registration_debug_redacts_password() {
        let registration = Registration {
            name: "Ana".to_string(),
            email: Email::parse("a@x.com").unwrap(),
            password: SecretString::from("hunter2"),
        };
        let debug = format!("{registration:?}");
        assert!(debug.contains("Ana"));
        assert!(!debug.contains("hunter2"));
    }
}
