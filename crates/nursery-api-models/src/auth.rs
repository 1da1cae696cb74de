//! Login and current-user payloads.

use serde::{Deserialize, Serialize};

/// Credentials posted to `/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Phone number used as the login identifier.
    pub phone: String,
    /// Plain-text password; only ever sent over the configured transport.
    pub password: String,
}

/// Authenticated operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier.
    pub id: String,
    /// Login phone number.
    pub phone: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Nursery the operator is assigned to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nursery_id: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    pub token: String,
    /// Authenticated operator.
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_accepts_null_nursery() {
        let response: LoginResponse = serde_json::from_value(json!({
            "token": "abc",
            "user": {"id": "u1", "phone": "5550100", "nurseryId": null}
        }))
        .expect("login response decodes");
        assert_eq!(response.user.nursery_id, None);
        assert_eq!(response.user.name, None);
    }
}
