//! Federated identity records.
//!
//! A [`UserInfo`] row binds an (issuer, subject) pair to a local identity,
//! as defined by the `OpenID` Connect standard claims. At most one record
//! exists per pair; records are created lazily on first federation and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored federated identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Locally assigned identifier.
    #[serde(skip)]
    pub id: Uuid,
    /// Display name from the source provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email from the source provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issuer URI the record was federated from.
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Subject under that issuer.
    #[serde(rename = "sub")]
    pub subject: String,
}

/// Input for creating a federation record.
///
/// This is also the shape of a userinfo endpoint response body, which is
/// why the wire names are `iss` and `sub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserInfo {
    /// Display name from the source provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email from the source provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issuer URI. Must match a registered issuer at store time.
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Subject under the issuer.
    #[serde(rename = "sub")]
    pub subject: String,
}

impl NewUserInfo {
    /// Creates a record input for an (issuer, subject) pair.
    #[must_use]
    pub fn new(issuer: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            name: None,
            email: None,
            issuer: issuer.into(),
            subject: subject.into(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Converts into a stored record with the given assigned ID.
    #[must_use]
    pub fn into_user_info(self, id: Uuid) -> UserInfo {
        UserInfo {
            id,
            name: self.name,
            email: self.email,
            issuer: self.issuer,
            subject: self.subject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_userinfo_response_body() {
        let body = r#"{"name": "adam", "email": "ad@am.com", "sub": "super-admin", "iss": "https://woo.com"}"#;
        let info: NewUserInfo = serde_json::from_str(body).unwrap();

        assert_eq!(info.name.as_deref(), Some("adam"));
        assert_eq!(info.email.as_deref(), Some("ad@am.com"));
        assert_eq!(info.subject, "super-admin");
        assert_eq!(info.issuer, "https://woo.com");
    }

    #[test]
    fn name_and_email_are_optional_on_the_wire() {
        let body = r#"{"sub": "svc-1", "iss": "https://sts.internal"}"#;
        let info: NewUserInfo = serde_json::from_str(body).unwrap();

        assert!(info.name.is_none());
        assert!(info.email.is_none());
    }

    #[test]
    fn stored_record_does_not_serialize_local_id() {
        let info = NewUserInfo::new("https://idp.example", "sub0").into_user_info(Uuid::now_v7());
        let json = serde_json::to_value(&info).unwrap();

        assert!(json.get("id").is_none());
        assert_eq!(json["iss"], "https://idp.example");
        assert_eq!(json["sub"], "sub0");
    }
}
