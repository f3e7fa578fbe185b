//! # User profile and role normalization
//!
//! The backend has shipped the user's role under two different field names
//! over time. Everything stored client-side goes through [`normalize_user`],
//! which folds them into the canonical [`ROLE_FIELD`] so the rest of the
//! client only ever sees a [`Role`].
//!
//! | Input field | Precedence |
//! |-------------|-----------|
//! | `role` | first non-empty value wins |
//! | `user_role` | used when `role` is missing or empty |
//! | neither | [`Role::User`] |
//!
//! Fields the client does not model (avatar, review counts, ...) ride along
//! in [`UserProfile::extra`] untouched.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical field the normalized role is stored under.
pub const ROLE_FIELD: &str = "role";

/// Source fields a role may arrive in, in precedence order.
pub const LEGACY_ROLE_FIELDS: [&str; 2] = ["role", "user_role"];

pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

/// Access level of a signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Anything other than `admin` (case-insensitive) is a plain user.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case(ADMIN_ROLE) {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => USER_ROLE,
            Role::Admin => ADMIN_ROLE,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend user ids are numeric today; string ids are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

/// The signed-in user as persisted client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Backend fields not modelled here, preserved as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// First non-empty legacy role field, or [`Role::User`].
pub fn resolve_role(fields: &Map<String, Value>) -> Role {
    LEGACY_ROLE_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name).and_then(Value::as_str))
        .map(str::trim)
        .find(|label| !label.is_empty())
        .map(Role::from_label)
        .unwrap_or_default()
}

/// Parse a raw user record, folding legacy role fields into [`ROLE_FIELD`].
pub fn normalize_user(raw: &Value) -> Result<UserProfile, serde_json::Error> {
    let Value::Object(fields) = raw else {
        return Err(serde_json::Error::custom("user record must be a JSON object"));
    };
    let role = resolve_role(fields);
    let mut fields = fields.clone();
    for name in LEGACY_ROLE_FIELDS {
        fields.remove(name);
    }
    fields.insert(ROLE_FIELD.to_string(), Value::String(role.as_str().to_string()));
    serde_json::from_value(Value::Object(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_from_either_field() {
        let a = normalize_user(&json!({"id": 1, "email": "a@b.com", "role": "admin"})).unwrap();
        assert_eq!(a.role, Role::Admin);

        let b = normalize_user(&json!({"id": 2, "email": "c@d.com", "user_role": "admin"})).unwrap();
        assert_eq!(b.role, Role::Admin);

        let c = normalize_user(&json!({"id": 3, "email": "e@f.com"})).unwrap();
        assert_eq!(c.role, Role::User);
    }

    #[test]
    fn test_first_non_empty_role_wins() {
        let both = json!({"id": 1, "email": "a@b.com", "role": "user", "user_role": "admin"});
        assert_eq!(normalize_user(&both).unwrap().role, Role::User);

        let empty_first = json!({"id": 1, "email": "a@b.com", "role": "  ", "user_role": "admin"});
        assert_eq!(normalize_user(&empty_first).unwrap().role, Role::Admin);
    }

    #[test]
    fn test_unknown_role_is_user() {
        let raw = json!({"id": 1, "email": "a@b.com", "role": "moderator"});
        assert_eq!(normalize_user(&raw).unwrap().role, Role::User);
        assert_eq!(Role::from_label("ADMIN"), Role::Admin);
    }

    #[test]
    fn test_extra_fields_preserved() {
        let raw = json!({
            "id": "u-7",
            "displayName": "Ana",
            "email": "ana@example.com",
            "user_role": "admin",
            "avatarUrl": "/img/ana.png",
            "reviewCount": 12
        });
        let user = normalize_user(&raw).unwrap();
        assert_eq!(user.id, UserId::Text("u-7".to_string()));
        assert_eq!(user.display_name(), "Ana");
        assert_eq!(user.extra.get("reviewCount"), Some(&json!(12)));
        assert!(!user.extra.contains_key("user_role"));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["role"], json!("admin"));
        assert_eq!(back["avatarUrl"], json!("/img/ana.png"));
        assert!(back.get("user_role").is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = normalize_user(&json!({"id": 1, "email": "a@b.com"})).unwrap();
        assert_eq!(user.display_name(), "a@b.com");
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(normalize_user(&json!("alice")).is_err());
        assert!(normalize_user(&json!({"id": 1})).is_err());
    }
}
