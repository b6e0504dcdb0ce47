//! User records for the registered-user and logged-in-user slots

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Identified;
use crate::error::StoreError;
use crate::storage::ids::UserId;

/// A user as the app sees it.
///
/// `id` is the identity key. Profile fields are optional because the backend
/// fills them in at different points (registration only knows the email,
/// the profile editor adds name and photo). Fields this type doesn't name are
/// kept in `extra` so a load/save cycle doesn't drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            username: None,
            photo_url: None,
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Look up a field that has no named slot
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Reject records without a usable identity
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.id.is_empty() {
            return Err(StoreError::InvalidRecord("user record has an empty id".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a stored record
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let record: UserRecord = serde_json::from_str(json)
            .map_err(|e| StoreError::InvalidRecord(format!("malformed user record: {}", e)))?;
        record.validate()?;
        Ok(record)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self)
            .map_err(|e| StoreError::InvalidRecord(format!("failed to serialize user record: {}", e)))
    }
}

impl Identified for UserRecord {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let json = r#"{"id":"u1","nama":"Sari","email":"sari@contoh.com","photoURL":"https://x/y.png"}"#;
        let record = UserRecord::from_json(json).unwrap();

        assert_eq!(record.email.as_deref(), Some("sari@contoh.com"));
        assert_eq!(record.photo_url.as_deref(), Some("https://x/y.png"));
        assert_eq!(record.extra_str("nama"), Some("Sari"));

        let back = UserRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_id_is_malformed() {
        let err = UserRecord::from_json(r#"{"email":"a@b.c"}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let err = UserRecord::from_json(r#"{"id":""}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }
}
