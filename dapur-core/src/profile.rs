//! Profile card shown on the settings screen

use crate::storage::types::UserRecord;

pub const PLACEHOLDER_NAME: &str = "Nama Pengguna";
pub const PLACEHOLDER_EMAIL: &str = "email@contoh.com";
pub const PLACEHOLDER_USERNAME: &str = "username";

/// Display-ready profile fields. Every field is filled, with placeholders
/// where the record has nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub username: String,
    /// Empty when the user has no photo; the UI shows the app logo instead
    pub photo_url: String,
}

impl ProfileView {
    pub fn from_user(user: Option<&UserRecord>) -> Self {
        let Some(user) = user else {
            return Self::placeholder();
        };

        let name = non_blank(user.name.as_deref())
            // older registrations stored the name under the Indonesian key
            .or_else(|| non_blank(user.extra_str("nama")))
            .unwrap_or(PLACEHOLDER_NAME);

        let email = non_blank(user.email.as_deref());

        let username = non_blank(user.username.as_deref())
            .map(str::to_string)
            .or_else(|| {
                email
                    .and_then(|e| e.split('@').next())
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| PLACEHOLDER_USERNAME.to_string());

        Self {
            name: name.to_string(),
            email: email.unwrap_or(PLACEHOLDER_EMAIL).to_string(),
            username,
            photo_url: user.photo_url.clone().unwrap_or_default(),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_NAME.to_string(),
            email: PLACEHOLDER_EMAIL.to_string(),
            username: PLACEHOLDER_USERNAME.to_string(),
            photo_url: String::new(),
        }
    }

    pub fn has_photo(&self) -> bool {
        !self.photo_url.is_empty()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_user_gives_placeholders() {
        let view = ProfileView::from_user(None);
        assert_eq!(view, ProfileView::placeholder());
        assert!(!view.has_photo());
    }

    #[test]
    fn test_username_from_email() {
        let user = UserRecord::new("u1").with_email("rina.putri@contoh.com");
        let view = ProfileView::from_user(Some(&user));
        assert_eq!(view.username, "rina.putri");
        assert_eq!(view.name, PLACEHOLDER_NAME);
    }

    #[test]
    fn test_legacy_name_field() {
        let user = UserRecord::from_json(r#"{"id":"u2","nama":"Dewi"}"#).unwrap();
        let view = ProfileView::from_user(Some(&user));
        assert_eq!(view.name, "Dewi");
        assert_eq!(view.email, PLACEHOLDER_EMAIL);
        assert_eq!(view.username, PLACEHOLDER_USERNAME);
    }

    #[test]
    fn test_explicit_fields_win() {
        let user = UserRecord::new("u3")
            .with_name("Agus")
            .with_email("agus@contoh.com")
            .with_username("chef_agus")
            .with_photo_url("https://cdn/avatars/u3.png");
        let view = ProfileView::from_user(Some(&user));
        assert_eq!(view.name, "Agus");
        assert_eq!(view.username, "chef_agus");
        assert!(view.has_photo());
    }
}
