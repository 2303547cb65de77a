//! Signed-in user identity delivered by the authentication provider.
//!
//! The provider itself (sign-in popups, token refresh) lives outside core;
//! core only reacts to the identity it reports.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

const FALLBACK_AVATAR_BASE: &str = "https://ui-avatars.com/api/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Provider-unique user id; also the storage document key.
    pub uid: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl UserIdentity {
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    /// Avatar to show: the provider's image, or a generated initials image.
    pub fn avatar_or_fallback(&self) -> String {
        match self.avatar_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!(
                "{FALLBACK_AVATAR_BASE}?name={}&background=random&color=fff",
                utf8_percent_encode(&self.display_name, NON_ALPHANUMERIC)
            ),
        }
    }
}

/// Sign-in state notification from the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(UserIdentity),
    SignedOut,
}

impl From<Option<UserIdentity>> for AuthEvent {
    fn from(value: Option<UserIdentity>) -> Self {
        match value {
            Some(identity) => Self::SignedIn(identity),
            None => Self::SignedOut,
        }
    }
}
