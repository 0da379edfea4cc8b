//! Cart owner identity
//!
//! A cart belongs to either an unauthenticated guest (client-generated id)
//! or an authenticated user (id from the bearer token). The two cases are
//! resolved into an [`OwnerKey`] exactly once at the HTTP boundary; all
//! store operations receive the key explicitly.

use crate::error::DomainError;
use std::fmt;

/// Maximum length of the random part of a guest id
const MAX_GUEST_ID_LEN: usize = 64;

/// Prefix every client-generated guest id must carry
pub const GUEST_ID_PREFIX: &str = "guest_";

/// The identity a cart is keyed by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    /// Unauthenticated shopper, client-generated id (`guest_...`)
    Guest(String),
    /// Authenticated user id from the bearer token
    User(String),
}

impl OwnerKey {
    /// Build a guest key, validating the client-supplied id shape
    ///
    /// Accepted shape: `guest_` followed by 1–64 characters from
    /// `[A-Za-z0-9_-]`. The server never mints guest ids.
    pub fn guest(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let rest = id.strip_prefix(GUEST_ID_PREFIX).ok_or_else(|| {
            DomainError::validation(format!("guestId must start with '{}'", GUEST_ID_PREFIX))
        })?;
        if rest.is_empty() || rest.len() > MAX_GUEST_ID_LEN {
            return Err(DomainError::validation(format!(
                "guestId must carry 1-{} characters after the prefix",
                MAX_GUEST_ID_LEN
            )));
        }
        if !rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::validation(
                "guestId may only contain letters, digits, '_' and '-'",
            ));
        }
        Ok(Self::Guest(id))
    }

    /// Build a user key from an authenticated user id
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(id.into())
    }

    /// Storage key the cart document is looked up by
    ///
    /// Guests and users live in disjoint namespaces so a malicious guest id
    /// can never collide with a user key.
    pub fn storage_key(&self) -> String {
        match self {
            Self::Guest(id) => format!("guest:{}", id),
            Self::User(id) => format!("user:{}", id),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// User id if this key names an authenticated user
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User(id) => Some(id),
            Self::Guest(_) => None,
        }
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_key_accepts_valid_ids() {
        assert!(OwnerKey::guest("guest_abc123").is_ok());
        assert!(OwnerKey::guest("guest_1700000000000").is_ok());
        assert!(OwnerKey::guest("guest_a-b_C9").is_ok());
    }

    #[test]
    fn test_guest_key_rejects_bad_shapes() {
        assert!(OwnerKey::guest("abc123").is_err());
        assert!(OwnerKey::guest("guest_").is_err());
        assert!(OwnerKey::guest("guest_ space").is_err());
        assert!(OwnerKey::guest("guest_semi;colon").is_err());
        assert!(OwnerKey::guest(format!("guest_{}", "x".repeat(65))).is_err());
    }

    #[test]
    fn test_storage_keys_are_disjoint() {
        let guest = OwnerKey::guest("guest_42").unwrap();
        let user = OwnerKey::user("guest_42");
        assert_eq!(guest.storage_key(), "guest:guest_42");
        assert_eq!(user.storage_key(), "user:guest_42");
        assert_ne!(guest.storage_key(), user.storage_key());
    }

    #[test]
    fn test_user_id_accessor() {
        assert_eq!(OwnerKey::user("u1").user_id(), Some("u1"));
        assert_eq!(OwnerKey::guest("guest_1").unwrap().user_id(), None);
    }
}
