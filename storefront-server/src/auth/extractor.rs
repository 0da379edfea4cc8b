//! JWT Extractor
//!
//! Custom extractors for pulling the caller identity out of a request:
//! [`CurrentUser`] for routes that require a logged-in user, and
//! [`OwnerIdentity`] for guest-capable cart and checkout routes.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use shared::OwnerKey;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// Extractor for routes that require a logged-in caller.
///
/// Token validation happens exactly once, in [`require_auth`]; this
/// extractor only reads the result it parked in the request extensions.
/// An empty slot means the request reached the handler anonymously,
/// which on a user-only route is a plain 401.
///
/// [`require_auth`]: crate::auth::require_auth
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}

#[derive(Debug, Deserialize, Default)]
struct GuestQuery {
    #[serde(rename = "guestId")]
    guest_id: Option<String>,
}

/// Caller identity on guest-capable routes
///
/// Carries the authenticated user when the middleware validated a token,
/// plus any `guestId` query parameter. Handlers call [`resolve`] with the
/// body-level guest id (if the request carries one) to obtain the single
/// [`OwnerKey`] the operation acts on.
///
/// [`resolve`]: OwnerIdentity::resolve
#[derive(Debug, Clone, Default)]
pub struct OwnerIdentity {
    pub user: Option<CurrentUser>,
    pub query_guest_id: Option<String>,
}

impl FromRequestParts<ServerState> for OwnerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<CurrentUser>().cloned();
        let query_guest_id = Query::<GuestQuery>::try_from_uri(&parts.uri)
            .map(|Query(q)| q.guest_id)
            .unwrap_or(None);

        Ok(Self {
            user,
            query_guest_id,
        })
    }
}

impl OwnerIdentity {
    /// Resolve the owner key this request operates on
    ///
    /// Priority: authenticated user > body `guestId` > query `guestId`.
    /// Guest ids are validated for shape; a request with neither token nor
    /// guest id cannot name a cart and is rejected.
    pub fn resolve(&self, body_guest_id: Option<&str>) -> Result<OwnerKey, AppError> {
        if let Some(user) = &self.user {
            return Ok(OwnerKey::user(&user.id));
        }
        if let Some(guest_id) = body_guest_id.or(self.query_guest_id.as_deref()) {
            return Ok(OwnerKey::guest(guest_id)?);
        }
        Err(AppError::validation(
            "Provide a bearer token or a guestId to identify the cart owner",
        ))
    }

    /// The authenticated user, or 401 when the request is anonymous
    pub fn require_user(&self) -> Result<&CurrentUser, AppError> {
        self.user.as_ref().ok_or_else(AppError::unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_identity() -> OwnerIdentity {
        OwnerIdentity {
            user: Some(CurrentUser {
                id: "u1".to_string(),
                name: "John".to_string(),
                role: "user".to_string(),
            }),
            query_guest_id: Some("guest_q".to_string()),
        }
    }

    #[test]
    fn test_authenticated_user_wins_over_guest_ids() {
        let identity = user_identity();
        let owner = identity.resolve(Some("guest_b")).unwrap();
        assert_eq!(owner, OwnerKey::user("u1"));
    }

    #[test]
    fn test_body_guest_id_wins_over_query() {
        let identity = OwnerIdentity {
            user: None,
            query_guest_id: Some("guest_q".to_string()),
        };
        let owner = identity.resolve(Some("guest_b")).unwrap();
        assert_eq!(owner, OwnerKey::guest("guest_b").unwrap());
    }

    #[test]
    fn test_query_guest_id_used_when_body_absent() {
        let identity = OwnerIdentity {
            user: None,
            query_guest_id: Some("guest_q".to_string()),
        };
        let owner = identity.resolve(None).unwrap();
        assert_eq!(owner, OwnerKey::guest("guest_q").unwrap());
    }

    #[test]
    fn test_anonymous_without_guest_id_rejected() {
        let identity = OwnerIdentity::default();
        assert!(identity.resolve(None).is_err());
        assert!(identity.require_user().is_err());
    }

    #[test]
    fn test_malformed_guest_id_rejected() {
        let identity = OwnerIdentity::default();
        assert!(identity.resolve(Some("not-a-guest-id")).is_err());
    }
}
