//! Authorization primitives shared between GraphQL resolvers and domain actions.
//!
//! Resolvers turn the request's JWT into an [`Actor`] and hand it to actions,
//! which perform their own permission checks. Authorization lives in the
//! action layer, not the resolver layer.

use thiserror::Error;

use crate::common::IdentityId;

/// Authorization errors for the Chambier platform
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Admin access required")]
    AdminRequired,

    #[error("Invalid or expired token")]
    InvalidToken,
}

/// The authenticated principal of a request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub identity_id: IdentityId,
    pub email: String,
    pub is_admin: bool,
}

impl Actor {
    /// Fail unless the actor carries the admin flag.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(is_admin: bool) -> Actor {
        Actor {
            identity_id: IdentityId::new(),
            email: "user@example.com".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(actor(true).require_admin().is_ok());
        assert!(matches!(
            actor(false).require_admin(),
            Err(AuthError::AdminRequired)
        ));
    }
}
