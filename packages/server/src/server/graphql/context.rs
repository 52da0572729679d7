use std::sync::Arc;

use sqlx::PgPool;

use crate::common::{Actor, AuthError};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Shared dependencies plus the per-request authenticated user (if any).
#[derive(Clone)]
pub struct GraphQLContext {
    pub deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self { deps, auth_user }
    }

    pub fn pool(&self) -> &PgPool {
        &self.deps.db_pool
    }

    /// The request's actor, if authenticated.
    pub fn actor(&self) -> Option<Actor> {
        self.auth_user.as_ref().map(|user| Actor {
            identity_id: user.identity_id,
            email: user.email.clone(),
            is_admin: user.is_admin,
        })
    }

    /// The request's actor, or an authentication error.
    pub fn require_actor(&self) -> Result<Actor, AuthError> {
        self.actor().ok_or(AuthError::AuthenticationRequired)
    }
}
