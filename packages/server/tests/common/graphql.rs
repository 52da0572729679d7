//! GraphQL client for integration testing.
//!
//! Executes GraphQL queries directly against the schema without HTTP overhead.

use juniper::Variables;
use serde_json::Value;
use server_core::common::IdentityId;
use server_core::domains::auth::JwtService;
use server_core::kernel::test_dependencies::MockSmsService;
use server_core::kernel::ServerDeps;
use server_core::server::graphql::{create_schema, GraphQLContext, Schema};
use server_core::server::middleware::AuthUser;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// GraphQL client for executing queries and mutations in tests.
pub struct GraphQLClient {
    schema: Schema,
    context: GraphQLContext,
    /// Recording SMS mock backing this client's deps.
    pub sms: Arc<MockSmsService>,
}

/// Result of a GraphQL execution.
#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    pub errors: Vec<String>,
}

impl GraphQLResult {
    /// Returns true if the execution had no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// Gets a value at the given JSON path.
    ///
    /// # Example
    /// ```ignore
    /// let token = result.get("signUpWithEmail.token");
    /// ```
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = &current[key];
        }
        current.clone()
    }
}

/// Create test server deps backed by the given SMS mock.
pub fn create_test_server_deps(pool: PgPool, sms: Arc<MockSmsService>) -> Arc<ServerDeps> {
    let jwt_service = Arc::new(JwtService::new("test_secret", "test_issuer".to_string()));

    Arc::new(ServerDeps::new(
        pool,
        sms,
        jwt_service,
        false,
        vec!["admin@chambier.com".to_string()],
    ))
}

impl GraphQLClient {
    /// Creates a new unauthenticated GraphQL client with a fresh SMS mock.
    pub fn new(pool: PgPool) -> Self {
        let sms = Arc::new(MockSmsService::new());
        Self::with_deps(create_test_server_deps(pool, sms.clone()), sms, None)
    }

    /// Creates a new GraphQL client authenticated as the given identity.
    pub fn with_auth_user(pool: PgPool, identity_id: Uuid, email: &str, is_admin: bool) -> Self {
        let sms = Arc::new(MockSmsService::new());
        let auth_user = AuthUser {
            identity_id: IdentityId::from_uuid(identity_id),
            email: email.to_string(),
            is_admin,
        };
        Self::with_deps(
            create_test_server_deps(pool, sms.clone()),
            sms,
            Some(auth_user),
        )
    }

    /// Creates a client from explicit deps (lets scenarios share one SMS mock).
    pub fn with_deps(
        deps: Arc<ServerDeps>,
        sms: Arc<MockSmsService>,
        auth_user: Option<AuthUser>,
    ) -> Self {
        let context = GraphQLContext::new(deps, auth_user);
        Self {
            schema: create_schema(),
            context,
            sms,
        }
    }

    /// A second client over the same deps, authenticated as another identity.
    pub fn as_identity(&self, identity_id: Uuid, email: &str, is_admin: bool) -> Self {
        let auth_user = AuthUser {
            identity_id: IdentityId::from_uuid(identity_id),
            email: email.to_string(),
            is_admin,
        };
        Self::with_deps(self.context.deps.clone(), self.sms.clone(), Some(auth_user))
    }

    /// Execute a GraphQL query/mutation.
    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    /// Execute a GraphQL query/mutation with variables.
    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let (result, errors) =
            juniper::execute(query, None, &self.schema, &variables, &self.context)
                .await
                .expect("GraphQL execution failed");

        // Convert juniper::Value to serde_json::Value
        let data = Some(serde_json::to_value(&result).expect("Failed to serialize GraphQL result"));

        let error_messages: Vec<String> = errors
            .iter()
            .map(|e| e.error().message().to_string())
            .collect();

        GraphQLResult {
            data,
            errors: error_messages,
        }
    }

    /// Execute a query and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }
}
