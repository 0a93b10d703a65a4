//! Core abstraction seams for testdb.
//!
//! This module defines the [`Provider`] trait (database-specific lifecycle
//! operations against the admin connection), the [`DbInitializer`] trait
//! (turning a per-database DSN into a caller-chosen handle), and the
//! [`Entity`] trait (the opaque carrier for that handle).
//!
//! Only one provider is shipped: [`crate::postgres::PostgresProvider`]. The
//! seams exist so additional backends can be supported without touching the
//! lifecycle engine.

use std::any::Any;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{BoxError, Result};

/// Database-specific operations required to manage test database lifecycles.
///
/// Implementations own exactly one administrative connection, established by
/// [`Provider::initialize`] and released by [`Provider::cleanup`]. The admin
/// connection is never shared across [`crate::TestDatabase`] instances.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Resolve the admin DSN, cache its parsed fields, and open the
    /// administrative connection.
    async fn initialize(&mut self, config: &Config) -> Result<()>;

    /// Create a new database with the given name.
    async fn create_database(&mut self, name: &str) -> Result<()>;

    /// Drop an existing database.
    async fn drop_database(&mut self, name: &str) -> Result<()>;

    /// Forcefully close all connections to a database and prevent new ones.
    /// Must be called before [`Provider::drop_database`].
    async fn terminate_connections(&mut self, name: &str) -> Result<()>;

    /// Construct a connection string for the given database name, reusing the
    /// admin connection's host, port, user, password, and SSL mode.
    fn build_dsn(&self, db_name: &str) -> Result<String>;

    /// The resolved admin DSN in use, after applying overrides, environment
    /// variables, and defaults. Consumed by the migration runner.
    fn resolved_admin_dsn(&self) -> &str;

    /// Release provider resources (the admin connection). Idempotent, and
    /// safe to call on an uninitialized provider.
    async fn cleanup(&mut self) -> Result<()>;
}

/// The handle produced by a [`DbInitializer`].
///
/// The engine treats entities as opaque; callers recover the concrete type
/// with [`crate::TestDatabase::entity`]. The `close` hook is the optional
/// "close capability": teardown invokes it before dropping the database, so
/// pooled connections are released ahead of connection termination.
#[async_trait]
pub trait Entity: Send + Sync {
    /// Access the entity as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Release the entity's connections. The default does nothing; handle
    /// types without a close capability leave release to the caller.
    async fn close(&self) {}
}

/// Custom database initialization for tests.
///
/// Implement this when your application code expects a specific handle type
/// (an ORM, a wrapped pool, an instrumented client): tests then exercise the
/// same type the application uses. The default PostgreSQL initializer is
/// [`crate::postgres::PoolInitializer`].
///
/// ### Example
///
/// ```no_run
/// use async_trait::async_trait;
/// use testdb::{BoxError, DbInitializer, Entity};
///
/// struct RawPoolInitializer;
///
/// #[async_trait]
/// impl DbInitializer for RawPoolInitializer {
///     async fn initialize_test_database(
///         &self,
///         dsn: &str,
///     ) -> Result<Box<dyn Entity>, BoxError> {
///         let pool = sqlx::PgPool::connect(dsn).await?;
///         Ok(Box::new(pool))
///     }
/// }
/// ```
#[async_trait]
pub trait DbInitializer: Send + Sync {
    /// Create and initialize a connection handle for the test database at
    /// `dsn`. The result is stored on the [`crate::TestDatabase`] and
    /// recovered by the caller through a checked downcast.
    async fn initialize_test_database(
        &self,
        dsn: &str,
    ) -> std::result::Result<Box<dyn Entity>, BoxError>;
}
