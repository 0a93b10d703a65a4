//! Error types and result handling for testdb.
//!
//! This module defines the core error type [`Error`] used throughout the crate,
//! as well as the [`Result`] alias for fallible operations.
//!
//! Every error names the operation that failed (see [`Error::op`]) and wraps
//! the underlying cause where one exists, so that test output shows the
//! original SQLSTATE or subprocess diagnostics.

use thiserror::Error;

use crate::config::MigrationTool;

/// Result type for testdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type for heterogeneous error sources
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error types for testdb operations.
///
/// This enum covers all error cases that can occur when acquiring or tearing
/// down a test database: configuration mistakes, admin connectivity, DDL
/// failures from the server, and external migration-tool failures.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (SQLx errors without a more specific wrapper)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration directory was configured without a migration tool
    #[error("migration directory specified but migration tool not set")]
    MigrationDirWithoutTool,

    /// A migration tool was configured without a migration directory
    #[error("migration tool specified but migration directory not set")]
    MigrationToolWithoutDir,

    /// The configured database prefix would push minted names past the
    /// server's identifier limit
    #[error("database prefix too long: max {max} characters, got {got}")]
    PrefixTooLong { max: usize, got: usize },

    /// `run_migrations` was called but no migration directory is configured
    #[error("migration directory not set")]
    NoMigrationDir,

    /// The admin DSN could not be parsed
    #[error("parse admin DSN: {source}")]
    BadAdminDsn {
        #[source]
        source: url::ParseError,
    },

    /// The admin DSN parsed but is missing fields needed to reconstruct
    /// per-database credentials
    #[error("incomplete admin DSN: host, port, user and password must be specified")]
    IncompleteAdminDsn,

    /// Connecting to the admin database failed
    #[error("connect to admin database: {source}")]
    AdminUnreachable {
        #[source]
        source: sqlx::Error,
    },

    /// A provider capability was invoked before `initialize`
    #[error("provider not initialized")]
    NotInitialized,

    /// The server rejected `CREATE DATABASE`
    #[error("create database {name}: {source}")]
    CreateRejected {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    /// Disallowing or terminating connections to the database failed
    #[error("terminate connections to {name}: {source}")]
    TerminateFailed {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    /// `DROP DATABASE` failed; reported only after the retry budget for
    /// SQLSTATE 55006 is exhausted
    #[error("drop database {name}: {source}")]
    DropFailed {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    /// The external migration tool exited non-zero or could not be launched;
    /// `detail` carries the tool's combined stdout and stderr
    #[error("{tool} migrations failed: {detail}")]
    MigrationFailed { tool: MigrationTool, detail: String },

    /// The goose driver could not be determined from the DSN scheme
    #[error("unable to determine database driver from DSN: {dsn}")]
    UnknownDriver { dsn: String },

    /// The user-supplied initializer failed
    #[error("initialize test database: {source}")]
    InitializerFailed {
        #[source]
        source: BoxError,
    },

    /// The OS random source refused to produce the name suffix
    #[error("generate random suffix: {source}")]
    RandomSourceUnavailable {
        #[source]
        source: rand::Error,
    },
}

impl Error {
    /// The operation this error originated from, e.g. `"provider.create_database"`.
    pub fn op(&self) -> &'static str {
        match self {
            Error::Database(_) => "provider.cleanup",
            Error::MigrationDirWithoutTool
            | Error::MigrationToolWithoutDir
            | Error::PrefixTooLong { .. } => "config.validate",
            Error::NoMigrationDir => "run_migrations",
            Error::BadAdminDsn { .. } => "provider.initialize",
            Error::IncompleteAdminDsn => "provider.build_dsn",
            Error::AdminUnreachable { .. } => "provider.initialize",
            Error::NotInitialized => "provider",
            Error::CreateRejected { .. } => "provider.create_database",
            Error::TerminateFailed { .. } => "provider.terminate_connections",
            Error::DropFailed { .. } => "provider.drop_database",
            Error::MigrationFailed { tool, .. } => match tool {
                MigrationTool::Tern => "run_tern_migrations",
                MigrationTool::Goose => "run_goose_migrations",
                MigrationTool::Migrate => "run_migrate_migrations",
            },
            Error::UnknownDriver { .. } => "run_goose_migrations",
            Error::InitializerFailed { .. } => "initializer.initialize_test_database",
            Error::RandomSourceUnavailable { .. } => "names.mint",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_too_long_names_the_limit() {
        let err = Error::PrefixTooLong { max: 34, got: 40 };
        assert!(err.to_string().contains("34"));
        assert!(err.to_string().contains("40"));
        assert_eq!(err.op(), "config.validate");
    }

    #[test]
    fn migration_failed_message_contains_tool_and_marker() {
        let err = Error::MigrationFailed {
            tool: MigrationTool::Tern,
            detail: "exit status: 1".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("tern"));
        assert!(message.contains("migrations failed"));
        assert_eq!(err.op(), "run_tern_migrations");
    }

    #[test]
    fn admin_dsn_errors_carry_operation_tags() {
        let bad = Error::BadAdminDsn {
            source: url::Url::parse("not a dsn").unwrap_err(),
        };
        assert_eq!(bad.op(), "provider.initialize");

        assert_eq!(Error::IncompleteAdminDsn.op(), "provider.build_dsn");
    }

    #[test]
    fn ddl_errors_carry_operation_tags() {
        let create = Error::CreateRejected {
            name: "test_x".to_string(),
            source: sqlx::Error::PoolClosed,
        };
        assert_eq!(create.op(), "provider.create_database");

        let drop = Error::DropFailed {
            name: "test_x".to_string(),
            source: sqlx::Error::PoolClosed,
        };
        assert_eq!(drop.op(), "provider.drop_database");
        assert!(drop.to_string().contains("test_x"));
    }
}
