//! Database Module
//!
//! Embedded SurrealDB over RocksDB. Documents live under the
//! `storefront`/`main` namespace pair; tests point the same service at a
//! temporary directory with its own namespace.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Default namespace for the storefront data
pub const NAMESPACE: &str = "storefront";
/// Default database name
pub const DATABASE: &str = "main";

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `data_dir` with the default
    /// namespace pair
    pub async fn new(data_dir: &str) -> Result<Self, AppError> {
        Self::with_namespace(data_dir, NAMESPACE, DATABASE).await
    }

    /// Open the database with an explicit namespace and database name
    pub async fn with_namespace(data_dir: &str, ns: &str, db_name: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(data_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(ns)
            .use_db(db_name)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established (SurrealDB/RocksDB at {data_dir})");

        Ok(Self { db })
    }
}
