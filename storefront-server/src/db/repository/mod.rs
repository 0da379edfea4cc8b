//! 仓储层
//!
//! 每张表一个仓储：`cart` / `checkout` / `shop_order`，
//! 共用同一个数据库句柄包装和错误类型。
//! 服务层只和仓储打交道，不直接拼 SurrealQL。

pub mod cart;
pub mod checkout;
pub mod order;

pub use cart::CartRepository;
pub use checkout::CheckoutRepository;
pub use order::OrderRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// 仓储统一错误，到 API 层再映射成 HTTP 错误码
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    Duplicate(String),

    #[error("storage error: {0}")]
    Database(String),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// 仓储操作结果别名
pub type RepoResult<T> = Result<T, RepoError>;

/// 解析客户端提交的 `table:key` 形式记录 id
///
/// id 全程以字符串流转。无法解析的输入报 `Validation`；
/// 形式合法但表名不符的 id 报 `NotFound`，因为该记录
/// 不可能存在于这张表里。
pub fn parse_record_id(table: &str, raw: &str) -> RepoResult<RecordId> {
    let id = raw
        .parse::<RecordId>()
        .map_err(|_| RepoError::Validation(format!("malformed record id: {raw}")))?;
    if id.table() != table {
        return Err(RepoError::NotFound(format!("no {table} record: {raw}")));
    }
    Ok(id)
}

/// 数据库句柄包装，各仓储内嵌一份
#[derive(Clone, Debug)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
