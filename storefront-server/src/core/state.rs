use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::config::Config;
use crate::db::DbService;
use crate::services::{CartStore, CatalogApi, CheckoutFlow, HttpCatalog, HttpService};

/// 服务器状态 - 所有服务共享的运行时资源
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 服务器配置 |
/// | db | 嵌入式 SurrealDB 句柄 |
/// | http | HTTP API 服务 |
/// | jwt_service | JWT 认证服务 |
/// | catalog | 商品目录客户端 |
/// | cart_store | 购物车服务 |
/// | checkout_flow | 结账流程服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub http: HttpService,
    pub jwt_service: Arc<JwtService>,
    pub catalog: Arc<dyn CatalogApi>,
    pub cart_store: CartStore,
    pub checkout_flow: CheckoutFlow,
}

impl ServerState {
    /// 装配全部运行时资源
    ///
    /// 创建工作目录、打开数据库、装配各服务，最后让 HTTP 服务
    /// 持有完整状态。任何一步失败都直接终止进程。
    pub async fn initialize(config: &Config) -> Self {
        let catalog: Arc<dyn CatalogApi> = Arc::new(
            HttpCatalog::new(
                &config.catalog_base_url,
                Duration::from_millis(config.catalog_timeout_ms),
            )
            .expect("Failed to initialize catalog client"),
        );

        Self::initialize_with_catalog(config, catalog).await
    }

    /// 使用指定的目录客户端初始化
    ///
    /// 测试场景注入 `InMemoryCatalog`，避免真实网络请求。
    pub async fn initialize_with_catalog(config: &Config, catalog: Arc<dyn CatalogApi>) -> Self {
        config.validate().expect("Invalid configuration");

        config
            .ensure_work_dir_structure()
            .expect("Failed to prepare work directory");

        let data_dir = config.data_dir();
        let db_service = DbService::new(&data_dir.to_string_lossy())
            .await
            .expect("Failed to open embedded database");
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let cart_store = CartStore::new(db.clone());
        let checkout_flow = CheckoutFlow::new(db.clone(), cart_store.clone());
        let http = HttpService::new(config.clone());

        let state = Self {
            config: config.clone(),
            db,
            http,
            jwt_service,
            catalog,
            cart_store,
            checkout_flow,
        };

        // HTTP 路由需要完整状态，最后注入
        state.http.initialize(state.clone());

        state
    }

    /// 数据库句柄 (浅拷贝)
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 工作目录路径
    pub fn work_dir(&self) -> &str {
        &self.config.work_dir
    }

    /// JWT 服务共享句柄
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
