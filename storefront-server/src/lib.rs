//! Storefront Server - 在线商店后端
//!
//! 购物车到订单的完整链路跑在这个 crate 里：游客与登录用户的
//! 购物车、结账支付状态机、订单定格与查询。数据落在嵌入式
//! SurrealDB，身份靠外部签发的 JWT，商品信息来自目录服务。
//!
//! ```text
//! storefront-server/src/
//! ├── core/       配置、全局状态、启动
//! ├── auth/       JWT 验签与游客身份解析
//! ├── services/   购物车、结账、目录客户端、HTTP 装配
//! ├── api/        路由与处理函数
//! ├── db/         模型与仓储 (SurrealDB)
//! └── utils/      错误信封、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// 对外公共类型
pub use auth::{CurrentUser, JwtService, OwnerIdentity};
pub use core::{Config, Server, ServerState};
pub use services::{CartStore, CheckoutFlow};
pub use utils::{AppError, AppResponse, AppResult};

// 日志初始化入口
pub use utils::logger::{init_logger, init_logger_with_file};

/// 安全事件统一以 info 级别打到 `security` target，
/// 传入的 level 作为结构化字段记录
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_____  ________
  \__ \/ __/ __ \/ ___/ _ \
 ___/ / /_/ /_/ / /  /  __/
/____/\__/\____/_/   \___/
    ____                 __
   / __/________  ____  / /_
  / /_/ ___/ __ \/ __ \/ __/
 / __/ /  / /_/ / / / / /_
/_/ /_/   \____/_/ /_/\__/
    "#
    );
}

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 创建工作目录结构
/// 3. 初始化日志 (文件目录存在则写滚动日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(None, None, log_dir.to_str());

    Ok(())
}
