//! Core Module
//!
//! 服务器骨架：配置加载、共享状态装配、启动与关闭。

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
