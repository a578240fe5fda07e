// API 数据传输对象模块
// 包含所有与后端交互的数据结构，字段在线上使用 camelCase

pub mod admin;
pub mod ai;
pub mod chat;
pub mod common;
pub mod post;
pub mod snippet;
pub mod user;

// 重新导出常用类型
pub use admin::*;
pub use ai::*;
pub use chat::*;
pub use common::*;
pub use post::*;
pub use snippet::*;
pub use user::*;
