// API 访问层
// client 负责请求与鉴权头，schema 为数据结构，operations 对应各页面的数据流

mod client;
pub mod operations;
pub mod schema;

pub use client::ApiClient;
