//! B站链接解析与下载任务调度。
//!
//! 流程：链接解析 -> 内容分类 -> 目标目录规划 -> 任务组装与持久化 -> 派发给下载工作池。

pub mod common;
pub mod downloader;
pub mod error;
pub mod parser;
#[cfg(feature = "http")]
pub mod server;
pub mod storage;
pub mod task;

pub use error::TaskError;
