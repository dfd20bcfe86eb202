use std::path::PathBuf;

use thiserror::Error;

use crate::common::api::error::ApiError;
use crate::storage::StorageError;

/// 链接解析、任务组装与派发过程中的错误。每个错误只影响当前请求。
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("无法从链接中提取视频ID: {0}")]
    UnrecognizedLink(String),

    #[error("短链接解析失败: {0}")]
    RedirectResolution(String),

    #[error("请先登录")]
    NotAuthenticated,

    #[error("获取{stage}失败: {source}")]
    Upstream {
        stage: &'static str,
        source: ApiError,
    },

    #[error("番剧信息不完整")]
    IncompleteSeriesData,

    #[error("bvid 格式错误: {0}")]
    InvalidIdentifierFormat(String),

    #[error("封面链接格式错误")]
    InvalidCoverUrl,

    #[error("音频链接格式错误")]
    InvalidAudioUrl,

    #[error("视频链接格式错误")]
    InvalidVideoUrl,

    #[error("清晰度代码错误: {0}")]
    InvalidFormatCode(i32),

    #[error("参数错误: 缺少{0}")]
    MissingField(&'static str),

    #[error("创建目录失败 {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("文件删除失败 {path:?}: {source}")]
    FileRemoval {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("数据库操作失败: {0}")]
    Persistence(#[from] StorageError),

    #[error("任务不存在: {0}")]
    NotFound(i64),

    #[error("任务队列已关闭")]
    QueueClosed,
}

impl TaskError {
    pub fn upstream(stage: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Upstream { stage, source }
    }
}
