use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::models::VideoQuality;

// 成品文件扩展名
pub const OUTPUT_EXTENSION: &str = "mp4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Waiting,
    Downloading,
    Done,
    Error,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Downloading => "downloading",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "downloading" => Ok(Self::Downloading),
            "done" => Ok(Self::Done),
            "error" => Ok(Self::Error),
            other => Err(format!("未知的任务状态: {}", other)),
        }
    }
}

/// 已持久化的下载任务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub bvid: String,
    pub cid: i64,
    pub format: VideoQuality,
    pub title: String,
    pub owner: String,
    pub cover: String,
    pub status: TaskStatus,
    pub folder: PathBuf,
    pub audio: String,
    pub video: String,
    pub duration: i64,
    pub create_at: i64,
}

impl Task {
    /// 成品文件路径：目录 + 标题 + .mp4
    pub fn file_path(&self) -> PathBuf {
        self.folder
            .join(format!("{}.{}", self.title, OUTPUT_EXTENSION))
    }
}

/// 待校验的任务数据，来自批量提交或链接解析
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskCandidate {
    pub bvid: String,
    #[serde(default)]
    pub cid: i64,
    #[serde(default)]
    pub format: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub duration: i64,
}

/// 批量提交的单项，可附带前端给出的番剧名
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchItem {
    #[serde(flatten)]
    pub candidate: TaskCandidate,
    #[serde(rename = "seasonTitle", default)]
    pub season_title: String,
}
