use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// 视频清晰度代码（B站 qn 参数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum VideoQuality {
    Q240P = 6,       // 极速 240P
    Q360P = 16,      // 流畅 360P
    Q480P = 32,      // 清晰 480P
    Q720P = 64,      // 高清 720P
    Q720P60 = 74,    // 高清 720P60
    Q1080P = 80,     // 高清 1080P
    QAiRepair = 100, // 智能修复
    Q1080PP = 112,   // 高清 1080P+
    Q1080P60 = 116,  // 高清 1080P60
    Q4K = 120,       // 超清 4K
    QHdr = 125,      // HDR 真彩色
    QDolby = 126,    // 杜比视界
    Q8K = 127,       // 超高清 8K
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 13] = [
        Self::Q240P,
        Self::Q360P,
        Self::Q480P,
        Self::Q720P,
        Self::Q720P60,
        Self::Q1080P,
        Self::QAiRepair,
        Self::Q1080PP,
        Self::Q1080P60,
        Self::Q4K,
        Self::QHdr,
        Self::QDolby,
        Self::Q8K,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Q240P => "极速 240P",
            Self::Q360P => "流畅 360P",
            Self::Q480P => "清晰 480P",
            Self::Q720P => "高清 720P",
            Self::Q720P60 => "高清 720P60",
            Self::Q1080P => "高清 1080P",
            Self::QAiRepair => "智能修复",
            Self::Q1080PP => "高清 1080P+",
            Self::Q1080P60 => "高清 1080P60",
            Self::Q4K => "超清 4K",
            Self::QHdr => "HDR 真彩色",
            Self::QDolby => "杜比视界",
            Self::Q8K => "超高清 8K",
        }
    }
}

impl Default for VideoQuality {
    fn default() -> Self {
        Self::Q1080P // 默认选择 1080P
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("无效的清晰度代码: {0}")]
pub struct UnknownQuality(pub i32);

impl TryFrom<i32> for VideoQuality {
    type Error = UnknownQuality;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|q| q.code() == code)
            .ok_or(UnknownQuality(code))
    }
}

impl From<VideoQuality> for i32 {
    fn from(quality: VideoQuality) -> Self {
        quality.code()
    }
}

/// 已登录用户的 SESSDATA 凭证，构造时保证非空。
#[derive(Clone, PartialEq, Eq)]
pub struct Session(String);

impl Session {
    pub fn new(sessdata: impl Into<String>) -> Option<Self> {
        let sessdata = sessdata.into();
        let trimmed = sessdata.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn sessdata(&self) -> &str {
        &self.0
    }

    pub fn cookie_header(&self) -> String {
        format!("SESSDATA={}", self.0)
    }
}

// 不在日志里输出凭证
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session(***)")
    }
}
