use serde_derive::{Deserialize, Serialize};

// B站接口的通用返回格式，普通视频用 data，番剧用 result
#[derive(Debug, Deserialize)]
pub struct CommonResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    pub result: Option<T>,
}

impl<T> CommonResponse<T> {
    pub fn into_payload(self) -> Option<T> {
        self.data.or(self.result)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    pub bvid: String,
    pub title: String,
    #[serde(default)]
    pub pic: String,
    #[serde(default)]
    pub duration: i64,
    pub owner: Owner,
    #[serde(default)]
    pub pages: Vec<VideoPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub mid: i64,
    pub name: String,
    #[serde(default)]
    pub face: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoPage {
    pub cid: i64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub part: String,
    #[serde(default)]
    pub duration: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonInfo {
    pub title: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64, // ep_id
    pub bvid: String,
    pub cid: i64,
    #[serde(default)]
    pub title: String, // 集数，如 "1"
    #[serde(default)]
    pub long_title: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub duration: i64, // 毫秒
}

impl Episode {
    pub fn duration_secs(&self) -> i64 {
        self.duration / 1000
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayInfo {
    pub dash: DashInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashInfo {
    #[serde(default)]
    pub video: Vec<DashItem>,
    #[serde(default)]
    pub audio: Option<Vec<DashItem>>,
    #[serde(default)]
    pub dolby: Option<DolbyInfo>,
    #[serde(default)]
    pub flac: Option<FlacInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DolbyInfo {
    #[serde(default)]
    pub audio: Option<Vec<DashItem>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlacInfo {
    #[serde(default)]
    pub audio: Option<DashItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashItem {
    pub id: i32,
    pub base_url: String,
    #[serde(default)]
    pub bandwidth: i64,
    #[serde(default)]
    pub codecs: String,
}
