use async_trait::async_trait;

use super::error::ApiError;
use super::models::{PlayInfo, SeasonInfo, VideoInfo};
use crate::common::models::Session;

/// 内容接口：把 bvid / ep_id / season_id 解析成元数据与播放地址。
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn get_video_info(&self, session: &Session, bvid: &str) -> Result<VideoInfo, ApiError>;

    /// `epid` 与 `ssid` 只有一个非零。
    async fn get_season_info(
        &self,
        session: &Session,
        epid: i64,
        ssid: i64,
    ) -> Result<SeasonInfo, ApiError>;

    async fn get_play_info(
        &self,
        session: &Session,
        bvid: &str,
        cid: i64,
    ) -> Result<PlayInfo, ApiError>;
}

/// 短链接跳转查询，返回 Location 头指向的地址。
#[async_trait]
pub trait RedirectLookup: Send + Sync {
    async fn redirect_location(&self, url: &str) -> Result<String, ApiError>;
}
