use tracing::{debug, info};

use super::url_parser::{ContentRef, LinkType};
use crate::common::api::api_trait::ContentApi;
use crate::common::api::error::ApiError;
use crate::common::api::models::PlayInfo;
use crate::common::models::Session;
use crate::error::TaskError;

// 番剧没有 UP 主，沿用固定的拥有者名
pub const SERIES_OWNER: &str = "番剧";

/// 解析出的可播放单元（普通视频的第一个分P，或番剧的第一集）
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub bvid: String,
    pub cid: i64,
    pub title: String,
    pub owner: String,
    pub cover: String,
    pub duration: i64,
    /// 为空表示不属于番剧
    pub series_title: String,
    pub play_info: PlayInfo,
}

/// 校验登录凭证，空凭证直接拒绝
pub fn require_session(sessdata: Option<&str>) -> Result<Session, TaskError> {
    sessdata
        .and_then(Session::new)
        .ok_or(TaskError::NotAuthenticated)
}

pub async fn resolve_media<A>(
    api: &A,
    sessdata: Option<&str>,
    content: &ContentRef,
) -> Result<ResolvedMedia, TaskError>
where
    A: ContentApi + ?Sized,
{
    let session = require_session(sessdata)?;

    let mut media = match content.link_type {
        LinkType::Video => resolve_video(api, &session, &content.id).await?,
        LinkType::Season | LinkType::Episode => resolve_series(api, &session, content).await?,
    };

    media.play_info = api
        .get_play_info(&session, &media.bvid, media.cid)
        .await
        .map_err(TaskError::upstream("播放信息"))?;

    info!(
        "解析完成: {} (bvid={}, cid={}, 番剧={:?})",
        media.title, media.bvid, media.cid, media.series_title
    );
    Ok(media)
}

async fn resolve_video<A>(api: &A, session: &Session, bvid: &str) -> Result<ResolvedMedia, TaskError>
where
    A: ContentApi + ?Sized,
{
    let video = api
        .get_video_info(session, bvid)
        .await
        .map_err(TaskError::upstream("视频信息"))?;

    // 使用第一个分P
    let page = video.pages.first().ok_or_else(|| TaskError::Upstream {
        stage: "视频信息",
        source: ApiError::InvalidResponse(format!("视频 {} 没有可播放的分P", video.bvid)),
    })?;

    Ok(ResolvedMedia {
        bvid: video.bvid.clone(),
        cid: page.cid,
        title: video.title.clone(),
        owner: video.owner.name.clone(),
        cover: video.pic.clone(),
        duration: page.duration,
        series_title: String::new(),
        play_info: PlayInfo::default(),
    })
}

async fn resolve_series<A>(
    api: &A,
    session: &Session,
    content: &ContentRef,
) -> Result<ResolvedMedia, TaskError>
where
    A: ContentApi + ?Sized,
{
    let id: i64 = content
        .id
        .parse()
        .map_err(|_| TaskError::UnrecognizedLink(content.id.clone()))?;
    let (epid, ssid) = match content.link_type {
        LinkType::Episode => (id, 0),
        _ => (0, id),
    };

    let season = api
        .get_season_info(session, epid, ssid)
        .await
        .map_err(TaskError::upstream("番剧信息"))?;

    // 链接触发的番剧下载只取第一集，整季下载走批量提交
    let episode = season
        .episodes
        .first()
        .ok_or(TaskError::IncompleteSeriesData)?;
    debug!(
        "番剧 {} 共 {} 集，取第一集 ep{}",
        season.title,
        season.episodes.len(),
        episode.id
    );

    let title = if episode.long_title.is_empty() {
        format!("{} 第{}话", season.title, episode.title)
    } else {
        episode.long_title.clone()
    };

    Ok(ResolvedMedia {
        bvid: episode.bvid.clone(),
        cid: episode.cid,
        title,
        owner: SERIES_OWNER.to_string(),
        cover: episode.cover.clone(),
        duration: episode.duration_secs(),
        series_title: season.title.clone(),
        play_info: PlayInfo::default(),
    })
}
