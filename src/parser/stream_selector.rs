use crate::common::api::error::ApiError;
use crate::common::api::models::{DashInfo, DashItem};
use crate::common::models::VideoQuality;
use tracing::{debug, warn};

/// 选择视频流：精确匹配清晰度，否则取不超过目标的最高清晰度，再否则取最低清晰度
pub fn select_video_stream(streams: &[DashItem], quality: VideoQuality) -> Result<String, ApiError> {
    if streams.is_empty() {
        return Err(ApiError::InvalidResponse(
            "没有可用的视频流。可能原因：1. 视频需要大会员权限 2. 当前清晰度不可用 3. Cookie已过期，请重新登录".to_string(),
        ));
    }

    let target = quality.code();
    debug!("可用的视频流数量: {}, 目标清晰度ID: {}", streams.len(), target);

    if let Some(stream) = streams.iter().find(|s| s.id == target) {
        debug!("找到精确匹配的清晰度: ID={}", stream.id);
        return Ok(stream.base_url.clone());
    }

    if let Some(stream) = streams.iter().filter(|s| s.id <= target).max_by_key(|s| s.id) {
        debug!("选择最接近的清晰度: ID={} (目标: {})", stream.id, target);
        return Ok(stream.base_url.clone());
    }

    // 所有流都高于目标，降级到最低
    let fallback = streams.iter().min_by_key(|s| s.id).unwrap_or(&streams[0]);
    if target >= VideoQuality::Q1080PP.code() {
        warn!("目标清晰度 {} 可能需要大会员权限", target);
    }
    debug!("降级到最低可用清晰度: ID={}", fallback.id);
    Ok(fallback.base_url.clone())
}

/// 选择音频流：FLAC 优先，其次杜比全景声，最后取带宽最高的普通音频
pub fn select_audio_stream(dash: &DashInfo) -> Result<String, ApiError> {
    if let Some(flac) = dash.flac.as_ref().and_then(|f| f.audio.as_ref()) {
        debug!("选择 FLAC 音频流: ID={}", flac.id);
        return Ok(flac.base_url.clone());
    }

    if let Some(dolby) = dash
        .dolby
        .as_ref()
        .and_then(|d| d.audio.as_ref())
        .and_then(|a| a.first())
    {
        debug!("选择杜比音频流: ID={}", dolby.id);
        return Ok(dolby.base_url.clone());
    }

    dash.audio
        .as_deref()
        .unwrap_or_default()
        .iter()
        .max_by_key(|s| s.bandwidth)
        .map(|s| {
            debug!("选择最高质量音频流: ID={}, 带宽={}", s.id, s.bandwidth);
            s.base_url.clone()
        })
        .ok_or_else(|| {
            ApiError::InvalidResponse(
                "没有可用的音频流。可能原因：1. 视频源异常 2. 网络问题 3. Cookie已过期".to_string(),
            )
        })
}
