use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue, LOCATION, REFERER, USER_AGENT},
    redirect::Policy,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use super::api_trait::{ContentApi, RedirectLookup};
use super::error::ApiError;
use super::models::{CommonResponse, PlayInfo, SeasonInfo, VideoInfo};
use crate::common::models::Session;

const VIDEO_VIEW_API: &str = "https://api.bilibili.com/x/web-interface/view";
const SEASON_VIEW_API: &str = "https://api.bilibili.com/pgc/view/web/season";
const PLAY_URL_API: &str = "https://api.bilibili.com/x/player/playurl";

// 请求 DASH + HDR + 4K + 杜比 + 8K 全部格式
const FNVAL_ALL_DASH: &str = "4048";

#[derive(Debug, Clone)]
pub struct BiliClient {
    inner: Client,
    // 不跟随跳转，只用来读取短链接的 Location
    no_redirect: Client,
}

impl BiliClient {
    pub fn new() -> Result<Self, ApiError> {
        let inner = ClientBuilder::new()
            .timeout(Duration::from_secs(10))
            .default_headers(Self::get_default_headers())
            .build()?;
        let no_redirect = ClientBuilder::new()
            .timeout(Duration::from_secs(10))
            .redirect(Policy::none())
            .default_headers(Self::get_default_headers())
            .build()?;

        Ok(Self { inner, no_redirect })
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.bilibili.com/"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36"));

        headers
    }

    // 通用请求，带上 SESSDATA
    async fn get<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!("请求接口: {} {:?}", url, query);

        let resp = self
            .inner
            .get(url)
            .query(query)
            .header(COOKIE, session.cookie_header())
            .send()
            .await
            .map_err(|e| {
                error!("请求失败: {}", e);
                e
            })?;

        Self::handle_response::<T>(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        if status.is_server_error() {
            return Err(ApiError::RetryLater);
        }

        let raw_body = resp.bytes().await?;
        let json_value: Value = serde_json::from_slice(&raw_body).map_err(|_| {
            ApiError::InvalidResponse(String::from_utf8_lossy(&raw_body).into_owned())
        })?;

        // 处理 B站 API 的标准返回格式
        if let Some(code) = json_value.get("code").and_then(|v| v.as_i64()) {
            if code != 0 {
                let message = json_value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown error")
                    .to_string();
                return Err(ApiError::ApiError(code, message));
            }
        }

        let envelope: CommonResponse<T> = serde_json::from_value(json_value)?;
        envelope
            .into_payload()
            .ok_or_else(|| ApiError::InvalidResponse("响应中没有 data/result 字段".to_string()))
    }
}

#[async_trait]
impl ContentApi for BiliClient {
    async fn get_video_info(&self, session: &Session, bvid: &str) -> Result<VideoInfo, ApiError> {
        self.get(session, VIDEO_VIEW_API, &[("bvid", bvid.to_string())])
            .await
    }

    async fn get_season_info(
        &self,
        session: &Session,
        epid: i64,
        ssid: i64,
    ) -> Result<SeasonInfo, ApiError> {
        let query = if epid != 0 {
            [("ep_id", epid.to_string())]
        } else {
            [("season_id", ssid.to_string())]
        };
        self.get(session, SEASON_VIEW_API, &query).await
    }

    async fn get_play_info(
        &self,
        session: &Session,
        bvid: &str,
        cid: i64,
    ) -> Result<PlayInfo, ApiError> {
        let query = [
            ("bvid", bvid.to_string()),
            ("cid", cid.to_string()),
            ("fnval", FNVAL_ALL_DASH.to_string()),
            ("fnver", "0".to_string()),
            ("fourk", "1".to_string()),
        ];
        self.get(session, PLAY_URL_API, &query).await
    }
}

#[async_trait]
impl RedirectLookup for BiliClient {
    async fn redirect_location(&self, url: &str) -> Result<String, ApiError> {
        let resp = self.no_redirect.get(url).send().await?;

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ApiError::MissingLocation(url.to_string()))?;

        debug!("短链接 {} -> {}", url, location);
        Ok(location)
    }
}
