use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::common::api::api_trait::RedirectLookup;
use crate::error::TaskError;

/// 短链接最多展开一跳，第二次仍是短链接视为解析失败。
pub const MAX_REDIRECT_HOPS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Video,   // 普通视频，id 为 bvid
    Season,  // 番剧整季，id 为 season_id
    Episode, // 番剧单集，id 为 ep_id
}

impl LinkType {
    pub fn is_series(self) -> bool {
        matches!(self, Self::Season | Self::Episode)
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Season => write!(f, "season"),
            Self::Episode => write!(f, "episode"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    pub id: String,
    pub link_type: LinkType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkMatch {
    Content(ContentRef),
    Short(String), // b23.tv 短码
}

#[derive(Debug, Clone, Copy)]
enum PatternKind {
    Content(LinkType),
    Short,
}

lazy_static! {
    // 按优先级排列，第一个命中的生效
    static ref LINK_PATTERNS: Vec<(Regex, PatternKind)> = vec![
        (Regex::new(r"bilibili\.com/video/(BV[0-9A-Za-z]{10})").unwrap(),
            PatternKind::Content(LinkType::Video)),
        (Regex::new(r"b23\.tv/(\w+)").unwrap(),
            PatternKind::Short),
        (Regex::new(r"bilibili\.com/bangumi/play/ss(\d+)").unwrap(),
            PatternKind::Content(LinkType::Season)),
        (Regex::new(r"bilibili\.com/bangumi/play/ep(\d+)").unwrap(),
            PatternKind::Content(LinkType::Episode)),
    ];
}

/// 只做模式匹配，不发请求。
pub fn match_link(url: &str) -> Option<LinkMatch> {
    LINK_PATTERNS.iter().find_map(|(pattern, kind)| {
        let caps = pattern.captures(url)?;
        let token = caps[1].to_string();
        Some(match kind {
            PatternKind::Content(link_type) => LinkMatch::Content(ContentRef {
                id: token,
                link_type: *link_type,
            }),
            PatternKind::Short => LinkMatch::Short(token),
        })
    })
}

/// 把任意 B站链接解析成 `(id, 类型)`，短链接通过跳转展开。
pub async fn resolve_link<R>(url: &str, lookup: &R) -> Result<ContentRef, TaskError>
where
    R: RedirectLookup + ?Sized,
{
    let mut current = url.trim().to_string();
    let mut hops = 0;

    loop {
        match match_link(&current) {
            Some(LinkMatch::Content(content)) => {
                debug!("链接 {} 解析为 {} {}", url, content.link_type, content.id);
                return Ok(content);
            }
            Some(LinkMatch::Short(code)) => {
                if hops >= MAX_REDIRECT_HOPS {
                    return Err(TaskError::RedirectResolution(format!(
                        "短链接跳转超过 {} 次: {}",
                        MAX_REDIRECT_HOPS, current
                    )));
                }
                hops += 1;

                let short_url = format!("https://b23.tv/{}", code);
                info!("展开短链接: {}", short_url);
                current = lookup
                    .redirect_location(&short_url)
                    .await
                    .map_err(|e| TaskError::RedirectResolution(e.to_string()))?;
            }
            None => return Err(TaskError::UnrecognizedLink(current)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::api::error::ApiError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedRedirects {
        targets: Mutex<Vec<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRedirects {
        fn new(targets: &[&str]) -> Self {
            Self {
                targets: Mutex::new(targets.iter().rev().map(|s| s.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RedirectLookup for ScriptedRedirects {
        async fn redirect_location(&self, url: &str) -> Result<String, ApiError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.targets
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ApiError::MissingLocation(url.to_string()))
        }
    }

    fn content(id: &str, link_type: LinkType) -> Option<LinkMatch> {
        Some(LinkMatch::Content(ContentRef {
            id: id.to_string(),
            link_type,
        }))
    }

    #[test]
    fn matches_each_link_shape() {
        assert_eq!(
            match_link("https://www.bilibili.com/video/BV1xx411c7mD/?spm_id_from=333"),
            content("BV1xx411c7mD", LinkType::Video)
        );
        assert_eq!(
            match_link("https://m.bilibili.com/video/BV1N6nEzhEz6"),
            content("BV1N6nEzhEz6", LinkType::Video)
        );
        assert_eq!(
            match_link("https://www.bilibili.com/bangumi/play/ss12345?from=search"),
            content("12345", LinkType::Season)
        );
        assert_eq!(
            match_link("https://www.bilibili.com/bangumi/play/ep778899"),
            content("778899", LinkType::Episode)
        );
        assert_eq!(
            match_link("https://b23.tv/aBc123"),
            Some(LinkMatch::Short("aBc123".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_links() {
        assert_eq!(match_link("https://www.youtube.com/watch?v=abc"), None);
        assert_eq!(match_link("https://www.bilibili.com/video/av170001"), None);
        assert_eq!(match_link("https://www.bilibili.com/video/BV123"), None);
    }

    #[tokio::test]
    async fn direct_link_needs_no_lookup() {
        let lookup = ScriptedRedirects::new(&[]);
        let r = resolve_link("https://bilibili.com/video/BV1xx411c7mD", &lookup)
            .await
            .unwrap();
        assert_eq!(r.link_type, LinkType::Video);
        assert_eq!(r.id, "BV1xx411c7mD");
        assert!(lookup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_link_resolves_to_target_type() {
        let lookup =
            ScriptedRedirects::new(&["https://www.bilibili.com/bangumi/play/ep42?share_source=copy"]);
        let r = resolve_link("【分享】 https://b23.tv/xYz9", &lookup).await.unwrap();
        assert_eq!(
            r,
            ContentRef {
                id: "42".to_string(),
                link_type: LinkType::Episode
            }
        );
        assert_eq!(*lookup.calls.lock().unwrap(), vec!["https://b23.tv/xYz9".to_string()]);
    }

    #[tokio::test]
    async fn chained_short_links_stop_after_one_hop() {
        let lookup = ScriptedRedirects::new(&[
            "https://b23.tv/second",
            "https://www.bilibili.com/video/BV1xx411c7mD",
        ]);
        let err = resolve_link("https://b23.tv/first", &lookup).await.unwrap_err();
        assert!(matches!(err, TaskError::RedirectResolution(_)));
        assert_eq!(lookup.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_lookup_is_redirect_error() {
        let lookup = ScriptedRedirects::new(&[]);
        let err = resolve_link("https://b23.tv/gone", &lookup).await.unwrap_err();
        assert!(matches!(err, TaskError::RedirectResolution(_)));
    }

    #[tokio::test]
    async fn short_link_to_unknown_page_is_unrecognized() {
        let lookup = ScriptedRedirects::new(&["https://space.bilibili.com/12345"]);
        let err = resolve_link("https://b23.tv/up", &lookup).await.unwrap_err();
        assert!(matches!(err, TaskError::UnrecognizedLink(_)));
    }
}
