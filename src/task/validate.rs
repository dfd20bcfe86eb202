use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::common::models::VideoQuality;
use crate::error::TaskError;

lazy_static! {
    static ref BVID_PATTERN: Regex = Regex::new(r"^BV[0-9A-Za-z]{10}$").unwrap();
}

pub fn check_bvid_format(bvid: &str) -> bool {
    BVID_PATTERN.is_match(bvid)
}

/// 只接受带主机名的 http/https 绝对地址
pub fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

pub fn check_format_code(code: i32) -> Result<VideoQuality, TaskError> {
    VideoQuality::try_from(code).map_err(|e| TaskError::InvalidFormatCode(e.0))
}
