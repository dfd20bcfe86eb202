use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum DownloadError {
    HttpError(reqwest::Error),
    IoError(std::io::Error),
    BadStatus(String, u16),
    FileNotFound(PathBuf),
    MergeError(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::HttpError(e) => write!(f, "HTTP错误: {}", e),
            DownloadError::IoError(e) => write!(f, "IO错误: {}", e),
            DownloadError::BadStatus(url, code) => write!(f, "下载地址返回 {}: {}", code, url),
            DownloadError::FileNotFound(path) => write!(f, "文件不存在: {:?}", path),
            DownloadError::MergeError(msg) => write!(f, "合并错误: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<reqwest::Error> for DownloadError {
    fn from(error: reqwest::Error) -> Self {
        DownloadError::HttpError(error)
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(error: std::io::Error) -> Self {
        DownloadError::IoError(error)
    }
}
