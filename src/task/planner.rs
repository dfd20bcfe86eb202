use std::path::{Path, PathBuf};

use tracing::debug;

use super::sanitize::sanitize_file_name;
use crate::error::TaskError;

/// 计算任务的目标目录。番剧在基础目录下建一个以番剧名命名的子目录。
///
/// 目录已存在不算错误，多个请求并发创建同一番剧目录也是安全的。
/// 不同番剧名清洗后重名时共用同一个目录。
pub async fn plan_destination(base: &Path, series_title: &str) -> Result<PathBuf, TaskError> {
    let series_folder = sanitize_file_name(series_title);
    if series_folder.is_empty() {
        return Ok(base.to_path_buf());
    }

    let folder = base.join(series_folder);
    ensure_dir(&folder).await?;
    debug!("番剧目录: {:?}", folder);
    Ok(folder)
}

pub async fn ensure_dir(path: &Path) -> Result<(), TaskError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| TaskError::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        })
}
