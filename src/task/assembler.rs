use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::models::{Task, TaskCandidate, TaskStatus};
use super::planner::plan_destination;
use super::sanitize::sanitize_file_name;
use super::validate::{check_bvid_format, check_format_code, is_valid_url};
use crate::common::models::VideoQuality;
use crate::error::TaskError;
use crate::storage::Db;

/// 按固定顺序校验，遇到第一个错误即返回，不合并多个错误
pub fn validate_candidate(candidate: &TaskCandidate) -> Result<VideoQuality, TaskError> {
    if !check_bvid_format(&candidate.bvid) {
        return Err(TaskError::InvalidIdentifierFormat(candidate.bvid.clone()));
    }
    check_required_metadata(candidate)?;
    if !is_valid_url(&candidate.cover) {
        return Err(TaskError::InvalidCoverUrl);
    }
    if !is_valid_url(&candidate.audio) {
        return Err(TaskError::InvalidAudioUrl);
    }
    if !is_valid_url(&candidate.video) {
        return Err(TaskError::InvalidVideoUrl);
    }
    check_format_code(candidate.format)
}

fn check_required_metadata(candidate: &TaskCandidate) -> Result<(), TaskError> {
    if candidate.cover.is_empty() {
        return Err(TaskError::MissingField("cover"));
    }
    if candidate.title.is_empty() {
        return Err(TaskError::MissingField("title"));
    }
    if candidate.owner.is_empty() {
        return Err(TaskError::MissingField("owner"));
    }
    Ok(())
}

/// 校验、规划目录、清洗标题后持久化，返回带 ID 的 `waiting` 任务。
///
/// 所有校验都在写库之前完成，失败时不会留下半条记录。
pub async fn assemble(
    db: &Arc<Db>,
    candidate: TaskCandidate,
    base_folder: &Path,
    series_title: &str,
) -> Result<Task, TaskError> {
    let format = validate_candidate(&candidate)?;

    let title = sanitize_file_name(&candidate.title);
    if title.is_empty() {
        return Err(TaskError::MissingField("title"));
    }

    let folder = plan_destination(base_folder, series_title).await?;

    let mut task = Task {
        id: 0,
        bvid: candidate.bvid,
        cid: candidate.cid,
        format,
        title,
        owner: candidate.owner,
        cover: candidate.cover,
        status: TaskStatus::Waiting,
        folder,
        audio: candidate.audio,
        video: candidate.video,
        duration: candidate.duration,
        create_at: chrono::Local::now().timestamp(),
    };
    let row = task.clone();
    task.id = db.call(move |db| db.create_task(&row)).await?;

    info!("任务已创建: #{} {} -> {:?}", task.id, task.title, task.folder);
    Ok(task)
}
