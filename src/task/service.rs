use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::assembler::assemble;
use super::models::{BatchItem, Task, TaskCandidate};
use super::planner::ensure_dir;
use crate::common::api::api_trait::{ContentApi, RedirectLookup};
use crate::common::models::VideoQuality;
use crate::downloader::Dispatcher;
use crate::error::TaskError;
use crate::parser::resolver::require_session;
use crate::parser::stream_selector::{select_audio_stream, select_video_stream};
use crate::parser::{infer_series_title, resolve_link, resolve_media};
use crate::storage::Db;
use crate::storage::settings::{DOWNLOAD_FOLDER, SESSDATA};

pub const DEFAULT_PAGE_SIZE: u32 = 360;

/// 链接解析到任务派发的完整流程
pub struct TaskService {
    db: Arc<Db>,
    api: Arc<dyn ContentApi>,
    redirects: Arc<dyn RedirectLookup>,
    dispatcher: Dispatcher,
    default_folder: PathBuf,
}

impl TaskService {
    pub fn new(
        db: Arc<Db>,
        api: Arc<dyn ContentApi>,
        redirects: Arc<dyn RedirectLookup>,
        dispatcher: Dispatcher,
        default_folder: PathBuf,
    ) -> Self {
        Self {
            db,
            api,
            redirects,
            dispatcher,
            default_folder,
        }
    }

    /// 当前的基础下载目录，不存在时创建
    pub async fn base_folder(&self) -> Result<PathBuf, TaskError> {
        let folder = self
            .db
            .call(|db| db.get_setting(DOWNLOAD_FOLDER))
            .await?
            .filter(|f| !f.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_folder.clone());
        ensure_dir(&folder).await?;
        Ok(folder)
    }

    /// 通过链接创建单个下载任务。`format` 为 0 或无效时使用 1080P。
    pub async fn submit_url(&self, url: &str, format: i32) -> Result<Task, TaskError> {
        if url.trim().is_empty() {
            return Err(TaskError::UnrecognizedLink(String::new()));
        }

        let sessdata = self.db.call(|db| db.get_setting(SESSDATA)).await?;
        require_session(sessdata.as_deref())?;

        let content = resolve_link(url, self.redirects.as_ref()).await?;
        let media = resolve_media(self.api.as_ref(), sessdata.as_deref(), &content).await?;

        let quality = VideoQuality::try_from(format).unwrap_or_else(|_| {
            if format != 0 {
                warn!("清晰度代码 {} 无效，使用默认清晰度", format);
            }
            VideoQuality::default()
        });
        let video = select_video_stream(&media.play_info.dash.video, quality)
            .map_err(TaskError::upstream("视频链接"))?;
        let audio = select_audio_stream(&media.play_info.dash)
            .map_err(TaskError::upstream("音频链接"))?;

        let candidate = TaskCandidate {
            bvid: media.bvid,
            cid: media.cid,
            format: quality.code(),
            title: media.title,
            owner: media.owner,
            cover: media.cover,
            audio,
            video,
            duration: media.duration,
        };

        let base = self.base_folder().await?;
        let task = assemble(&self.db, candidate, &base, &media.series_title).await?;
        self.dispatcher.dispatch(task.clone())?;
        Ok(task)
    }

    /// 批量提交已解析好的任务，逐项处理。
    ///
    /// 某一项失败时整个请求报错，但之前已派发的任务不会撤回。
    pub async fn submit_batch(&self, items: Vec<BatchItem>) -> Result<Vec<Task>, TaskError> {
        let base = self.base_folder().await?;

        // 番剧名由第一项决定，整批共用
        let series_title = items
            .first()
            .map(|first| infer_series_title(&first.season_title, &first.candidate.title))
            .unwrap_or_default();
        if !series_title.is_empty() {
            debug!("批量任务识别为番剧: {}", series_title);
        }

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let task = assemble(&self.db, item.candidate, &base, &series_title).await?;
            self.dispatcher.dispatch(task.clone())?;
            created.push(task);
        }

        info!("批量创建任务 {} 个", created.len());
        Ok(created)
    }

    pub async fn list_tasks(&self, page: u32, page_size: u32) -> Result<Vec<Task>, TaskError> {
        Ok(self
            .db
            .call(move |db| db.list_tasks(page, page_size))
            .await?)
    }

    pub fn list_active(&self) -> Vec<Task> {
        self.dispatcher.list_active()
    }

    pub async fn get_status(&self, id: i64) -> Result<Task, TaskError> {
        self.dispatcher.get_status(id).await
    }

    /// 返回 false 表示记录本来就不存在
    pub async fn remove(&self, id: i64) -> Result<bool, TaskError> {
        self.dispatcher.remove(id).await
    }
}
