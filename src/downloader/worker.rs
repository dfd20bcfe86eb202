use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, ClientBuilder};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::error::DownloadError;
use super::merger::MediaMerger;
use crate::common::api::client::BiliClient;
use crate::task::models::Task;

/// 真正执行下载的一方。派发器只负责把任务交给它，不关心耗时。
#[async_trait]
pub trait TaskWorker: Send + Sync {
    async fn start(&self, task: &Task) -> Result<(), DownloadError>;
}

/// 分别下载视频流和音频流，再用 ffmpeg 合并
pub struct StreamWorker {
    client: Client,
    merger: MediaMerger,
}

impl StreamWorker {
    pub fn new(merger: MediaMerger) -> Result<Self, DownloadError> {
        // 下载大文件不设整体超时，只限制连接时间
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .default_headers(BiliClient::get_default_headers())
            .build()?;
        Ok(Self { client, merger })
    }

    async fn download_file(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::BadStatus(url.to_string(), status.as_u16()));
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("下载完成 {:?}: {} 字节", path, downloaded);
        Ok(downloaded)
    }

    fn temp_path(task: &Task, kind: &str) -> PathBuf {
        task.folder.join(format!(".{}-{}.{}.m4s", task.bvid, task.id, kind))
    }
}

#[async_trait]
impl TaskWorker for StreamWorker {
    async fn start(&self, task: &Task) -> Result<(), DownloadError> {
        let video_path = Self::temp_path(task, "video");
        let audio_path = Self::temp_path(task, "audio");

        info!("开始下载视频流: #{}", task.id);
        let result = async {
            self.download_file(&task.video, &video_path).await?;
            info!("开始下载音频流: #{}", task.id);
            self.download_file(&task.audio, &audio_path).await?;
            self.merger
                .merge_av(&video_path, &audio_path, &task.file_path())
                .await
        }
        .await;

        for tmp in [&video_path, &audio_path] {
            if let Err(e) = tokio::fs::remove_file(tmp).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("临时文件清理失败 {:?}: {}", tmp, e);
                }
            }
        }

        result
    }
}
