#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use bili_taskd::common::api::api_trait::{ContentApi, RedirectLookup};
use bili_taskd::common::api::error::ApiError;
use bili_taskd::common::api::models::{
    DashInfo, DashItem, Episode, Owner, PlayInfo, SeasonInfo, VideoInfo, VideoPage,
};
use bili_taskd::common::models::Session;
use bili_taskd::downloader::error::DownloadError;
use bili_taskd::downloader::worker::TaskWorker;
use bili_taskd::downloader::{Dispatcher, TaskQueue};
use bili_taskd::storage::Db;
use bili_taskd::storage::settings::SESSDATA;
use bili_taskd::task::{Task, TaskService};

pub const BVID: &str = "BV1xx411c7mD";
pub const SEASON_TITLE: &str = "葬送的芙莉莲: 第一季";

/// 固定返回内容的接口，并记录调用过的方法
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub redirects: HashMap<String, String>,
}

impl FakeApi {
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ContentApi for FakeApi {
    async fn get_video_info(&self, _: &Session, bvid: &str) -> Result<VideoInfo, ApiError> {
        self.record(format!("video:{}", bvid));
        Ok(VideoInfo {
            bvid: bvid.to_string(),
            title: "测试视频".to_string(),
            pic: "https://i0.hdslb.com/bfs/archive/cover.jpg".to_string(),
            duration: 212,
            owner: Owner {
                mid: 1,
                name: "某UP主".to_string(),
                face: String::new(),
            },
            pages: vec![
                VideoPage {
                    cid: 1001,
                    page: 1,
                    part: "P1".to_string(),
                    duration: 212,
                },
                VideoPage {
                    cid: 1002,
                    page: 2,
                    part: "P2".to_string(),
                    duration: 100,
                },
            ],
        })
    }

    async fn get_season_info(
        &self,
        _: &Session,
        epid: i64,
        ssid: i64,
    ) -> Result<SeasonInfo, ApiError> {
        self.record(format!("season:{}:{}", epid, ssid));
        let episode = |n: i64| Episode {
            id: 700 + n,
            bvid: format!("BV1ep411c7m{}", n),
            cid: 2000 + n,
            title: n.to_string(),
            long_title: format!("第{}集", n),
            cover: format!("https://i0.hdslb.com/ep{}.jpg", n),
            duration: 1_420_000,
        };
        Ok(SeasonInfo {
            title: SEASON_TITLE.to_string(),
            episodes: vec![episode(1), episode(2)],
        })
    }

    async fn get_play_info(&self, _: &Session, bvid: &str, cid: i64) -> Result<PlayInfo, ApiError> {
        self.record(format!("play:{}:{}", bvid, cid));
        let item = |id: i32, url: &str, bandwidth: i64| DashItem {
            id,
            base_url: url.to_string(),
            bandwidth,
            codecs: String::new(),
        };
        Ok(PlayInfo {
            dash: DashInfo {
                video: vec![
                    item(80, "https://upos.example/1080.m4s", 3000),
                    item(64, "https://upos.example/720.m4s", 1500),
                ],
                audio: Some(vec![
                    item(30216, "https://upos.example/64k.m4s", 64),
                    item(30280, "https://upos.example/192k.m4s", 192),
                ]),
                dolby: None,
                flac: None,
            },
        })
    }
}

#[async_trait]
impl RedirectLookup for FakeApi {
    async fn redirect_location(&self, url: &str) -> Result<String, ApiError> {
        self.record(format!("redirect:{}", url));
        self.redirects
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::MissingLocation(url.to_string()))
    }
}

/// 只记录收到的任务，不做实际下载
#[derive(Default)]
pub struct RecordingWorker {
    pub started: Mutex<Vec<i64>>,
}

#[async_trait]
impl TaskWorker for RecordingWorker {
    async fn start(&self, task: &Task) -> Result<(), DownloadError> {
        self.started.lock().unwrap().push(task.id);
        Ok(())
    }
}

pub struct Harness {
    pub db: Arc<Db>,
    pub api: Arc<FakeApi>,
    pub service: TaskService,
    pub queue: TaskQueue,
}

pub fn harness(base: &Path, api: FakeApi, logged_in: bool) -> Harness {
    let db = Arc::new(Db::open_in_memory().unwrap());
    if logged_in {
        db.set_setting(SESSDATA, "fake-sessdata").unwrap();
    }
    let api = Arc::new(api);
    let (dispatcher, queue) = Dispatcher::new(Arc::clone(&db));
    let service = TaskService::new(
        Arc::clone(&db),
        api.clone(),
        api.clone(),
        dispatcher,
        base.to_path_buf(),
    );
    Harness {
        db,
        api,
        service,
        queue,
    }
}
