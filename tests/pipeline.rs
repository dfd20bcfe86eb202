mod common;

use std::sync::Arc;
use std::time::Duration;

use bili_taskd::TaskError;
use bili_taskd::storage::settings::DOWNLOAD_FOLDER;
use bili_taskd::task::{BatchItem, TaskCandidate, TaskStatus};
use common::{BVID, FakeApi, RecordingWorker, harness};

#[tokio::test]
async fn video_link_creates_one_waiting_task_in_base_folder() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = harness(dir.path(), FakeApi::default(), true);

    let task = h
        .service
        .submit_url(&format!("https://bilibili.com/video/{}", BVID), 80)
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Waiting);
    assert_eq!(task.folder, dir.path());
    assert_eq!(task.bvid, BVID);
    assert_eq!(task.cid, 1001);
    assert_eq!(task.owner, "某UP主");
    assert_eq!(task.video, "https://upos.example/1080.m4s");
    assert_eq!(task.audio, "https://upos.example/192k.m4s");

    let stored = h.service.list_tasks(0, 360).await.unwrap();
    assert_eq!(stored, vec![task.clone()]);
    assert_eq!(h.queue.try_next(), Some(task));
    assert_eq!(h.queue.try_next(), None);
}

#[tokio::test]
async fn season_link_uses_first_episode_and_series_folder() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), FakeApi::default(), true);

    let task = h
        .service
        .submit_url("https://www.bilibili.com/bangumi/play/ss12345", 0)
        .await
        .unwrap();

    let series_dir = dir.path().join("葬送的芙莉莲 第一季");
    assert_eq!(task.folder, series_dir);
    assert!(series_dir.is_dir());
    assert_eq!(task.bvid, "BV1ep411c7m1");
    assert_eq!(task.cid, 2001);
    assert_eq!(task.owner, "番剧");
    assert_eq!(task.duration, 1420);
    assert_eq!(
        h.api.calls(),
        vec!["season:0:12345", "play:BV1ep411c7m1:2001"]
    );
    assert_eq!(h.service.list_tasks(0, 360).await.unwrap().len(), 1);
}

#[tokio::test]
async fn short_link_follows_one_redirect() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeApi::default().with_redirect(
        "https://b23.tv/abc123",
        "https://www.bilibili.com/bangumi/play/ep701",
    );
    let h = harness(dir.path(), api, true);

    let task = h.service.submit_url("https://b23.tv/abc123", 64).await.unwrap();
    assert_eq!(task.video, "https://upos.example/720.m4s");
    assert_eq!(h.api.calls()[1], "season:701:0");
}

#[tokio::test]
async fn failures_leave_no_task_behind() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), FakeApi::default(), false);

    let err = h
        .service
        .submit_url(&format!("https://bilibili.com/video/{}", BVID), 80)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::NotAuthenticated));
    assert!(h.api.calls().is_empty());

    let h = harness(dir.path(), FakeApi::default(), true);
    let err = h
        .service
        .submit_url("https://example.com/watch?v=1", 80)
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::UnrecognizedLink(_)));

    let err = h.service.submit_url("https://b23.tv/nowhere", 80).await.unwrap_err();
    assert!(matches!(err, TaskError::RedirectResolution(_)));

    assert!(h.service.list_tasks(0, 360).await.unwrap().is_empty());
}

fn item(title: &str, season_title: &str) -> BatchItem {
    BatchItem {
        candidate: TaskCandidate {
            bvid: BVID.to_string(),
            cid: 1,
            format: 80,
            title: title.to_string(),
            owner: "番剧".to_string(),
            cover: "https://i0.hdslb.com/c.jpg".to_string(),
            audio: "https://upos.example/a.m4s".to_string(),
            video: "https://upos.example/v.m4s".to_string(),
            duration: 1420,
        },
        season_title: season_title.to_string(),
    }
}

#[tokio::test]
async fn batch_shares_the_first_items_series_folder() {
    let dir = tempfile::tempdir().unwrap();
    let custom = dir.path().join("custom");
    let h = harness(dir.path(), FakeApi::default(), true);
    h.db.set_setting(DOWNLOAD_FOLDER, &custom.to_string_lossy()).unwrap();

    let tasks = h
        .service
        .submit_batch(vec![
            item("[1080P][MySeries] Ep01", ""),
            item("第2话", "Ignored"),
        ])
        .await
        .unwrap();

    assert_eq!(tasks.len(), 2);
    for task in &tasks {
        assert_eq!(task.folder, custom.join("MySeries"));
    }
    assert_eq!(tasks[0].title, "[1080P][MySeries] Ep01");
}

#[tokio::test]
async fn batch_failure_keeps_earlier_items() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = harness(dir.path(), FakeApi::default(), true);

    let mut broken = item("第2话", "");
    broken.candidate.cover = String::new();
    let err = h
        .service
        .submit_batch(vec![item("第1话", ""), broken, item("第3话", "")])
        .await
        .unwrap_err();

    assert!(matches!(err, TaskError::MissingField("cover")));
    let stored = h.service.list_tasks(0, 360).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "第1话");
    assert_eq!(stored[0].folder, dir.path());
    assert!(h.queue.try_next().is_some());
    assert!(h.queue.try_next().is_none());
}

#[tokio::test]
async fn batch_reports_identifier_before_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), FakeApi::default(), true);

    let mut bad = item("第1话", "");
    bad.candidate.bvid = "not-a-bvid".to_string();
    bad.candidate.cover = String::new();
    let err = h.service.submit_batch(vec![bad]).await.unwrap_err();

    assert!(matches!(err, TaskError::InvalidIdentifierFormat(_)));
    assert!(h.service.list_tasks(0, 360).await.unwrap().is_empty());
}

#[tokio::test]
async fn worker_pool_completes_dispatched_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), FakeApi::default(), true);
    let worker = Arc::new(RecordingWorker::default());
    h.queue.start(worker.clone(), 2);

    let tasks = h
        .service
        .submit_batch(vec![item("第1话", "某番剧"), item("第2话", "")])
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let mut done = true;
            for task in &tasks {
                let status = h.service.get_status(task.id).await.map(|t| t.status);
                done &= matches!(status, Ok(TaskStatus::Done));
            }
            if done && h.service.list_active().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    let mut started = worker.started.lock().unwrap().clone();
    started.sort();
    assert_eq!(started, tasks.iter().map(|t| t.id).collect::<Vec<_>>());
}

#[tokio::test]
async fn remove_and_lookup_of_missing_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), FakeApi::default(), true);

    assert!(matches!(h.service.get_status(42).await, Err(TaskError::NotFound(42))));
    assert!(!h.service.remove(42).await.unwrap());

    let task = h.service.submit_batch(vec![item("第1话", "")]).await.unwrap().remove(0);
    std::fs::write(task.file_path(), b"data").unwrap();
    assert!(h.service.remove(task.id).await.unwrap());
    assert!(!task.file_path().exists());
    assert!(h.service.list_active().is_empty());
}
