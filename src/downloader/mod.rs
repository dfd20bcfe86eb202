use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::TaskError;
use crate::storage::Db;
use crate::task::models::{Task, TaskStatus};
use worker::TaskWorker;

pub mod error;
pub mod merger;
pub mod worker;

// 活跃任务快照，只供状态展示，不作为删除或查询的依据
type ActiveTasks = Arc<DashMap<i64, Task>>;

/// 任务派发器：把已持久化的任务放进队列后立即返回。
#[derive(Clone)]
pub struct Dispatcher {
    queue: mpsc::UnboundedSender<Task>,
    active: ActiveTasks,
    db: Arc<Db>,
}

/// 派发队列的消费端，由 `start` 交给工作池
pub struct TaskQueue {
    rx: mpsc::UnboundedReceiver<Task>,
    active: ActiveTasks,
    db: Arc<Db>,
}

impl Dispatcher {
    pub fn new(db: Arc<Db>) -> (Self, TaskQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        let active: ActiveTasks = Arc::new(DashMap::new());
        let dispatcher = Self {
            queue: tx,
            active: Arc::clone(&active),
            db: Arc::clone(&db),
        };
        (dispatcher, TaskQueue { rx, active, db })
    }

    /// 入队即返回，不等待下载完成
    pub fn dispatch(&self, task: Task) -> Result<(), TaskError> {
        let id = task.id;
        self.active.insert(id, task.clone());
        self.queue.send(task).map_err(|_| {
            self.active.remove(&id);
            TaskError::QueueClosed
        })?;
        debug!("任务 #{} 已入队", id);
        Ok(())
    }

    pub fn list_active(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.active.iter().map(|e| e.value().clone()).collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }

    /// 从数据库读取任务状态
    pub async fn get_status(&self, id: i64) -> Result<Task, TaskError> {
        self.db
            .call(move |db| db.get_task(id))
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// 删除任务文件和记录，返回是否真的删除了记录。
    /// 任务不存在或文件已不在都视为成功。
    pub async fn remove(&self, id: i64) -> Result<bool, TaskError> {
        let Some(task) = self.db.call(move |db| db.get_task(id)).await? else {
            debug!("任务 #{} 不存在，忽略删除", id);
            self.active.remove(&id);
            return Ok(false);
        };

        let path = task.file_path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("已删除文件 {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(TaskError::FileRemoval { path, source }),
        }

        self.db.call(move |db| db.delete_task(id)).await?;
        self.active.remove(&id);
        info!("任务 #{} 已删除", id);
        Ok(true)
    }
}

impl TaskQueue {
    /// 测试用：不启动工作池，直接取出下一个已入队的任务
    pub fn try_next(&mut self) -> Option<Task> {
        self.rx.try_recv().ok()
    }

    /// 启动工作池，`concurrency` 限制同时下载的任务数
    pub fn start(self, worker: Arc<dyn TaskWorker>, concurrency: usize) -> JoinHandle<()> {
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let TaskQueue { mut rx, active, db } = self;

        tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                let permit = match Arc::clone(&semaphore).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let worker = Arc::clone(&worker);
                let active = Arc::clone(&active);
                let db = Arc::clone(&db);
                tokio::spawn(async move {
                    let _permit = permit;
                    run_task(task, worker.as_ref(), &db, &active).await;
                });
            }
            debug!("派发队列已关闭");
        })
    }
}

async fn run_task(task: Task, worker: &dyn TaskWorker, db: &Arc<Db>, active: &ActiveTasks) {
    let id = task.id;
    set_status(db, active, id, TaskStatus::Downloading).await;
    info!("开始下载任务 #{}: {}", id, task.title);

    match worker.start(&task).await {
        Ok(()) => {
            set_status(db, active, id, TaskStatus::Done).await;
            info!("✅ 下载任务完成 #{}", id);
        }
        Err(e) => {
            set_status(db, active, id, TaskStatus::Error).await;
            error!("❌ 下载任务失败 #{}: {}", id, e);
        }
    }

    // 结束后只在数据库里保留状态
    active.remove(&id);
}

async fn set_status(db: &Arc<Db>, active: &ActiveTasks, id: i64, status: TaskStatus) {
    if let Err(e) = db.call(move |db| db.update_status(id, status)).await {
        warn!("更新任务 #{} 状态失败: {}", id, e);
    }
    if let Some(mut entry) = active.get_mut(&id) {
        entry.status = status;
    }
}
