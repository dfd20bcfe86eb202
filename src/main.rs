use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing::{debug, info};

use bili_taskd::common::api::api_trait::{ContentApi, RedirectLookup};
use bili_taskd::common::api::client::BiliClient;
use bili_taskd::downloader::Dispatcher;
use bili_taskd::downloader::merger::MediaMerger;
use bili_taskd::downloader::worker::StreamWorker;
use bili_taskd::server;
use bili_taskd::storage::Db;
use bili_taskd::storage::settings::{DOWNLOAD_FOLDER, SESSDATA};
use bili_taskd::task::TaskService;

mod cli;

/// 命令行给出的值只在数据库里还没有对应设置时写入
fn seed_settings(db: &Db, args: &cli::Cli) -> anyhow::Result<()> {
    if let Some(dir) = &args.download_dir {
        if db.get_setting(DOWNLOAD_FOLDER)?.is_none() {
            db.set_setting(DOWNLOAD_FOLDER, &dir.to_string_lossy())?;
            debug!("写入下载目录: {:?}", dir);
        }
    }
    if let Some(sessdata) = &args.sessdata {
        if db.get_setting(SESSDATA)?.is_none() {
            db.set_setting(SESSDATA, sessdata)?;
            debug!("写入登录信息");
        }
    }
    Ok(())
}

fn print_banner(args: &cli::Cli) {
    println!("{}", "BiliTaskd".cyan().bold());
    println!("{} http://{}/api", "▶".green().bold(), args.listen);
    println!("{} {}", "📁".blue().bold(), args.db.display());
    println!("{} 并发数: {}", "⚙".yellow().bold(), args.workers);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let db = Arc::new(
        Db::open(&args.db).with_context(|| format!("打开数据库失败: {:?}", args.db))?,
    );
    seed_settings(&db, &args)?;

    let client = Arc::new(BiliClient::new()?);
    let worker = Arc::new(StreamWorker::new(MediaMerger::new(args.ffmpeg.clone()))?);

    let (dispatcher, queue) = Dispatcher::new(Arc::clone(&db));
    queue.start(worker, args.workers);

    let default_folder = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("downloads");
    let api: Arc<dyn ContentApi> = client.clone();
    let redirects: Arc<dyn RedirectLookup> = client;
    let service = TaskService::new(db, api, redirects, dispatcher, default_folder);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("监听 {} 失败", args.listen))?;
    print_banner(&args);
    info!("服务已启动: {}", args.listen);

    axum::serve(listener, server::router(Arc::new(service))).await?;
    Ok(())
}
