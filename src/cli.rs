use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// B站下载任务服务
#[derive(Parser, Debug)]
#[command(name = "bili-taskd")]
#[command(version)]
#[command(about = "解析B站链接并调度下载任务的本地服务", long_about = None)]
pub struct Cli {
    /// HTTP 监听地址
    #[arg(long, value_name = "ADDR")]
    #[arg(default_value = "127.0.0.1:8098")]
    pub listen: SocketAddr,

    /// 任务数据库文件
    #[arg(long, value_name = "FILE")]
    #[arg(default_value = "./data/bili_taskd.db")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub db: PathBuf,

    /// 下载目录 (数据库中没有设置时写入)
    #[arg(long, value_name = "DIR")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub download_dir: Option<PathBuf>,

    /// SESSDATA (数据库中没有登录信息时写入)
    #[arg(long, value_name = "SESSDATA")]
    pub sessdata: Option<String>,

    #[arg(long, value_name = "并发数", default_value_t = 3)]
    pub workers: usize,

    /// ffmpeg 可执行文件
    #[arg(long, value_name = "PATH", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// 日志级别: error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: tracing::Level,
}
