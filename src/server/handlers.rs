use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, Request, State};
use axum::http::HeaderValue;
use axum::http::header::CONTENT_DISPOSITION;
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::response::ApiResponse;
use crate::task::service::DEFAULT_PAGE_SIZE;
use crate::task::models::OUTPUT_EXTENSION;
use crate::task::{BatchItem, TaskService, TaskStatus};

type Reply = Result<ApiResponse, ApiResponse>;
type Params = Query<HashMap<String, String>>;

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
    #[serde(default)]
    pub format: i32,
}

/// 解析数字参数，缺失或格式不对时返回 None
fn param<T: std::str::FromStr>(params: &HashMap<String, String>, key: &str) -> Option<T> {
    params.get(key).and_then(|v| v.trim().parse().ok())
}

pub async fn create_task(
    State(service): State<Arc<TaskService>>,
    payload: Result<Json<Vec<BatchItem>>, JsonRejection>,
) -> Reply {
    let Json(items) = payload.map_err(|_| ApiResponse::bad_params())?;
    let tasks = service.submit_batch(items).await?;
    let created: Vec<_> = tasks
        .iter()
        .map(|t| json!({ "task_id": t.id, "title": t.title }))
        .collect();
    Ok(ApiResponse::ok_with("创建成功", created))
}

pub async fn download_by_url(
    State(service): State<Arc<TaskService>>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> Reply {
    let Json(body) = payload.map_err(|_| ApiResponse::bad_params())?;
    if body.url.trim().is_empty() {
        return Err(ApiResponse::fail("URL不能为空"));
    }

    let task = service.submit_url(&body.url, body.format).await?;
    Ok(ApiResponse::ok_with(
        "创建下载任务成功",
        json!({ "task_id": task.id, "title": task.title }),
    ))
}

pub async fn get_task_list(State(service): State<Arc<TaskService>>, Query(params): Params) -> Reply {
    let page = param(&params, "page").unwrap_or(0);
    let page_size = param(&params, "pageSize").unwrap_or(DEFAULT_PAGE_SIZE);
    let tasks = service.list_tasks(page, page_size).await?;
    Ok(ApiResponse::ok_with("获取成功", tasks))
}

pub async fn get_active_task(State(service): State<Arc<TaskService>>) -> ApiResponse {
    ApiResponse::ok_with("获取成功", service.list_active())
}

pub async fn get_task_status(
    State(service): State<Arc<TaskService>>,
    Query(params): Params,
) -> Reply {
    let id: i64 = param(&params, "task_id").ok_or_else(|| ApiResponse::fail("task_id格式错误"))?;
    let task = service.get_status(id).await?;

    let mut data = json!({
        "task_id": task.id,
        "status": task.status,
        "title": task.title,
    });
    match task.status {
        TaskStatus::Done => {
            data["download_url"] = json!(format!("/api/downloadVideo?task_id={}", task.id));
        }
        TaskStatus::Error => data["error"] = json!("下载失败"),
        _ => {}
    }
    Ok(ApiResponse::ok_with("获取任务状态成功", data))
}

pub async fn delete_task(State(service): State<Arc<TaskService>>, Query(params): Params) -> Reply {
    let id: i64 = param(&params, "id").ok_or_else(ApiResponse::bad_params)?;
    if service.remove(id).await? {
        Ok(ApiResponse::ok("删除成功"))
    } else {
        Ok(ApiResponse::ok(
            "数据库中没有该条记录，所以本次操作被忽略，可以算作成功。",
        ))
    }
}

/// 按任务 ID 下载已完成的成品文件
pub async fn download_video(
    State(service): State<Arc<TaskService>>,
    Query(params): Params,
    request: Request,
) -> Result<Response, ApiResponse> {
    let id: i64 = param(&params, "task_id").ok_or_else(|| ApiResponse::fail("task_id格式错误"))?;
    let task = service.get_status(id).await?;
    if task.status != TaskStatus::Done {
        return Err(ApiResponse::fail("任务尚未完成"));
    }

    let path = task.file_path();
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(ApiResponse::fail("文件不存在"));
    }

    let mut response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };
    let disposition = format!("attachment; filename=\"{}.{}\"", task.title, OUTPUT_EXTENSION);
    if let Ok(value) = HeaderValue::from_bytes(disposition.as_bytes()) {
        response.headers_mut().insert(CONTENT_DISPOSITION, value);
    }
    Ok(response)
}
