//! HTTP 接口，只做参数解析和响应包装，业务都在 [`TaskService`] 里。

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::task::TaskService;

pub mod handlers;
pub mod response;

pub fn router(service: Arc<TaskService>) -> Router {
    let api = Router::new()
        .route("/createTask", post(handlers::create_task))
        .route("/downloadVideoByURL", post(handlers::download_by_url))
        .route("/getTaskList", get(handlers::get_task_list))
        .route("/getActiveTask", get(handlers::get_active_task))
        .route("/getTaskStatus", get(handlers::get_task_status))
        .route("/deleteTask", post(handlers::delete_task))
        .route("/downloadVideo", get(handlers::download_video));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(service)
}
