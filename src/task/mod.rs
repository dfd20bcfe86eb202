pub mod assembler;
pub mod models;
pub mod planner;
pub mod sanitize;
pub mod service;
pub mod validate;

pub use models::{BatchItem, Task, TaskCandidate, TaskStatus};
pub use service::TaskService;
