pub mod api {
    pub mod api_trait;
    pub mod client;
    pub mod error;
    pub mod models;
}

pub mod models;
