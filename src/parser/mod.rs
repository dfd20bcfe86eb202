pub mod resolver;
pub mod season;
pub mod stream_selector;
pub mod url_parser;

pub use resolver::{ResolvedMedia, resolve_media};
pub use season::infer_series_title;
pub use url_parser::{ContentRef, LinkType, resolve_link};
