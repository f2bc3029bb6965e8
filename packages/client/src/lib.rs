pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod logs;
pub mod notice;
pub mod search;
pub mod session;
pub mod side_effect;
pub mod store;
pub mod upload;


pub use app::{App, View};
pub use backend::Services;
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpBackend;
pub use notice::Notice;
pub use session::{Session, SessionGate};
