use crate::config::AppConfig;
use crate::services::http::HttpTransport;

pub struct AppState {
    pub config: AppConfig,
    pub transport: Box<dyn HttpTransport>,
}
