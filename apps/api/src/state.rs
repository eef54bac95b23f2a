use std::sync::Arc;

use crate::config::Config;
use crate::design::generator::DesignGenerator;
use crate::llm_client::ChatModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every request gets its own generator handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable model backend. Default: OpenAiClient. Tests swap in a stub.
    pub llm: Arc<dyn ChatModel>,
}

impl AppState {
    pub fn design_generator(&self) -> DesignGenerator {
        DesignGenerator::new(self.llm.clone(), self.config.llm_timeout())
    }
}
