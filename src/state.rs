use std::sync::Arc;
use crate::external::reference_data::ReferenceDataProvider;
use crate::services::llm_service::LlmService;

#[derive(Clone)]
pub struct AppState {
    pub llm_service: Arc<LlmService>,
    pub reference_data: Arc<dyn ReferenceDataProvider>,
}
