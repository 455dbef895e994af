use crate::api::ApiClient;
use crate::controller::DashboardController;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DashboardController<ApiClient>>,
}

impl AppState {
    pub fn new(controller: DashboardController<ApiClient>) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}
