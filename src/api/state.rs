use std::sync::Arc;
use crate::assessment::Assessor;
use crate::config::AppConfig;
use crate::models::SampleRow;
use crate::reference::ReferenceTable;

/// Read-only inputs shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ReferenceTable>,
    pub dataset: Arc<Vec<SampleRow>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(table: ReferenceTable, dataset: Vec<SampleRow>, config: AppConfig) -> Self {
        Self {
            table: Arc::new(table),
            dataset: Arc::new(dataset),
            config,
        }
    }

    pub fn assessor(&self) -> Assessor<'_> {
        Assessor::new(&self.table, &self.dataset)
    }
}
