use crate::models::AppData;
use crate::questionnaire::Instrument;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub instrument: Arc<Instrument>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, instrument: Instrument) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            instrument: Arc::new(instrument),
        }
    }
}
