pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod mood;
pub mod questionnaire;
pub mod scoring;
pub mod state;
pub mod storage;
pub mod streak;

pub use app::router;
pub use state::AppState;
pub use storage::{load_data, load_instrument, resolve_data_path, resolve_instrument_path};
