use crate::errors::AppError;
use crate::models::{AppData, SCHEMA_VERSION};
use crate::questionnaire::{Instrument, InstrumentError, Question};
use std::{
    env,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} has schema version {found}, expected {expected}", path.display())]
    SchemaVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("invalid instrument in {}: {source}", path.display())]
    InvalidInstrument {
        path: PathBuf,
        source: InstrumentError,
    },
}

pub fn resolve_data_path() -> PathBuf {
    env::var("APP_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/state.json"))
}

pub fn resolve_instrument_path() -> Option<PathBuf> {
    env::var("INSTRUMENT_PATH").ok().map(PathBuf::from)
}

pub async fn load_data(path: &Path) -> Result<AppData, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no data file at {}, starting empty", path.display());
            return Ok(AppData::default());
        }
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let data: AppData = serde_json::from_slice(&bytes).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    if data.schema_version != SCHEMA_VERSION {
        return Err(StorageError::SchemaVersion {
            path: path.to_path_buf(),
            found: data.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    Ok(data)
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

pub async fn load_instrument(path: Option<&Path>) -> Result<Instrument, StorageError> {
    let Some(path) = path else {
        return Ok(Instrument::canonical());
    };

    let bytes = fs::read(path).await.map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let questions: Vec<Question> =
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    let instrument = Instrument::new(questions).map_err(|source| StorageError::InvalidInstrument {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "loaded instrument from {} ({} questions)",
        path.display(),
        instrument.questions().len()
    );
    Ok(instrument)
}
