use crate::errors::AppError;
use crate::models::TrackerData;
use std::{env, path::Path, path::PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("HABIT_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/habits.json"))
}

/// A missing file is a fresh start; an unparseable one is fatal and left for
/// the operator to inspect rather than silently replaced.
pub async fn load_data(path: &Path) -> Result<TrackerData, LoadError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| LoadError::Corrupt {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(TrackerData::default()),
        Err(source) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes the full document next to the destination and renames it into
/// place, so an interrupted save never leaves a half-written store.
pub async fn persist_data(path: &Path, data: &TrackerData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &payload).await.map_err(AppError::internal)?;
    if let Err(err) = fs::rename(&tmp, path).await {
        error!("failed to replace data file: {err}");
        let _ = fs::remove_file(&tmp).await;
        return Err(AppError::internal(err));
    }
    Ok(())
}
