use crate::frame::Frame;
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultStoreError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Writes annotated frames as `{YYYYMMDD_HHMMSS}.png` under one directory.
///
/// Names have second resolution: a second save within the same second
/// replaces the first file.
#[derive(Debug, Clone)]
pub struct ResultStore {
    directory: PathBuf,
}

impl ResultStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn save(&self, image: &Frame) -> Result<PathBuf, ResultStoreError> {
        self.save_at(image, Local::now().naive_local())
    }

    pub fn save_at(
        &self,
        image: &Frame,
        timestamp: NaiveDateTime,
    ) -> Result<PathBuf, ResultStoreError> {
        std::fs::create_dir_all(&self.directory).map_err(|source| ResultStoreError::CreateDir {
            path: self.directory.clone(),
            source,
        })?;

        let path = self.directory.join(file_name(timestamp));
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|source| ResultStoreError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

pub fn file_name(timestamp: NaiveDateTime) -> String {
    format!("{}.png", timestamp.format("%Y%m%d_%H%M%S"))
}
