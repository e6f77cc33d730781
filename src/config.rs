// src/config.rs
use crate::error::Result;
use crate::ewma::EwmaOptions;
use crate::kalman::KalmanParams;
use crate::normalizer::ShapePolicy;
use crate::smoother::FilterKind;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Everything needed to construct a smoother. Every field may be left out of
/// a JSON config file and falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    pub filter: FilterKind,
    pub ewma: EwmaOptions,
    pub kalman: KalmanParams,
    pub shape_policy: ShapePolicy,
}

impl SmootherConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks only the options of the selected filter.
    pub fn validate(&self) -> Result<()> {
        match self.filter {
            FilterKind::None => Ok(()),
            FilterKind::Ewma => self.ewma.validate(),
            FilterKind::Kalman => self.kalman.validate(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub output_directory: PathBuf,
    pub session_name: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            output_directory: directories::UserDirs::new()
                .and_then(|dirs| dirs.document_dir().map(|p| p.join("LandmarkSmoother")))
                .unwrap_or_else(|| PathBuf::from("./output")),
            session_name: default_session_name(),
        }
    }
}

pub fn default_session_name() -> String {
    format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
}
