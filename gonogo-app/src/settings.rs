use std::path::Path;

use anyhow::{Context, Result};
use gonogo_analysis::EvaluationParams;
use gonogo_experiment::{ExperimentConfig, InputDispatcher};
use serde::{Deserialize, Serialize};

use crate::subject::SubjectModel;

/// Everything the driver can be configured with. Each section is optional in
/// the JSON file and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub experiment: ExperimentConfig,
    pub evaluation: EvaluationParams,
    pub input: InputDispatcher,
    pub subject: SubjectModel,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse settings in {}", path.display()))
    }
}
