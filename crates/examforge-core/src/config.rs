//! Exam configuration loading.
//!
//! An exam config file couples presentation settings (title, time limit,
//! labels) with the [`SelectionConfig`] the engine consumes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::SelectionConfig;

/// Top-level exam configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Presentation settings.
    #[serde(default)]
    pub exam: ExamSettings,
    /// What to select and how.
    pub selection: SelectionConfig,
}

/// Presentation-side settings; consumed by renderers, not by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_time_limit")]
    pub time_limit_minutes: u32,
    /// Emit an answer key alongside each variant.
    #[serde(default)]
    pub include_answers: bool,
    /// Render options in the per-variant shuffled order instead of bank
    /// order.
    #[serde(default)]
    pub shuffle_options: bool,
    /// Show `[difficulty]` labels next to questions.
    #[serde(default)]
    pub include_difficulty_label: bool,
    /// Show `[category]` labels next to questions.
    #[serde(default)]
    pub include_category_label: bool,
}

fn default_title() -> String {
    "Exam".to_string()
}

fn default_time_limit() -> u32 {
    60
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: String::new(),
            time_limit_minutes: default_time_limit(),
            include_answers: false,
            shuffle_options: false,
            include_difficulty_label: false,
            include_category_label: false,
        }
    }
}

/// Load an exam config from a TOML file.
pub fn load_config(path: &Path) -> Result<ExamConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: ExamConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    Ok(config)
}
