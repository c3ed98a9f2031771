use crate::bridge::FileFilter;
use crate::render_config::RenderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// How long a finished copy/save shows its success state.
    pub success_display_ms: u64,
    pub export_filter: FileFilter,
    pub render: RenderConfig,
    pub copy_failed_message: String,
    pub save_failed_message: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            success_display_ms: 2000,
            export_filter: FileFilter::default(),
            render: RenderConfig::default(),
            copy_failed_message: "Failed to copy to clipboard".to_string(),
            save_failed_message: "Failed to save recording".to_string(),
        }
    }
}

impl PanelConfig {
    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("so.cap.recordings-shelf").join("panel.json"))
}

pub fn load() -> PanelConfig {
    match config_path() {
        Some(path) => load_from(&path),
        None => PanelConfig::default(),
    }
}

pub fn load_from(path: &Path) -> PanelConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), "ignoring corrupt panel config: {err}");
            PanelConfig::default()
        }),
        Err(_) => PanelConfig::default(),
    }
}

pub fn save(config: &PanelConfig) -> Result<(), String> {
    let path = config_path().ok_or("config dir not found")?;
    save_to(config, &path)
}

pub fn save_to(config: &PanelConfig, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())
}
