use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const EDITOR_WIDTH: f64 = 1150.0;
const EDITOR_HEIGHT: f64 = 800.0;
const EDITOR_TITLE: &str = "Cap Editor";

/// A captured recording, identified by its project path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recording(String);

impl Recording {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Key used for the fake window and for removal bookkeeping.
    pub fn key(&self) -> &str {
        &self.0
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    pub fn screenshot_path(&self) -> PathBuf {
        PathBuf::from(&self.0).join("screenshots").join("display.jpg")
    }

    /// Last path segment up to its first '.'.
    pub fn stem(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        name.split('.').next().unwrap_or(name)
    }
}

/// Recordings in display order: most recently discovered first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingList {
    recordings: Vec<Recording>,
}

impl RecordingList {
    /// Builds the display list from paths in discovery order.
    pub fn from_discovery_order(paths: Vec<String>) -> Self {
        let recordings = paths.into_iter().rev().map(Recording::new).collect();
        Self { recordings }
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recording> {
        self.recordings.iter()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.recordings.iter().any(|r| r.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorWindow {
    pub label: String,
    pub title: String,
    pub url: String,
    pub width: f64,
    pub height: f64,
}

impl EditorWindow {
    pub fn for_recording(recording: &Recording) -> Self {
        Self {
            label: format!("editor-{}", recording.stem()),
            title: EDITOR_TITLE.to_string(),
            url: format!("/editor?path={}", recording.path()),
            width: EDITOR_WIDTH,
            height: EDITOR_HEIGHT,
        }
    }
}
