use crate::bridge::NativeBridge;
use crate::recording::Recording;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Duration and size of a recording.
///
/// `size_megabytes` is already in megabytes when it leaves the bridge; no
/// conversion happens here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub duration_seconds: f64,
    pub size_megabytes: f64,
}

impl Metadata {
    /// `m:ss`, e.g. `1:05`.
    pub fn duration_label(&self) -> String {
        let total = if self.duration_seconds.is_finite() && self.duration_seconds > 0.0 {
            self.duration_seconds
        } else {
            0.0
        };
        let minutes = (total / 60.0).floor() as u64;
        let seconds = (total % 60.0).floor() as u64;
        format!("{minutes}:{seconds:02}")
    }

    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size_megabytes)
    }
}

/// One-shot metadata lookup for a thumbnail.
pub struct MetadataFetcher {
    bridge: Arc<dyn NativeBridge>,
}

impl MetadataFetcher {
    pub fn new(bridge: Arc<dyn NativeBridge>) -> Self {
        Self { bridge }
    }

    /// `None` when the bridge failed; the failure is logged, never surfaced.
    pub async fn fetch(&self, recording: &Recording) -> Option<Metadata> {
        match self.bridge.get_video_metadata(recording.path()).await {
            Ok((duration_seconds, size_megabytes)) => {
                tracing::debug!(
                    recording = recording.path(),
                    duration = duration_seconds,
                    size = size_megabytes,
                    "metadata loaded"
                );
                Some(Metadata {
                    duration_seconds,
                    size_megabytes,
                })
            }
            Err(err) => {
                tracing::error!(recording = recording.path(), "failed to get metadata: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_displays_zero() {
        let metadata = Metadata::default();
        assert_eq!(metadata.duration_label(), "0:00");
        assert_eq!(metadata.size_label(), "0.00 MB");
    }

    #[test]
    fn labels_floor_and_pad() {
        let metadata = Metadata {
            duration_seconds: 125.9,
            size_megabytes: 3.456,
        };
        assert_eq!(metadata.duration_label(), "2:05");
        assert_eq!(metadata.size_label(), "3.46 MB");
    }

    #[test]
    fn long_recordings_keep_counting_minutes() {
        let metadata = Metadata {
            duration_seconds: 3671.0,
            size_megabytes: 0.0,
        };
        assert_eq!(metadata.duration_label(), "61:11");
    }
}
