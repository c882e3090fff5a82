use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{SessionMetrics, SessionSettings};

use super::atomic_io::write_text_atomic;

pub const EXPORT_FILE_PREFIX: &str = "surgical-metrics-";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize metrics export: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write metrics export to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The one-shot record handed to the operator when they export a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsExport {
    pub scenario: String,
    pub metrics: SessionMetrics,
    pub precision_setting: f32,
    pub speed_setting: f32,
    pub feedback_setting: f32,
    pub timestamp: String,
}

impl MetricsExport {
    pub fn new(
        scenario: impl Into<String>,
        metrics: SessionMetrics,
        settings: &SessionSettings,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            metrics,
            precision_setting: settings.precision_target,
            speed_setting: settings.arm_speed,
            feedback_setting: settings.feedback_intensity,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(ExportError::Serialize)
    }
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("{EXPORT_FILE_PREFIX}{}.json", now.timestamp_millis())
}

/// Serializes `export` into `dir` under a name derived from `now` and
/// returns the written path.
pub fn write_export(
    dir: &Path,
    export: &MetricsExport,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let json = export.to_pretty_json()?;
    let path = dir.join(export_file_name(now));
    write_text_atomic(&path, &json).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
