use serde::{Deserialize, Serialize};

/// Average distance at which the precision score bottoms out at zero.
pub const PRECISION_ZERO_DISTANCE: f64 = 2.5;
const PRECISION_PENALTY_PER_UNIT: f64 = 100.0 / PRECISION_ZERO_DISTANCE;

/// Metrics of the current or most recently stopped session. Field names on
/// the wire match the export record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    #[serde(rename = "time")]
    pub elapsed_seconds: f64,
    #[serde(rename = "path")]
    pub path_length: f64,
    pub errors: u32,
    pub collisions: u32,
    #[serde(rename = "precision")]
    pub precision_score: f64,
}

pub fn precision_score(average_distance: f64) -> f64 {
    (100.0 - PRECISION_PENALTY_PER_UNIT * average_distance).max(0.0)
}

/// Running mean of target distances since session start. Every sample
/// weighs the same.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistanceAverage {
    sum: f64,
    count: u64,
}

impl DistanceAverage {
    pub fn record(&mut self, distance: f64) -> f64 {
        self.sum += distance;
        self.count = self.count.saturating_add(1);
        self.mean()
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count.max(1) as f64
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// `mm:ss`, truncating fractional seconds.
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}
