use crate::config::Panels;
use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const STATS_LOAD_FAILED: &str = "Failed to load stats";
pub const STATS_NO_DATA: &str = "No data available for this period.";
pub const INTERACTION_MISSING: &str = "No data";
pub const TIME_PASSED_MISSING: &str = "N/A";
pub const INTERACTION_ERROR: &str = "Error";

/// Detection outcome counts for one range label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RangeCounts {
    #[serde(rename = "true", default, deserialize_with = "null_as_zero")]
    pub true_count: u64,
    #[serde(rename = "false", default, deserialize_with = "null_as_zero")]
    pub false_count: u64,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Aggregate detection counts keyed by range label, exactly as the backend
/// sends them. A `null` entry is kept and reads as absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct DetectionStats(pub BTreeMap<String, Option<RangeCounts>>);

impl DetectionStats {
    pub fn get(&self, range: &str) -> Option<&RangeCounts> {
        self.0.get(range).and_then(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, RangeCounts)> for DetectionStats {
    fn from_iter<I: IntoIterator<Item = (String, RangeCounts)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(range, counts)| (range, Some(counts))).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct InteractionInfo {
    #[serde(default)]
    pub interaction_time: Option<String>,
    #[serde(default)]
    pub time_passed: Option<String>,
}

impl InteractionInfo {
    /// Both display strings, or `None` when either is missing or empty.
    pub fn display_pair(&self) -> Option<(&str, &str)> {
        let time = self.interaction_time.as_deref().filter(|s| !s.is_empty())?;
        let passed = self.time_passed.as_deref().filter(|s| !s.is_empty())?;
        Some((time, passed))
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct StatsSummary {
    pub true_count: u64,
    pub false_count: u64,
    pub false_percent: f64,
}

impl StatsSummary {
    pub fn false_percent_label(&self) -> String {
        format!("{:.2}", self.false_percent)
    }
}

/// Contents of the `stats-display` region.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatsDisplay {
    #[default]
    Pending,
    Summary(StatsSummary),
    NoData,
    LoadFailed,
}

impl StatsDisplay {
    /// Markup written into the display region.
    pub fn markup(&self) -> String {
        match self {
            Self::Pending => String::new(),
            Self::Summary(summary) => format!(
                "True detections: {} <br>\nFalse detections: {} <br>\nFalse detections %: {}%",
                summary.true_count,
                summary.false_count,
                summary.false_percent_label()
            ),
            Self::NoData => STATS_NO_DATA.to_string(),
            Self::LoadFailed => STATS_LOAD_FAILED.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StreamButton {
    pub label: &'static str,
    pub background: Option<&'static str>,
    pub color: Option<&'static str>,
}

impl StreamButton {
    pub fn for_state(streaming: bool) -> Self {
        if streaming {
            Self {
                label: "Stop Livestream",
                background: Some("red"),
                color: Some("white"),
            }
        } else {
            Self {
                label: "Start Livestream",
                background: None,
                color: None,
            }
        }
    }
}

impl Default for StreamButton {
    fn default() -> Self {
        Self::for_state(false)
    }
}

/// The rendered page regions.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct DashboardView {
    pub stats_display: StatsDisplay,
    pub last_interaction: String,
    pub time_since_last_interaction: String,
    pub stream_button: StreamButton,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub selected_range: String,
    pub ranges: Vec<String>,
    pub is_streaming: bool,
    pub panels: Panels,
    pub loaded_at: Option<DateTime<Local>>,
    pub video_feed_url: String,
    pub view: DashboardView,
}

#[derive(Debug, Deserialize)]
pub struct RangeRequest {
    pub range: String,
}
