//! The single owner of dashboard state.
//!
//! The controller holds the stats cache, the selected range, the streaming
//! flag and the rendered view. The lock is only held to read or commit
//! state, never across a backend request, so overlapping streaming toggles
//! race and the response that resolves last wins.

use crate::api::DashboardBackend;
use crate::config::{Config, Panels};
use crate::errors::ApiError;
use crate::models::{
    DashboardSnapshot, DashboardView, DetectionStats, INTERACTION_ERROR, INTERACTION_MISSING,
    StatsDisplay, StreamButton, TIME_PASSED_MISSING,
};
use crate::stats::render_stats;
use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tracing::{error, info};

#[derive(Debug)]
struct DashboardState {
    detection_stats: DetectionStats,
    selected_range: String,
    is_streaming: bool,
    loaded_at: Option<DateTime<Local>>,
    view: DashboardView,
}

pub struct DashboardController<B> {
    backend: B,
    ranges: Vec<String>,
    panels: Panels,
    video_feed_url: String,
    state: Mutex<DashboardState>,
}

impl<B: DashboardBackend> DashboardController<B> {
    pub fn new(backend: B, config: &Config) -> Self {
        Self {
            backend,
            ranges: config.ranges.clone(),
            panels: config.panels,
            video_feed_url: config.video_feed_url(),
            state: Mutex::new(DashboardState {
                detection_stats: DetectionStats::default(),
                selected_range: config.default_range().to_string(),
                is_streaming: false,
                loaded_at: None,
                view: DashboardView::default(),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Page load: run both loaders concurrently and wait for both.
    /// The toggle-only layout fetches nothing.
    pub async fn load(&self) {
        if self.panels == Panels::ToggleOnly {
            return;
        }
        tokio::join!(self.load_stats(), self.load_interaction());
    }

    pub async fn load_stats(&self) {
        match self.backend.detection_stats().await {
            Ok(stats) => {
                info!("fetched detection stats: {stats:?}");
                let mut state = self.state.lock().await;
                state.detection_stats = stats;
                state.loaded_at = Some(Local::now());
                state.view.stats_display =
                    render_stats(&state.detection_stats, &state.selected_range);
            }
            Err(err) => {
                error!("error fetching detection stats: {err}");
                let mut state = self.state.lock().await;
                state.detection_stats = DetectionStats::default();
                state.view.stats_display = StatsDisplay::LoadFailed;
            }
        }
    }

    pub async fn load_interaction(&self) {
        let (last, passed) = match self.backend.interaction_time().await {
            Ok(info) => {
                info!("fetched interaction data: {info:?}");
                match info.display_pair() {
                    Some((time, passed)) => (time.to_string(), passed.to_string()),
                    None => (INTERACTION_MISSING.to_string(), TIME_PASSED_MISSING.to_string()),
                }
            }
            Err(err) => {
                error!("error fetching interaction time: {err}");
                (INTERACTION_ERROR.to_string(), INTERACTION_ERROR.to_string())
            }
        };

        let mut state = self.state.lock().await;
        state.view.last_interaction = last;
        state.view.time_since_last_interaction = passed;
    }

    /// Range selector change: store the selection and re-render the stats.
    pub async fn select_range(&self, range: &str) {
        let mut state = self.state.lock().await;
        state.selected_range = range.to_string();
        state.view.stats_display = render_stats(&state.detection_stats, range);
    }

    /// Flip the remote streaming flag. The local flag and button only change
    /// after the backend acknowledges; on failure nothing changes.
    pub async fn toggle_streaming(&self) -> Result<bool, ApiError> {
        let new_state = !self.state.lock().await.is_streaming;

        match self.backend.set_streaming_state(new_state).await {
            Ok(()) => {
                self.commit_streaming(new_state).await;
                Ok(new_state)
            }
            Err(err) => {
                error!("error updating streaming state: {err}");
                Err(err)
            }
        }
    }

    /// Adopt the backend's stored streaming flag, if it has one.
    pub async fn sync_streaming_state(&self) -> Result<Option<bool>, ApiError> {
        match self.backend.streaming_state().await {
            Ok(Some(streaming)) => {
                self.commit_streaming(streaming).await;
                Ok(Some(streaming))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                error!("error fetching streaming state: {err}");
                Err(err)
            }
        }
    }

    async fn commit_streaming(&self, streaming: bool) {
        let mut state = self.state.lock().await;
        state.is_streaming = streaming;
        state.view.stream_button = StreamButton::for_state(streaming);
    }

    pub async fn is_streaming(&self) -> bool {
        self.state.lock().await.is_streaming
    }

    pub async fn detection_stats(&self) -> DetectionStats {
        self.state.lock().await.detection_stats.clone()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let state = self.state.lock().await;
        DashboardSnapshot {
            selected_range: state.selected_range.clone(),
            ranges: self.ranges.clone(),
            is_streaming: state.is_streaming,
            panels: self.panels,
            loaded_at: state.loaded_at,
            video_feed_url: self.video_feed_url.clone(),
            view: state.view.clone(),
        }
    }
}
