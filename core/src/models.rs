use serde::{Deserialize, Serialize};

use crate::error::{PaceError, Result};

pub const MAX_ACCURACY_M: f32 = 20.0;      // meter
pub const WINDOW_MS: i64 = 5_000;          // 5 s glidende vindu
pub const SMOOTHING_ALPHA: f64 = 0.25;     // høyere = raskere, lavere = roligere
pub const MIN_SPEED_KMH: f64 = 0.5;        // under dette står vi stille
pub const MAX_PACE_MIN_PER_KM: f64 = 20.0; // tregere enn dette vises ikke
pub const ANNOUNCE_INTERVAL_MS: i64 = 60_000;
pub const UPDATE_INTERVAL_MS: u64 = 1_000;

/// Innstillinger for én sporingsøkt. Manglende felt i JSON gir standardverdier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub max_accuracy_m: f32,
    pub window_ms: i64,
    pub smoothing_alpha: f64,
    pub min_speed_kmh: f64,
    pub max_pace_min_per_km: f64,
    pub announce_interval_ms: i64,
    pub update_interval_ms: u64,
    pub location_priority: Priority,
    pub speech: SpeechConfig,
    pub notification: NotificationConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_accuracy_m: MAX_ACCURACY_M,
            window_ms: WINDOW_MS,
            smoothing_alpha: SMOOTHING_ALPHA,
            min_speed_kmh: MIN_SPEED_KMH,
            max_pace_min_per_km: MAX_PACE_MIN_PER_KM,
            announce_interval_ms: ANNOUNCE_INTERVAL_MS,
            update_interval_ms: UPDATE_INTERVAL_MS,
            location_priority: Priority::HighAccuracy,
            speech: SpeechConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_accuracy_m.is_finite() && self.max_accuracy_m > 0.0) {
            return Err(PaceError::InvalidConfig(format!(
                "max_accuracy_m must be > 0, got {}",
                self.max_accuracy_m
            )));
        }
        if self.window_ms <= 0 {
            return Err(PaceError::InvalidConfig(format!(
                "window_ms must be > 0, got {}",
                self.window_ms
            )));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(PaceError::InvalidConfig(format!(
                "smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        if !(self.min_speed_kmh.is_finite() && self.min_speed_kmh >= 0.0) {
            return Err(PaceError::InvalidConfig(format!(
                "min_speed_kmh must be >= 0, got {}",
                self.min_speed_kmh
            )));
        }
        if !(self.max_pace_min_per_km.is_finite() && self.max_pace_min_per_km > 0.0) {
            return Err(PaceError::InvalidConfig(format!(
                "max_pace_min_per_km must be > 0, got {}",
                self.max_pace_min_per_km
            )));
        }
        if self.announce_interval_ms < 0 {
            return Err(PaceError::InvalidConfig(format!(
                "announce_interval_ms must be >= 0, got {}",
                self.announce_interval_ms
            )));
        }
        if self.update_interval_ms == 0 {
            return Err(PaceError::InvalidConfig(
                "update_interval_ms must be > 0".into(),
            ));
        }
        if self.speech.locale.trim().is_empty() {
            return Err(PaceError::InvalidConfig("speech.locale is empty".into()));
        }
        Ok(())
    }
}

/// Hvor hardt posisjonstjenesten skal jobbe. Løping trenger `HighAccuracy`;
/// de andre sparer batteri på bekostning av flere dårlige fixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    HighAccuracy,
    Balanced,
    LowPower,
}

/// Talesyntese-oppsett. Hører til sinken, ikke til estimatoren.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub locale: String, // BCP 47, f.eks. "en-GB"
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            locale: "en-GB".to_string(),
        }
    }
}

/// Varselet bakgrunnstjenesten viser mens den kjører.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub channel_id: String,
    pub channel_name: String,
    pub title: String,
    pub text: String,
    pub notification_id: i32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel_id: "pace_tracker_channel".to_string(),
            channel_name: "Pace Tracker".to_string(),
            title: "Pace Tracker".to_string(),
            text: "Tracking pace...".to_string(),
            notification_id: 1,
        }
    }
}
