use serde::{Deserialize, Serialize};

/// Én posisjonsfix fra enheten (~1 Hz).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    #[serde(alias = "timestampMs", alias = "time")]
    pub timestamp_ms: i64,         // ms siden epoch
    #[serde(alias = "accuracyMeters", alias = "accuracy")]
    pub accuracy_m: f32,           // meter, større = dårligere
    #[serde(default, alias = "speedMps", alias = "speed")]
    pub speed_mps: Option<f32>,    // kun hvis enheten rapporterer fart
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: i64, accuracy_m: f32) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms,
            accuracy_m,
            speed_mps: None,
        }
    }

    pub fn with_speed(mut self, speed_mps: f32) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }

    /// Enhetsrapportert fart, men bare hvis den er brukbar (endelig og ikke negativ).
    pub fn reported_speed_mps(&self) -> Option<f64> {
        self.speed_mps
            .map(f64::from)
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    pub fn has_finite_position(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Siste beregnede fart og tempo. Overskrives for hvert akseptert sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceResult {
    pub speed_kmh: f64,
    pub pace: String,
    pub smoothed_speed_mps: f64,
    pub raw_speed_mps: f64,
    /// min/km, `None` når tempoet ikke kan spores ("--:--").
    pub pace_min_per_km: Option<f64>,
}

impl PaceResult {
    /// Teksten UI-et viser.
    pub fn display_text(&self) -> String {
        format!("Speed: {:.2} km/h\nPace: {}", self.speed_kmh, self.pace)
    }
}

impl std::fmt::Display for PaceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_text())
    }
}
