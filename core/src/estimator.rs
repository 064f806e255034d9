use log::debug;

use crate::models::TrackerConfig;
use crate::pace::{format_pace, pace_min_per_km, trackable};
use crate::smoothing::SpeedSmoother;
use crate::types::{LocationSample, PaceResult};
use crate::window::WindowBuffer;

pub const MPS_TO_KMH: f64 = 3.6;

/// Gjør en strøm av posisjoner om til glattet fart og tempo-tekst.
///
/// Pipeline per sample: nøyaktighetsfilter → vindu → rå fart → EMA → km/t → tempo → tekst.
/// Én instans per sporingsøkt; tilstanden deles aldri.
#[derive(Debug, Clone)]
pub struct PaceEstimator {
    max_accuracy_m: f32,
    min_speed_kmh: f64,
    max_pace_min_per_km: f64,
    window: WindowBuffer,
    smoother: SpeedSmoother,
    latest: Option<PaceResult>,
}

impl Default for PaceEstimator {
    fn default() -> Self {
        Self::new(&TrackerConfig::default())
    }
}

impl PaceEstimator {
    pub fn new(cfg: &TrackerConfig) -> Self {
        Self {
            max_accuracy_m: cfg.max_accuracy_m,
            min_speed_kmh: cfg.min_speed_kmh,
            max_pace_min_per_km: cfg.max_pace_min_per_km,
            window: WindowBuffer::new(cfg.window_ms),
            smoother: SpeedSmoother::new(cfg.smoothing_alpha),
            latest: None,
        }
    }

    /// Mater inn ett sample mottatt ved `now_ms`.
    ///
    /// Returnerer `None` når samplet avvises (for dårlig nøyaktighet); da er
    /// ingenting endret. Ellers det nye resultatet.
    pub fn on_sample(&mut self, sample: &LocationSample, now_ms: i64) -> Option<PaceResult> {
        if !self.accepts(sample) {
            debug!(
                "dropping fix: accuracy={} m (limit {} m)",
                sample.accuracy_m, self.max_accuracy_m
            );
            return None;
        }

        self.window.push(*sample, now_ms);

        let raw_speed_mps = match sample.reported_speed_mps() {
            Some(v) => v,
            None => self.window.average_speed_mps(),
        };

        let smoothed_speed_mps = self.smoother.update(raw_speed_mps);
        let speed_kmh = smoothed_speed_mps * MPS_TO_KMH;
        let pace = pace_min_per_km(speed_kmh, self.min_speed_kmh);

        let result = PaceResult {
            speed_kmh,
            pace: format_pace(pace, self.max_pace_min_per_km),
            smoothed_speed_mps,
            raw_speed_mps,
            pace_min_per_km: trackable(pace, self.max_pace_min_per_km),
        };

        debug!(
            "raw={:.3} m/s smoothed={:.3} m/s window={} pace={}",
            raw_speed_mps,
            smoothed_speed_mps,
            self.window.len(),
            result.pace
        );

        self.latest = Some(result.clone());
        Some(result)
    }

    fn accepts(&self, sample: &LocationSample) -> bool {
        sample.accuracy_m.is_finite()
            && sample.accuracy_m <= self.max_accuracy_m
            && sample.has_finite_position()
    }

    pub fn latest(&self) -> Option<&PaceResult> {
        self.latest.as_ref()
    }

    /// Gjeldende tempo-tekst; plassholder før første aksepterte sample.
    pub fn pace_text(&self) -> &str {
        self.latest
            .as_ref()
            .map(|r| r.pace.as_str())
            .unwrap_or(crate::pace::PACE_PLACEHOLDER)
    }

    pub fn smoothed_speed_mps(&self) -> Option<f64> {
        self.smoother.value()
    }

    pub fn window(&self) -> &WindowBuffer {
        &self.window
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.smoother.reset();
        self.latest = None;
    }

    /// Spill av et opptak der enhetens tidsstempel brukes som mottakstid.
    /// Avviste samples gir ingen rad.
    pub fn replay<I>(&mut self, samples: I) -> Vec<PaceResult>
    where
        I: IntoIterator<Item = LocationSample>,
    {
        samples
            .into_iter()
            .filter_map(|s| self.on_sample(&s, s.timestamp_ms))
            .collect()
    }
}
