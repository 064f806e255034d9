use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};

use crate::error::Result;

/// Tellere for én sporingsøkt, i eget register.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    samples_accepted: IntCounter,
    samples_rejected: IntCounter,
    announcements: IntCounter,
    speed_kmh: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new_custom(Some("pacetracker".into()), None)?;

        let samples_accepted =
            IntCounter::new("samples_accepted_total", "Location fixes fed to the estimator")?;
        let samples_rejected = IntCounter::new(
            "samples_rejected_total",
            "Location fixes dropped for poor accuracy",
        )?;
        let announcements =
            IntCounter::new("announcements_total", "Pace announcements sent to speech")?;
        let speed_kmh = Gauge::new("speed_kmh", "Latest smoothed speed in km/h")?;

        registry.register(Box::new(samples_accepted.clone()))?;
        registry.register(Box::new(samples_rejected.clone()))?;
        registry.register(Box::new(announcements.clone()))?;
        registry.register(Box::new(speed_kmh.clone()))?;

        Ok(Self {
            registry,
            samples_accepted,
            samples_rejected,
            announcements,
            speed_kmh,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus tekstformat.
    pub fn encode_text(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("samples_accepted", &self.samples_accepted.get())
            .field("samples_rejected", &self.samples_rejected.get())
            .field("announcements", &self.announcements.get())
            .field("speed_kmh", &self.speed_kmh.get())
            .finish()
    }
}

pub fn samples_accepted_total(metrics: &Metrics) -> &IntCounter {
    &metrics.samples_accepted
}

pub fn samples_rejected_total(metrics: &Metrics) -> &IntCounter {
    &metrics.samples_rejected
}

pub fn announcements_total(metrics: &Metrics) -> &IntCounter {
    &metrics.announcements
}

pub fn speed_kmh(metrics: &Metrics) -> &Gauge {
    &metrics.speed_kmh
}
