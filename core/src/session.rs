//! Sporingsøkt: limet mellom posisjonskilde, estimator og sinkene (UI/tale).
//!
//! Kjernen (`PaceEstimator`) vet ingenting om livssyklus. Økten eier én
//! estimator, oppretter den ved start og kaster den ved stopp.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::announcer::{AnnouncementScheduler, LogSpeechSink, SpeechSink};
use crate::clock::{Clock, SystemClock};
use crate::error::{PaceError, Result};
use crate::estimator::PaceEstimator;
use crate::metrics::{
    announcements_total, samples_accepted_total, samples_rejected_total, speed_kmh, Metrics,
};
use crate::models::{NotificationConfig, Priority, TrackerConfig};
use crate::types::{LocationSample, PaceResult};

/// Hvem som er vert for økten. Hver vert har sin egen, uavhengige estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostKind {
    /// Skjermen: viser fart og tempo.
    Foreground,
    /// Bakgrunnstjenesten: leser opp tempo.
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub interval_ms: u64,
    pub priority: Priority,
}

impl LocationRequest {
    pub fn from_config(cfg: &TrackerConfig) -> Self {
        Self {
            interval_ms: cfg.update_interval_ms,
            priority: cfg.location_priority,
        }
    }
}

/// Plattformens posisjonstjeneste.
pub trait LocationSource {
    fn has_permission(&self) -> bool;
    fn request_updates(&mut self, request: &LocationRequest) -> Result<()>;
    fn remove_updates(&mut self);
}

/// Der UI-teksten havner.
pub trait DisplaySink {
    fn show(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    PermissionGranted,
    /// Appen ble sveipet bort.
    TaskRemoved,
    Destroyed,
}

struct Tracking {
    estimator: PaceEstimator,
    scheduler: AnnouncementScheduler,
}

pub struct TrackingSession {
    kind: HostKind,
    config: TrackerConfig,
    source: Box<dyn LocationSource>,
    clock: Box<dyn Clock>,
    display: Option<Box<dyn DisplaySink>>,
    speech: Option<Box<dyn SpeechSink>>,
    metrics: Metrics,
    tracking: Option<Tracking>,
}

impl TrackingSession {
    pub fn new(kind: HostKind, config: TrackerConfig, source: Box<dyn LocationSource>) -> Result<Self> {
        config.validate()?;
        let speech: Option<Box<dyn SpeechSink>> =
            if kind == HostKind::Background && config.speech.enabled {
                Some(Box::new(LogSpeechSink::new(config.speech.clone())))
            } else {
                None
            };
        Ok(Self {
            kind,
            config,
            source,
            clock: Box::new(SystemClock),
            display: None,
            speech,
            metrics: Metrics::new()?,
            tracking: None,
        })
    }

    /// Skjerm-økt som skriver til `display`.
    pub fn foreground(
        config: TrackerConfig,
        source: Box<dyn LocationSource>,
        display: Box<dyn DisplaySink>,
    ) -> Result<Self> {
        Ok(Self::new(HostKind::Foreground, config, source)?.with_display(display))
    }

    /// Bakgrunns-økt som leser opp via `speech`.
    pub fn background(
        config: TrackerConfig,
        source: Box<dyn LocationSource>,
        speech: Box<dyn SpeechSink>,
    ) -> Result<Self> {
        Ok(Self::new(HostKind::Background, config, source)?.with_speech(speech))
    }

    pub fn with_display(mut self, display: Box<dyn DisplaySink>) -> Self {
        self.display = Some(display);
        self
    }

    /// Ignoreres når tale er slått av i konfigurasjonen.
    pub fn with_speech(mut self, speech: Box<dyn SpeechSink>) -> Self {
        if self.config.speech.enabled {
            self.speech = Some(speech);
        }
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn kind(&self) -> HostKind {
        self.kind
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn is_running(&self) -> bool {
        self.tracking.is_some()
    }

    /// Varselet en bakgrunnsvert må vise for å holde prosessen i live.
    pub fn notification(&self) -> Option<&NotificationConfig> {
        match self.kind {
            HostKind::Background => Some(&self.config.notification),
            HostKind::Foreground => None,
        }
    }

    pub fn latest(&self) -> Option<&PaceResult> {
        self.tracking.as_ref().and_then(|t| t.estimator.latest())
    }

    /// Starter posisjonsoppdateringer med fersk tilstand.
    ///
    /// Uten tillatelse: `MissingPermission`, økten forblir inaktiv og vi prøver
    /// ikke igjen av oss selv. Verten må be om tillatelse og kalle `start` på nytt.
    pub fn start(&mut self) -> Result<()> {
        if self.tracking.is_some() {
            return Ok(());
        }
        if !self.source.has_permission() {
            warn!("{:?} session: fine location permission missing, not starting", self.kind);
            return Err(PaceError::MissingPermission);
        }

        let request = LocationRequest::from_config(&self.config);
        self.source.request_updates(&request)?;

        self.tracking = Some(Tracking {
            estimator: PaceEstimator::new(&self.config),
            scheduler: AnnouncementScheduler::new(self.config.announce_interval_ms),
        });
        info!(
            "{:?} session started (interval {} ms, {:?})",
            self.kind, request.interval_ms, request.priority
        );
        Ok(())
    }

    /// Ett posisjons-event fra kilden. Kjøres ferdig før neste event.
    pub fn on_location(&mut self, sample: &LocationSample) -> Option<PaceResult> {
        let tracking = self.tracking.as_mut()?;
        let now_ms = self.clock.now_ms();

        let Some(result) = tracking.estimator.on_sample(sample, now_ms) else {
            samples_rejected_total(&self.metrics).inc();
            return None;
        };
        samples_accepted_total(&self.metrics).inc();
        speed_kmh(&self.metrics).set(result.speed_kmh);

        if let Some(display) = self.display.as_mut() {
            display.show(&result.display_text());
        }

        if let Some(speech) = self.speech.as_mut() {
            if let Some(announcement) = tracking.scheduler.poll(now_ms, &result.pace) {
                info!("announcing: {}", announcement.text);
                speech.speak(&announcement);
                announcements_total(&self.metrics).inc();
            }
        }

        Some(result)
    }

    /// Stopper oppdateringer og kaster all tilstand.
    pub fn stop(&mut self) {
        if self.tracking.take().is_none() {
            return;
        }
        self.source.remove_updates();
        if let Some(speech) = self.speech.as_mut() {
            speech.stop();
        }
        info!("{:?} session stopped", self.kind);
    }

    /// Som `stop`, men frigjør også talemotoren. Økten kan startes igjen, uten tale.
    pub fn shutdown(&mut self) {
        self.stop();
        if let Some(mut speech) = self.speech.take() {
            speech.shutdown();
        }
    }

    pub fn handle(&mut self, event: LifecycleEvent) -> Result<()> {
        match event {
            LifecycleEvent::PermissionGranted => self.start(),
            LifecycleEvent::TaskRemoved | LifecycleEvent::Destroyed => {
                self.shutdown();
                Ok(())
            }
        }
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
