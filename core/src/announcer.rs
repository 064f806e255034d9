use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::models::{SpeechConfig, ANNOUNCE_INTERVAL_MS};

pub const UTTERANCE_ID: &str = "paceId";

/// Forespørsel til talesyntesen. Sinken skal flushe: ny ytring erstatter
/// den som ligger i kø, den køes ikke bak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub utterance_id: String,
    pub at_ms: i64,
}

impl Announcement {
    pub fn pace(pace_text: &str, at_ms: i64) -> Self {
        Self {
            text: format!("Your current pace is {pace_text}"),
            utterance_id: UTTERANCE_ID.to_string(),
            at_ms,
        }
    }
}

/// Maks én opplesning per intervall, målt fra forrige faktiske opplesning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementScheduler {
    interval_ms: i64,
    last_spoken_at_ms: Option<i64>,
}

impl Default for AnnouncementScheduler {
    fn default() -> Self {
        Self::new(ANNOUNCE_INTERVAL_MS)
    }
}

impl AnnouncementScheduler {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms,
            last_spoken_at_ms: None,
        }
    }

    /// Klar til å snakke? Ingen ekstern trigger, bare medgått tid.
    pub fn is_ready(&self, now_ms: i64) -> bool {
        match self.last_spoken_at_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.interval_ms,
        }
    }

    /// Gir en opplesning hvis nedkjølingen er over, og starter den på nytt.
    pub fn poll(&mut self, now_ms: i64, pace_text: &str) -> Option<Announcement> {
        if !self.is_ready(now_ms) {
            return None;
        }
        self.last_spoken_at_ms = Some(now_ms);
        Some(Announcement::pace(pace_text, now_ms))
    }

    pub fn last_spoken_at_ms(&self) -> Option<i64> {
        self.last_spoken_at_ms
    }

    pub fn reset(&mut self) {
        self.last_spoken_at_ms = None;
    }
}

/// Talesyntese-motoren sett fra kjernen: fire-and-forget.
pub trait SpeechSink {
    fn speak(&mut self, announcement: &Announcement);

    /// Avbryt det som leses opp nå.
    fn stop(&mut self) {}

    /// Frigjør motoren når økten avsluttes.
    fn shutdown(&mut self) {}
}

/// Sink som bare logger ytringen. Nyttig uten ekte TTS.
#[derive(Debug, Clone, Default)]
pub struct LogSpeechSink {
    pub config: SpeechConfig,
}

impl LogSpeechSink {
    pub fn new(config: SpeechConfig) -> Self {
        Self { config }
    }
}

impl SpeechSink for LogSpeechSink {
    fn speak(&mut self, announcement: &Announcement) {
        info!(
            "[tts {}] {} ({})",
            self.config.locale, announcement.text, announcement.utterance_id
        );
    }
}

/// Sink i minnet med flush-semantikk: ny ytring erstatter ventende.
#[derive(Debug, Clone, Default)]
pub struct MemorySpeechSink {
    pub config: SpeechConfig,
    pending: Option<Announcement>,
    history: Vec<Announcement>,
    flushed: usize,
    shut_down: bool,
}

impl MemorySpeechSink {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn pending(&self) -> Option<&Announcement> {
        self.pending.as_ref()
    }

    /// Motoren er ferdig med å lese opp.
    pub fn finish_pending(&mut self) -> Option<Announcement> {
        self.pending.take()
    }

    pub fn history(&self) -> &[Announcement] {
        &self.history
    }

    /// Antall ytringer som ble kastet før de var ferdig opplest.
    pub fn flushed(&self) -> usize {
        self.flushed
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl SpeechSink for MemorySpeechSink {
    fn speak(&mut self, announcement: &Announcement) {
        if self.shut_down {
            debug!("speech sink is shut down, ignoring '{}'", announcement.text);
            return;
        }
        if self.pending.replace(announcement.clone()).is_some() {
            self.flushed += 1;
        }
        self.history.push(announcement.clone());
    }

    fn stop(&mut self) {
        if self.pending.take().is_some() {
            self.flushed += 1;
        }
    }

    fn shutdown(&mut self) {
        self.stop();
        self.shut_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;

    #[test]
    fn first_poll_announces() {
        let mut s = AnnouncementScheduler::default();
        let a = s.poll(T0, "5:00 min/km").unwrap();
        assert_eq!(a.text, "Your current pace is 5:00 min/km");
        assert_eq!(a.utterance_id, "paceId");
        assert_eq!(s.last_spoken_at_ms(), Some(T0));
    }

    #[test]
    fn cooldown_is_strictly_greater_than_interval() {
        let mut s = AnnouncementScheduler::default();
        s.poll(T0, "5:00 min/km");
        assert!(s.poll(T0 + 60_000, "5:00 min/km").is_none());
        assert!(s.poll(T0 + 60_001, "5:01 min/km").is_some());
    }

    #[test]
    fn cooldown_measured_from_last_announcement() {
        let mut s = AnnouncementScheduler::default();
        s.poll(T0, "a");
        assert!(s.poll(T0 + 30_000, "b").is_none());
        assert!(s.poll(T0 + 61_000, "c").is_some());
        // ny klokke fra +61 s, ikke fast rutenett
        assert!(s.poll(T0 + 120_500, "d").is_none());
        assert!(s.poll(T0 + 121_001, "e").is_some());
    }

    #[test]
    fn memory_sink_flushes_pending() {
        let mut sink = MemorySpeechSink::default();
        sink.speak(&Announcement::pace("5:00 min/km", T0));
        sink.speak(&Announcement::pace("4:50 min/km", T0 + 61_000));
        assert_eq!(sink.flushed(), 1);
        assert_eq!(
            sink.pending().map(|a| a.text.as_str()),
            Some("Your current pace is 4:50 min/km")
        );
        assert_eq!(sink.history().len(), 2);

        sink.shutdown();
        assert!(sink.is_shut_down());
        assert!(sink.pending().is_none());
        sink.speak(&Announcement::pace("4:40 min/km", T0 + 122_000));
        assert_eq!(sink.history().len(), 2);
    }
}
