use std::cell::RefCell;
use std::rc::Rc;

use pacetracker_core::{
    Announcement, DisplaySink, HostKind, LifecycleEvent, LocationRequest, LocationSample,
    LocationSource, ManualClock, MemorySpeechSink, PaceError, Priority, SpeechSink,
    TrackerConfig, TrackingSession,
};

const T0: i64 = 1_700_000_000_000;

#[derive(Default)]
struct SourceLog {
    permission: bool,
    requests: Vec<LocationRequest>,
    removed: usize,
}

struct FakeSource(Rc<RefCell<SourceLog>>);

impl LocationSource for FakeSource {
    fn has_permission(&self) -> bool {
        self.0.borrow().permission
    }
    fn request_updates(&mut self, request: &LocationRequest) -> pacetracker_core::Result<()> {
        self.0.borrow_mut().requests.push(*request);
        Ok(())
    }
    fn remove_updates(&mut self) {
        self.0.borrow_mut().removed += 1;
    }
}

struct FakeDisplay(Rc<RefCell<Vec<String>>>);

impl DisplaySink for FakeDisplay {
    fn show(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

struct SharedSpeech(Rc<RefCell<MemorySpeechSink>>);

impl SpeechSink for SharedSpeech {
    fn speak(&mut self, announcement: &Announcement) {
        self.0.borrow_mut().speak(announcement);
    }
    fn stop(&mut self) {
        self.0.borrow_mut().stop();
    }
    fn shutdown(&mut self) {
        self.0.borrow_mut().shutdown();
    }
}

fn running_fix(i: i64) -> LocationSample {
    LocationSample::new(59.9139 + i as f64 * 2.7e-5, 10.7522, T0 + i * 1_000, 5.0).with_speed(3.0)
}

fn source(permission: bool) -> (Rc<RefCell<SourceLog>>, Box<FakeSource>) {
    let log = Rc::new(RefCell::new(SourceLog {
        permission,
        ..SourceLog::default()
    }));
    (log.clone(), Box::new(FakeSource(log)))
}

#[test]
fn test_missing_permission_is_surfaced_and_nothing_starts() {
    let (log, src) = source(false);
    let shown = Rc::new(RefCell::new(Vec::new()));
    let mut session = TrackingSession::foreground(
        TrackerConfig::default(),
        src,
        Box::new(FakeDisplay(shown.clone())),
    )
    .unwrap();

    let err = session.start().unwrap_err();
    assert!(matches!(err, PaceError::MissingPermission));
    assert!(!session.is_running());
    assert!(log.borrow().requests.is_empty());

    // ingen input mens vi ikke kjører
    assert!(session.on_location(&running_fix(0)).is_none());
    assert!(shown.borrow().is_empty());

    // verten får tillatelse og melder fra
    log.borrow_mut().permission = true;
    session.handle(LifecycleEvent::PermissionGranted).unwrap();
    assert!(session.is_running());
    let requests = log.borrow().requests.clone();
    assert_eq!(
        requests,
        vec![LocationRequest {
            interval_ms: 1_000,
            priority: Priority::HighAccuracy
        }]
    );
}

#[test]
fn test_foreground_session_updates_display() {
    let (_log, src) = source(true);
    let shown = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(ManualClock::new(T0));
    let mut session = TrackingSession::foreground(
        TrackerConfig::default(),
        src,
        Box::new(FakeDisplay(shown.clone())),
    )
    .unwrap()
    .with_clock(Box::new(clock.clone()));

    assert_eq!(session.kind(), HostKind::Foreground);
    assert!(session.notification().is_none());
    session.start().unwrap();

    for i in 0..3 {
        clock.set(T0 + i * 1_000);
        session.on_location(&running_fix(i));
    }
    let shown = shown.borrow();
    assert_eq!(shown.len(), 3);
    // 3 m/s = 10.8 km/t => 5:33 min/km
    assert_eq!(shown[2], "Speed: 10.80 km/h\nPace: 5:33 min/km");
}

#[test]
fn test_background_session_announces_once_per_minute() {
    let (_log, src) = source(true);
    let speech = Rc::new(RefCell::new(MemorySpeechSink::default()));
    let clock = Rc::new(ManualClock::new(T0));
    let mut session = TrackingSession::background(
        TrackerConfig::default(),
        src,
        Box::new(SharedSpeech(speech.clone())),
    )
    .unwrap()
    .with_clock(Box::new(clock.clone()));

    let note = session.notification().unwrap();
    assert_eq!(note.channel_id, "pace_tracker_channel");
    assert_eq!(note.text, "Tracking pace...");

    session.start().unwrap();

    session.on_location(&running_fix(0));
    assert_eq!(speech.borrow().history().len(), 1);
    assert_eq!(
        speech.borrow().history()[0].text,
        "Your current pace is 5:33 min/km"
    );

    clock.advance(30_000);
    session.on_location(&running_fix(30));
    assert_eq!(speech.borrow().history().len(), 1);

    clock.set(T0 + 61_000);
    session.on_location(&running_fix(61));
    assert_eq!(speech.borrow().history().len(), 2);
    // ny forespørsel erstatter den som ikke var ferdig
    assert_eq!(speech.borrow().flushed(), 1);

    let metrics = session.metrics().encode_text().unwrap();
    assert!(metrics.contains("pacetracker_announcements_total 2"), "{metrics}");
    assert!(metrics.contains("pacetracker_samples_accepted_total 3"), "{metrics}");
}

#[test]
fn test_rejected_fix_counts_but_is_silent() {
    let (_log, src) = source(true);
    let shown = Rc::new(RefCell::new(Vec::new()));
    let mut session = TrackingSession::foreground(
        TrackerConfig::default(),
        src,
        Box::new(FakeDisplay(shown.clone())),
    )
    .unwrap()
    .with_clock(Box::new(ManualClock::new(T0)));
    session.start().unwrap();

    let mut bad = running_fix(0);
    bad.accuracy_m = 42.0;
    assert!(session.on_location(&bad).is_none());
    assert!(shown.borrow().is_empty());

    let metrics = session.metrics().encode_text().unwrap();
    assert!(metrics.contains("pacetracker_samples_rejected_total 1"), "{metrics}");
}

#[test]
fn test_stop_discards_state_and_restart_is_fresh() {
    let (log, src) = source(true);
    let speech = Rc::new(RefCell::new(MemorySpeechSink::default()));
    let clock = Rc::new(ManualClock::new(T0));
    let mut session = TrackingSession::background(
        TrackerConfig::default(),
        src,
        Box::new(SharedSpeech(speech.clone())),
    )
    .unwrap()
    .with_clock(Box::new(clock.clone()));

    session.start().unwrap();
    session.on_location(&running_fix(0));
    assert!(session.latest().is_some());

    session.stop();
    assert!(!session.is_running());
    assert!(session.latest().is_none());
    assert_eq!(log.borrow().removed, 1);
    assert!(speech.borrow().pending().is_none());

    // ny økt: nedkjølingen starter også på nytt
    clock.advance(5_000);
    session.start().unwrap();
    session.on_location(&running_fix(5));
    assert_eq!(speech.borrow().history().len(), 2);
}

#[test]
fn test_task_removed_shuts_speech_down() {
    let (log, src) = source(true);
    let speech = Rc::new(RefCell::new(MemorySpeechSink::default()));
    let mut session = TrackingSession::background(
        TrackerConfig::default(),
        src,
        Box::new(SharedSpeech(speech.clone())),
    )
    .unwrap()
    .with_clock(Box::new(ManualClock::new(T0)));

    session.start().unwrap();
    session.handle(LifecycleEvent::TaskRemoved).unwrap();
    assert!(!session.is_running());
    assert!(speech.borrow().is_shut_down());
    assert_eq!(log.borrow().removed, 1);

    // Destroyed etterpå er ufarlig
    session.handle(LifecycleEvent::Destroyed).unwrap();
    assert_eq!(log.borrow().removed, 1);
}

#[test]
fn test_speech_disabled_in_config() {
    let (_log, src) = source(true);
    let speech = Rc::new(RefCell::new(MemorySpeechSink::default()));
    let mut cfg = TrackerConfig::default();
    cfg.speech.enabled = false;
    let mut session = TrackingSession::background(cfg, src, Box::new(SharedSpeech(speech.clone())))
        .unwrap()
        .with_clock(Box::new(ManualClock::new(T0)));
    session.start().unwrap();
    session.on_location(&running_fix(0));
    assert!(speech.borrow().history().is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_log, src) = source(true);
    let cfg = TrackerConfig {
        smoothing_alpha: 0.0,
        ..TrackerConfig::default()
    };
    let err = TrackingSession::new(HostKind::Foreground, cfg, src).err().unwrap();
    assert!(matches!(err, PaceError::InvalidConfig(_)));
}

#[test]
fn test_location_priority_comes_from_config() {
    let (log, src) = source(true);
    let mut cfg = TrackerConfig::default();
    cfg.location_priority = Priority::Balanced;
    cfg.update_interval_ms = 2_000;
    let mut session = TrackingSession::new(HostKind::Foreground, cfg, src).unwrap();
    session.start().unwrap();
    assert_eq!(
        log.borrow().requests,
        vec![LocationRequest {
            interval_ms: 2_000,
            priority: Priority::Balanced
        }]
    );
}
