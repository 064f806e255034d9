//! Pace tracker core: GPS-fix → glattet fart → tempo-tekst → UI/tale.

pub mod announcer;
pub mod clock;
pub mod error;
pub mod estimator;
pub mod geo;
pub mod metrics;
pub mod models;
pub mod pace;
pub mod replay;
pub mod session;
pub mod smoothing;
pub mod storage;
pub mod types;
pub mod window;

#[cfg(feature = "python")]
mod py;

pub use announcer::{
    Announcement, AnnouncementScheduler, LogSpeechSink, MemorySpeechSink, SpeechSink,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PaceError, Result};
pub use estimator::PaceEstimator;
pub use models::{NotificationConfig, Priority, SpeechConfig, TrackerConfig};
pub use pace::PACE_PLACEHOLDER;
pub use replay::replay_track_json;
pub use session::{
    DisplaySink, HostKind, LifecycleEvent, LocationRequest, LocationSource, TrackingSession,
};
pub use storage::{load_config, parse_config, save_config};
pub use types::{LocationSample, PaceResult};
pub use window::WindowBuffer;
