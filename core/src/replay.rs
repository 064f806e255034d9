use serde::{Deserialize, Serialize};
use serde_path_to_error as spte;

use crate::error::{PaceError, Result};
use crate::estimator::PaceEstimator;
use crate::models::TrackerConfig;
use crate::types::{LocationSample, PaceResult};

// Prøv OBJECT først, deretter ren liste med samples
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayIn {
    Object {
        samples: Vec<LocationSample>,
        #[serde(default)]
        config: Option<TrackerConfig>,
    },
    Bare(Vec<LocationSample>),
}

#[derive(Debug, Serialize)]
struct ReplayOut<'a> {
    accepted: usize,
    rejected: usize,
    results: &'a [PaceResult],
    last_pace: &'a str,
}

/// JSON inn / JSON ut: spiller av et opptak gjennom en fersk estimator.
///
/// Godtar `{"samples": [...], "config": {...}}` eller bare `[...]`.
pub fn replay_track_json(json_in: &str) -> Result<String> {
    let mut de = serde_json::Deserializer::from_str(json_in);
    let repr: ReplayIn = spte::deserialize(&mut de).map_err(|e| PaceError::ConfigParse {
        path: "<replay>".to_string(),
        at: e.path().to_string(),
        message: e.inner().to_string(),
    })?;

    let (samples, cfg) = match repr {
        ReplayIn::Object { samples, config } => (samples, config.unwrap_or_default()),
        ReplayIn::Bare(samples) => (samples, TrackerConfig::default()),
    };
    cfg.validate()?;

    let total = samples.len();
    let mut est = PaceEstimator::new(&cfg);
    let results = est.replay(samples);

    let out = ReplayOut {
        accepted: results.len(),
        rejected: total - results.len(),
        results: &results,
        last_pace: est.pace_text(),
    };
    Ok(serde_json::to_string(&out)?)
}
