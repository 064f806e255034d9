// Python-binding for verter som kjører kjernen fra Python (feature "python").
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::announcer::AnnouncementScheduler;
use crate::estimator::PaceEstimator;
use crate::models::TrackerConfig;
use crate::storage::parse_config;
use crate::types::LocationSample;

fn to_py_err(e: crate::PaceError) -> PyErr {
    PyErr::new::<PyValueError, _>(e.to_string())
}

/// Estimator + nedkjøling for én Python-vert.
#[pyclass(name = "PaceEstimator")]
pub struct PyPaceEstimator {
    inner: PaceEstimator,
    scheduler: AnnouncementScheduler,
}

#[pymethods]
impl PyPaceEstimator {
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let cfg = match config_json {
            Some(txt) => parse_config(txt).map_err(to_py_err)?,
            None => TrackerConfig::default(),
        };
        Ok(Self {
            inner: PaceEstimator::new(&cfg),
            scheduler: AnnouncementScheduler::new(cfg.announce_interval_ms),
        })
    }

    /// Returnerer (km/t, tempo-tekst), eller None hvis fixen ble avvist.
    #[pyo3(signature = (latitude, longitude, timestamp_ms, accuracy_m, now_ms, speed_mps=None))]
    fn on_sample(
        &mut self,
        latitude: f64,
        longitude: f64,
        timestamp_ms: i64,
        accuracy_m: f32,
        now_ms: i64,
        speed_mps: Option<f32>,
    ) -> Option<(f64, String)> {
        let sample = LocationSample {
            latitude,
            longitude,
            timestamp_ms,
            accuracy_m,
            speed_mps,
        };
        self.inner
            .on_sample(&sample, now_ms)
            .map(|r| (r.speed_kmh, r.pace))
    }

    /// Samme som `on_sample`, men med samplet som JSON-objekt.
    fn on_sample_json(&mut self, sample_json: &str, now_ms: i64) -> PyResult<Option<String>> {
        let mut de = serde_json::Deserializer::from_str(sample_json);
        let sample: LocationSample = serde_path_to_error::deserialize(&mut de)
            .map_err(|e| PyValueError::new_err(format!("sample parse at {}: {}", e.path(), e)))?;
        match self.inner.on_sample(&sample, now_ms) {
            Some(r) => serde_json::to_string(&r)
                .map(Some)
                .map_err(|e| PyValueError::new_err(e.to_string())),
            None => Ok(None),
        }
    }

    /// Opplesningstekst hvis nedkjølingen er over, ellers None.
    fn poll_announcement(&mut self, now_ms: i64) -> Option<String> {
        self.inner.latest()?;
        let pace = self.inner.pace_text().to_string();
        self.scheduler.poll(now_ms, &pace).map(|a| a.text)
    }

    fn display_text(&self) -> Option<String> {
        self.inner.latest().map(|r| r.display_text())
    }

    #[getter]
    fn pace(&self) -> String {
        self.inner.pace_text().to_string()
    }

    #[getter]
    fn smoothed_speed_mps(&self) -> Option<f64> {
        self.inner.smoothed_speed_mps()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.scheduler.reset();
    }
}

#[pyfunction]
fn replay_track_json(json_str: &str) -> PyResult<String> {
    crate::replay::replay_track_json(json_str).map_err(to_py_err)
}

#[pymodule]
fn pacetracker_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyPaceEstimator>()?;
    m.add_function(wrap_pyfunction!(replay_track_json, m)?)?;
    Ok(())
}
