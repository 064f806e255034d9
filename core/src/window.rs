use std::collections::VecDeque;

use crate::geo::distance_between;
use crate::types::LocationSample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowEntry {
    pub sample: LocationSample,
    pub received_at_ms: i64,
}

/// Glidende tidsvindu over mottatte samples, eldste først.
/// Rekkefølgen er mottaksrekkefølgen; vi sorterer aldri om.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    duration_ms: i64,
    entries: VecDeque<WindowEntry>,
}

impl WindowBuffer {
    pub fn new(duration_ms: i64) -> Self {
        Self {
            duration_ms,
            entries: VecDeque::new(),
        }
    }

    /// Legg til og kast alt med received_at < now - vindu.
    pub fn push(&mut self, sample: LocationSample, now_ms: i64) {
        self.entries.push_back(WindowEntry {
            sample,
            received_at_ms: now_ms,
        });
        self.evict(now_ms);
    }

    pub fn evict(&mut self, now_ms: i64) {
        let cutoff = now_ms.saturating_sub(self.duration_ms);
        while let Some(front) = self.entries.front() {
            if front.received_at_ms < cutoff {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter()
    }

    /// Sum av avstander mellom påfølgende samples (meter).
    pub fn path_length_m(&self) -> f64 {
        self.entries
            .iter()
            .zip(self.entries.iter().skip(1))
            .map(|(a, b)| distance_between(&a.sample, &b.sample))
            .sum()
    }

    /// Sekunder mellom første og siste mottak.
    pub fn elapsed_s(&self) -> f64 {
        match (self.entries.front(), self.entries.back()) {
            (Some(first), Some(last)) => {
                last.received_at_ms.saturating_sub(first.received_at_ms) as f64 / 1000.0
            }
            _ => 0.0,
        }
    }

    /// Fallback-fart (m/s) over vinduet. 0 ved < 2 samples eller ikke-positivt tidsrom.
    pub fn average_speed_mps(&self) -> f64 {
        if self.entries.len() < 2 {
            return 0.0;
        }
        let dt = self.elapsed_s();
        if dt <= 0.0 {
            return 0.0;
        }
        let v = self.path_length_m() / dt;
        if v.is_finite() { v } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64) -> LocationSample {
        LocationSample::new(lat, 10.75, 0, 5.0)
    }

    #[test]
    fn evicts_entries_older_than_window() {
        let mut w = WindowBuffer::new(5_000);
        w.push(at(59.0), 1_000);
        w.push(at(59.0), 3_000);
        w.push(at(59.0), 6_000);
        assert_eq!(w.len(), 3); // 1000 == 6000 - 5000 beholdes
        w.push(at(59.0), 6_001);
        assert_eq!(w.len(), 3);
        assert!(w.iter().all(|e| 6_001 - e.received_at_ms <= 5_000));
    }

    #[test]
    fn single_entry_has_no_speed() {
        let mut w = WindowBuffer::new(5_000);
        w.push(at(59.0), 1_000);
        assert_eq!(w.average_speed_mps(), 0.0);
    }

    #[test]
    fn duplicate_receive_times_give_zero() {
        let mut w = WindowBuffer::new(5_000);
        w.push(at(59.0), 1_000);
        w.push(at(59.001), 1_000);
        assert_eq!(w.elapsed_s(), 0.0);
        assert_eq!(w.average_speed_mps(), 0.0);
    }

    #[test]
    fn out_of_order_arrival_is_not_resorted() {
        let mut w = WindowBuffer::new(5_000);
        w.push(at(59.0), 4_000);
        w.push(at(59.001), 2_000);
        let order: Vec<i64> = w.iter().map(|e| e.received_at_ms).collect();
        assert_eq!(order, vec![4_000, 2_000]);
        // negativt tidsrom => 0
        assert_eq!(w.average_speed_mps(), 0.0);
    }

    #[test]
    fn extreme_receive_times_do_not_overflow() {
        let mut w = WindowBuffer::new(5_000);
        w.push(at(59.0), i64::MAX);
        w.push(at(59.001), i64::MIN);
        assert_eq!(w.len(), 2);
        assert!(w.elapsed_s() < 0.0);
        assert_eq!(w.average_speed_mps(), 0.0);

        // MIN faller ut av vinduet når MAX kommer
        let mut w = WindowBuffer::new(5_000);
        w.push(at(59.0), i64::MIN);
        w.push(at(59.001), i64::MAX);
        assert_eq!(w.len(), 1);
        assert_eq!(w.elapsed_s(), 0.0);
    }
}
