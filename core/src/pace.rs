pub const PACE_PLACEHOLDER: &str = "--:--";

/// Tempo i min/km. `None` betyr "står stille / for sakte til å registreres".
pub fn pace_min_per_km(speed_kmh: f64, min_speed_kmh: f64) -> Option<f64> {
    if speed_kmh > min_speed_kmh {
        Some(60.0 / speed_kmh)
    } else {
        None
    }
}

/// `m:ss min/km`, eller plassholder hvis tempoet mangler eller er tregere enn taket.
pub fn format_pace(pace: Option<f64>, max_pace_min_per_km: f64) -> String {
    match pace {
        Some(p) if p.is_finite() && p <= max_pace_min_per_km => {
            let min = p.floor();
            let sec = ((p - min) * 60.0).floor();
            format!("{}:{:02} min/km", min as i64, sec as i64)
        }
        _ => PACE_PLACEHOLDER.to_string(),
    }
}

/// Om tempoet i det hele tatt vises (under taket).
pub fn trackable(pace: Option<f64>, max_pace_min_per_km: f64) -> Option<f64> {
    pace.filter(|p| p.is_finite() && *p <= max_pace_min_per_km)
}
