/// Eksponentielt glidende snitt (første ordens IIR lavpass) for fart.
/// `value = alpha * raw + (1 - alpha) * value`; første verdi tas rett inn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSmoother {
    alpha: f64,
    value: Option<f64>, // None = ikke initialisert
}

impl SpeedSmoother {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, value: None }
    }

    pub fn update(&mut self, raw: f64) -> f64 {
        let next = match self.value {
            None => raw,
            Some(prev) => self.alpha * raw + (1.0 - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
