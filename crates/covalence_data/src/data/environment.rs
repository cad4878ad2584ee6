use serde::{Deserialize, Serialize};

/// Ambient conditions shared by every active relationship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Kelvin.
    pub temperature: f64,
    /// Atmospheres.
    pub pressure: f64,
    /// pH scale.
    pub acidity: f64,
}

impl Environment {
    pub const STANDARD_TEMPERATURE: f64 = 298.15;
    pub const STANDARD_PRESSURE: f64 = 1.0;
    pub const NEUTRAL_ACIDITY: f64 = 7.0;

    pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 5000.0);
    pub const PRESSURE_RANGE: (f64, f64) = (0.0, 1000.0);
    pub const ACIDITY_RANGE: (f64, f64) = (0.0, 14.0);

    #[must_use]
    pub fn new(temperature: f64, pressure: f64, acidity: f64) -> Self {
        Self {
            temperature,
            pressure,
            acidity,
        }
        .clamped()
    }

    /// Returns a copy with every parameter forced into its valid domain.
    /// NaN inputs fall back to standard conditions.
    #[must_use]
    pub fn clamped(self) -> Self {
        fn clamp(v: f64, (lo, hi): (f64, f64), fallback: f64) -> f64 {
            if v.is_nan() {
                fallback
            } else {
                v.clamp(lo, hi)
            }
        }
        Self {
            temperature: clamp(
                self.temperature,
                Self::TEMPERATURE_RANGE,
                Self::STANDARD_TEMPERATURE,
            ),
            pressure: clamp(self.pressure, Self::PRESSURE_RANGE, Self::STANDARD_PRESSURE),
            acidity: clamp(self.acidity, Self::ACIDITY_RANGE, Self::NEUTRAL_ACIDITY),
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self.clamped()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temperature: Self::STANDARD_TEMPERATURE,
            pressure: Self::STANDARD_PRESSURE,
            acidity: Self::NEUTRAL_ACIDITY,
        }
    }
}
