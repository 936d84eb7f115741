// Model of the data produced in one wake cycle

/// Calibrated output of one sensor conversion.
///
/// Humidity lands in [0, 100] by construction of the decode formula and is
/// deliberately not clamped: out-of-range values are a data-quality signal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    pub temperature: f32,
    pub humidity: f32,
}
