//! WBGT-style heat-stress index (hardware-independent)

/// Formula selection, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WbgtConfig {
    /// Published coefficient-set version, 3 or 4.
    pub version: u8,
    /// Wide-range extension of the fit.
    pub wide: bool,
}

/// The (version, wide) pair has no coefficient set. The index is undefined
/// in this case and must not be transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedConfig;

// Coefficient rows (a, b, c, d): index = a*t + b*h + c*t*h + d.
const V3: (f32, f32, f32, f32) = (0.687, 0.0360, 0.00367, -2.062);
const V3_WIDE: (f32, f32, f32, f32) = (0.725, 0.0368, 0.00364, -3.246);
const V4: (f32, f32, f32, f32) = (0.724, 0.0342, 0.00277, -3.007);
const V4_WIDE: (f32, f32, f32, f32) = (0.754, 0.0382, 0.00264, -3.965);

/// Empirical heat-stress index in degrees Celsius. Pure and deterministic.
pub fn compute(temperature: f32, humidity: f32, config: WbgtConfig) -> Result<f32, UnsupportedConfig> {
    let (a, b, c, d) = match (config.version, config.wide) {
        (3, false) => V3,
        (3, true) => V3_WIDE,
        (4, false) => V4,
        (4, true) => V4_WIDE,
        _ => return Err(UnsupportedConfig),
    };
    Ok(a * temperature + b * humidity + c * temperature * humidity + d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(version: u8, wide: bool) -> WbgtConfig {
        WbgtConfig { version, wide }
    }

    #[test]
    fn matches_coefficient_table() {
        let t = 29.2;
        let h = 70.0;
        let cases = [
            (cfg(3, false), 28.0199),
            (cfg(3, true), 27.9402),
            (cfg(4, false), 26.1897),
            (cfg(4, true), 26.1220),
        ];
        for (config, expected) in cases {
            let index = compute(t, h, config).unwrap();
            assert!(
                (index - expected).abs() < 0.01,
                "{:?}: {} vs {}",
                config,
                index,
                expected
            );
        }
    }

    #[test]
    fn is_pure() {
        let config = cfg(4, true);
        let a = compute(31.6, 55.4, config).unwrap();
        let b = compute(31.6, 55.4, config).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn rejects_unknown_configurations() {
        assert_eq!(compute(25.0, 50.0, cfg(5, false)), Err(UnsupportedConfig));
        assert_eq!(compute(25.0, 50.0, cfg(5, true)), Err(UnsupportedConfig));
        assert_eq!(compute(25.0, 50.0, cfg(0, false)), Err(UnsupportedConfig));
        assert_eq!(compute(25.0, 50.0, cfg(2, true)), Err(UnsupportedConfig));
    }
}
