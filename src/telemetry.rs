//! Telemetry line building (CSV-over-UDP payload)

use core::fmt::Write;

use heapless::String;

/// Capacity for one line: device id plus three signed one-decimal fields.
pub const MAX_LINE_LEN: usize = 64;

/// Build one telemetry line: `<id>,<temperature>,<humidity>,<index>\n`,
/// each numeric field rendered with exactly one decimal place.
pub fn format_line(
    device_id: &str,
    temperature: f32,
    humidity: f32,
    index: f32,
) -> String<MAX_LINE_LEN> {
    let mut line = String::new();
    let _ = write!(
        line,
        "{},{:.1},{:.1},{:.1}\n",
        device_id, temperature, humidity, index
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_reference_line_exactly() {
        let line = format_line("humid_3", 29.2, 70.0, 27.9);
        assert_eq!(line.as_str(), "humid_3,29.2,70.0,27.9\n");
    }

    #[test]
    fn rounds_to_one_decimal() {
        let line = format_line("humid_3", 26.2497, 67.7501, 27.9402);
        assert_eq!(line.as_str(), "humid_3,26.2,67.8,27.9\n");
    }

    #[test]
    fn carries_negative_temperatures() {
        let line = format_line("humid_3", -4.97, 31.0, -5.52);
        assert_eq!(line.as_str(), "humid_3,-5.0,31.0,-5.5\n");
    }
}
