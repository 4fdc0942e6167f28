//! Timestamp parsing and formatting for crop boundaries.

/// Parses `HH:MM:SS`, `MM:SS` or plain `SS` into whole seconds.
///
/// Minutes and seconds must be below 60 when a higher unit is present.
/// Returns `None` for anything that does not parse cleanly.
pub fn parse_hhmmss(input: &str) -> Option<u32> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let parts: Vec<&str> = input.split(':').map(str::trim).collect();
    let (h, m, s) = match parts.as_slice() {
        [h, m, s] => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?, s.parse::<u32>().ok()?),
        [m, s] => (0, m.parse::<u32>().ok()?, s.parse::<u32>().ok()?),
        [s] => (0, 0, s.parse::<u32>().ok()?),
        _ => return None,
    };

    if parts.len() > 1 && (m >= 60 || s >= 60) {
        return None;
    }

    Some(h * 3600 + m * 60 + s)
}

/// Formats whole seconds as `HH:MM:SS`.
pub fn format_hhmmss(total_secs: u32) -> String {
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_timestamp() {
        assert_eq!(parse_hhmmss("01:02:03"), Some(3723));
        assert_eq!(parse_hhmmss("00:00:00"), Some(0));
        assert_eq!(parse_hhmmss("10:00:00"), Some(36000));
    }

    #[test]
    fn test_parse_short_forms() {
        assert_eq!(parse_hhmmss("02:30"), Some(150));
        assert_eq!(parse_hhmmss("90"), Some(90));
        assert_eq!(parse_hhmmss(" 45 "), Some(45));
    }

    #[test]
    fn test_parse_rejects_out_of_range_fields() {
        assert_eq!(parse_hhmmss("00:61:00"), None);
        assert_eq!(parse_hhmmss("00:00:75"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_hhmmss(""), None);
        assert_eq!(parse_hhmmss("abc"), None);
        assert_eq!(parse_hhmmss("1:2:3:4"), None);
        assert_eq!(parse_hhmmss("-5"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_hhmmss(0), "00:00:00");
        assert_eq!(format_hhmmss(3723), "01:02:03");
        assert_eq!(format_hhmmss(86400), "24:00:00");
    }

    #[test]
    fn test_round_trip() {
        for secs in [0, 59, 60, 3599, 3600, 7261] {
            assert_eq!(parse_hhmmss(&format_hhmmss(secs)), Some(secs));
        }
    }
}
