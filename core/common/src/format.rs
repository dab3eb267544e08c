//! Human-readable formatting helpers.

/// Unit names for base-1024 size formatting.
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count as a human-readable size.
///
/// Uses base-1024 units up to TB, rounded to two decimals with trailing
/// zeros dropped: `1536` becomes `"1.5 KB"`, `1048576` becomes `"1 MB"`.
pub fn format_file_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut divisor: u64 = 1;
    while unit + 1 < SIZE_UNITS.len() && size_bytes / divisor >= 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let value = size_bytes as f64 / divisor as f64;
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_known_values() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1), "1 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1048576), "1 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn test_format_two_decimal_rounding() {
        // 1234 / 1024 = 1.205...
        assert_eq!(format_file_size(1234), "1.21 KB");
        // 5.5 MB + a few bytes still rounds to 5.5
        assert_eq!(format_file_size(5 * 1024 * 1024 + 512 * 1024 + 3), "5.5 MB");
    }

    #[test]
    fn test_format_caps_at_terabytes() {
        let two_pb = 2 * 1024u64.pow(5);
        assert_eq!(format_file_size(two_pb), "2048 TB");
    }

    proptest! {
        #[test]
        fn prop_format_has_known_unit(bytes in 1u64..u64::MAX / 2) {
            let formatted = format_file_size(bytes);
            let (number, unit) = formatted.split_once(' ').unwrap();
            prop_assert!(SIZE_UNITS.contains(&unit));
            let number: f64 = number.parse().unwrap();
            prop_assert!(number > 0.0);
            if unit != "TB" {
                prop_assert!(number <= 1024.0);
            }
        }
    }
}
