//! Human-readable currency formatting with K/M/B magnitude suffixes.

use crate::domain::MetadataValue;

/// Marker shown wherever a value is missing or not numeric.
pub const NOT_AVAILABLE: &str = "N/A";

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Format a number as `$` + 2 decimals + optional magnitude suffix.
///
/// The sign leads the string (`-$1.50B`). Non-finite input renders as
/// [`NOT_AVAILABLE`].
pub fn format_amount(v: f64) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let abs = v.abs();
    let (scaled, suffix) = if abs >= BILLION {
        (abs / BILLION, "B")
    } else if abs >= MILLION {
        (abs / MILLION, "M")
    } else if abs >= THOUSAND {
        (abs / THOUSAND, "K")
    } else {
        (abs, "")
    };

    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}${scaled:.2}{suffix}")
}

/// Format a metadata value. Only `Number` values are formatted; text and
/// absent values both render as [`NOT_AVAILABLE`].
pub fn format_number(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Number(v) => format_amount(*v),
        MetadataValue::Text(_) | MetadataValue::Absent => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_boundaries() {
        assert_eq!(format_amount(1_000_000.0), "$1.00M");
        assert_eq!(format_amount(999_999.0), "$1000.00K");
        assert_eq!(format_amount(1_000_000_000.0), "$1.00B");
        assert_eq!(format_amount(1_000.0), "$1.00K");
        assert_eq!(format_amount(999.0), "$999.00");
    }

    #[test]
    fn small_values_have_no_suffix() {
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(28.456), "$28.46");
        assert_eq!(format_amount(1.2), "$1.20");
    }

    #[test]
    fn negative_values_lead_with_sign() {
        assert_eq!(format_amount(-1_500_000_000.0), "-$1.50B");
        assert_eq!(format_amount(-2.5), "-$2.50");
        assert_eq!(format_amount(-0.0), "$0.00");
    }

    #[test]
    fn trillions_stay_in_billions() {
        assert_eq!(format_amount(2_950_000_000_000.0), "$2950.00B");
    }

    #[test]
    fn non_finite_is_not_available() {
        assert_eq!(format_amount(f64::NAN), NOT_AVAILABLE);
        assert_eq!(format_amount(f64::INFINITY), NOT_AVAILABLE);
    }

    #[test]
    fn only_numbers_are_formatted() {
        assert_eq!(format_number(&MetadataValue::Number(1234.0)), "$1.23K");
        assert_eq!(format_number(&MetadataValue::Text("Buy".into())), NOT_AVAILABLE);
        assert_eq!(format_number(&MetadataValue::Absent), NOT_AVAILABLE);
    }
}
