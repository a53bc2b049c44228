use super::scale::ScoreScale;

/// Parse free-form numeric text.
///
/// Blank text, garbage and non-finite spellings (`NaN`, `inf`) are all `None`:
/// an absent value, never a zero.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Round half away from zero to two decimal places.
///
/// Values too large to scale by 100 are returned unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Two-decimal text for a computed score, rounded the same way as [`round2`].
pub fn format_score(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// Shortest text for a two-decimal value: "8", "8.5", "8.33".
pub fn format_trimmed(value: f64) -> String {
    let rounded = round2(value);
    // Avoid rendering "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    rounded.to_string()
}

/// Canonicalize a raw component score.
///
/// Returns an empty string for blank or non-numeric input. Numbers are clamped
/// to `scale` and rounded to two decimals; integral results have no fractional
/// part. Applying it twice gives the same result as applying it once.
pub fn normalize(raw: &str, scale: &ScoreScale) -> String {
    match parse_number(raw) {
        Some(value) => {
            let rounded = round2(scale.clamp(value));
            format_trimmed(scale.clamp(rounded))
        }
        None => String::new(),
    }
}

/// Canonicalize a raw weight percentage.
///
/// Blank stays blank. Anything else becomes a whole number in 0-100:
/// fractions are floored and garbage becomes "0".
pub fn normalize_weight(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match parse_number(raw) {
        Some(value) => format_trimmed(value.floor().clamp(0.0, 100.0)),
        None => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUNDRED: ScoreScale = ScoreScale::HUNDRED;
    const TEN: ScoreScale = ScoreScale::TEN;

    #[test]
    fn test_blank_is_empty_not_zero() {
        assert_eq!(normalize("", &TEN), "");
        assert_eq!(normalize("   ", &TEN), "");
        assert_eq!(normalize("\t\n", &TEN), "");
    }

    #[test]
    fn test_non_numeric_is_empty() {
        assert_eq!(normalize("abc", &HUNDRED), "");
        assert_eq!(normalize("8,5", &TEN), "");
        assert_eq!(normalize("NaN", &TEN), "");
        assert_eq!(normalize("inf", &TEN), "");
    }

    #[test]
    fn test_clamps_to_hundred_scale() {
        assert_eq!(normalize("150", &HUNDRED), "100");
        assert_eq!(normalize("-3", &HUNDRED), "0");
    }

    #[test]
    fn test_clamps_to_ten_scale() {
        assert_eq!(normalize("11", &TEN), "10");
        assert_eq!(normalize("-0.5", &TEN), "0");
    }

    #[test]
    fn test_rounds_fractions_to_two_decimals() {
        assert_eq!(normalize("8.333", &TEN), "8.33");
        assert_eq!(normalize("7.456", &TEN), "7.46");
        assert_eq!(normalize("8.50", &TEN), "8.5");
    }

    #[test]
    fn test_integral_has_no_fraction() {
        assert_eq!(normalize("8", &TEN), "8");
        assert_eq!(normalize("8.0", &TEN), "8");
        assert_eq!(normalize(" 7 ", &TEN), "7");
        assert_eq!(normalize("-0", &TEN), "0");
    }

    #[test]
    fn test_zero_is_kept() {
        assert_eq!(normalize("0", &TEN), "0");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "", " ", "abc", "8", "8.335", "9.999", "10.004", "-1", "150", "0.005", "1e1", "3.14159",
        ];
        for scale in [TEN, HUNDRED] {
            for input in inputs {
                let once = normalize(input, &scale);
                assert_eq!(normalize(&once, &scale), once, "input {:?}", input);
            }
        }
    }

    #[test]
    fn test_output_within_scale() {
        let inputs = ["9.999", "10.006", "-0.004", "99.999", "1000", "-1000"];
        for scale in [TEN, HUNDRED] {
            for input in inputs {
                let out = normalize(input, &scale);
                let value = parse_number(&out).unwrap();
                assert!(scale.contains(value), "{} -> {}", input, out);
            }
        }
    }

    #[test]
    fn test_format_score_rounds_ties_up() {
        assert_eq!(format_score(7.125), "7.13");
        assert_eq!(format_score(8.125), "8.13");
        assert_eq!(format_score(8.0), "8.00");
        assert_eq!(format_score(8.0 / 0.96), "8.33");
    }

    #[test]
    fn test_format_score_matches_round2() {
        for value in [0.125, 2.375, 6.625, 7.125, 9.875, 19.5] {
            assert_eq!(format_score(value), format!("{:.2}", round2(value)));
            assert_eq!(parse_number(&format_score(value)), Some(round2(value)));
        }
    }

    #[test]
    fn test_round2_huge_value_stays_finite() {
        assert_eq!(round2(1e308), 1e308);
        assert_eq!(round2(-1e308), -1e308);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 3 "), Some(3.0));
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("three"), None);
        assert_eq!(parse_number("infinity"), None);
    }

    #[test]
    fn test_normalize_weight() {
        assert_eq!(normalize_weight(""), "");
        assert_eq!(normalize_weight("30"), "30");
        assert_eq!(normalize_weight("33.7"), "33");
        assert_eq!(normalize_weight("120"), "100");
        assert_eq!(normalize_weight("-5"), "0");
        assert_eq!(normalize_weight("half"), "0");
    }
}
