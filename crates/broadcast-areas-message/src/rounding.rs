/// Round to `figures` significant figures. Zero and non-finite values are returned unchanged.
pub fn round_to_significant_figures(value: f64, figures: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }

    let magnitude = value.abs().log10().floor() as i32;
    let digits = figures.max(1) as i32 - 1 - magnitude;
    let factor = 10f64.powi(digits.abs());

    if digits >= 0 {
        (value * factor).round() / factor
    } else {
        (value / factor).round() * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_one_significant_figure() {
        assert_eq!(round_to_significant_figures(6562.5, 1), 7000.0);
        assert_eq!(round_to_significant_figures(1234.0, 1), 1000.0);
        assert_eq!(round_to_significant_figures(95.0, 1), 100.0);
        assert_eq!(round_to_significant_figures(4.0, 1), 4.0);
        assert_eq!(round_to_significant_figures(0.0, 1), 0.0);
    }

    #[test]
    fn test_more_figures() {
        assert_eq!(round_to_significant_figures(123_456.0, 2), 120_000.0);
        assert_eq!(round_to_significant_figures(123_456.0, 3), 123_000.0);
        assert!((round_to_significant_figures(0.012345, 2) - 0.012).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn test_rounding_stays_within_half_a_unit(value in 1.0f64..1e9) {
            let rounded = round_to_significant_figures(value, 1);
            let unit = 10f64.powi(value.log10().floor() as i32);
            prop_assert!((rounded - value).abs() <= unit / 2.0 + 1e-6);
        }
    }
}
