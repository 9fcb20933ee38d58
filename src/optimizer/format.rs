//! Output formatting and the 0.1 MW rounding grid shared by all stages.

use super::constraints::FLOAT_TOLERANCE;
use crate::domain::{Plant, PlantDispatch};

/// Round to one decimal, half away from zero, with -0.0 folded into 0.0
pub fn round_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round to one decimal without leaving `[lo, hi]`.
///
/// When rounding crosses a bound the neighbouring tenth inside the range is
/// used; if the range holds no tenth at all the bound itself is returned.
pub fn round_tenth_within(value: f64, lo: f64, hi: f64) -> f64 {
    let clamped = value.max(lo).min(hi);
    let rounded = round_tenth(clamped);
    if rounded > hi + FLOAT_TOLERANCE {
        let down = round_tenth(rounded - 0.1);
        return if down >= lo - FLOAT_TOLERANCE { down } else { hi };
    }
    if rounded < lo - FLOAT_TOLERANCE {
        let up = round_tenth(rounded + 0.1);
        return if up <= hi + FLOAT_TOLERANCE { up } else { lo };
    }
    rounded
}

/// Pair every plant with its power, in request order.
///
/// `powers` is indexed like `plants`; missing positions count as 0.
pub fn format_entries(plants: &[Plant], powers: &[f64]) -> Vec<PlantDispatch> {
    plants
        .iter()
        .enumerate()
        .map(|(i, plant)| PlantDispatch {
            name: plant.name.clone(),
            power: round_tenth(powers.get(i).copied().unwrap_or(0.0)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlantType;
    use rstest::rstest;

    #[rstest]
    #[case(0.25, 0.3)]
    #[case(-0.25, -0.3)]
    #[case(21.6, 21.6)]
    #[case(40.32, 40.3)]
    #[case(-0.04, 0.0)]
    fn test_round_tenth(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round_tenth(value), expected);
    }

    #[test]
    fn test_round_tenth_never_yields_negative_zero() {
        assert!(round_tenth(-0.01).is_sign_positive());
    }

    #[test]
    fn test_round_within_respects_bounds() {
        // 36.25 would round up past pmax
        assert_eq!(round_tenth_within(36.25, 0.0, 36.25), 36.2);
        // 12.34 would round down below pmin
        assert_eq!(round_tenth_within(12.34, 12.34, 50.0), 12.4);
        // no tenth inside the range
        assert_eq!(round_tenth_within(5.0, 5.01, 5.04), 5.01);
        assert_eq!(round_tenth_within(500.0, 100.0, 460.0), 460.0);
    }

    #[test]
    fn test_format_keeps_input_order() {
        let plants = vec![
            Plant::new("windpark1", PlantType::WindTurbine, 1.0, 0.0, 150.0),
            Plant::new("gasfiredbig1", PlantType::GasFired, 0.53, 100.0, 460.0),
            Plant::new("tj1", PlantType::Turbojet, 0.3, 0.0, 16.0),
        ];
        let entries = format_entries(&plants, &[90.0, 389.99]);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "windpark1");
        assert_eq!(entries[1].power, 390.0);
        assert_eq!(entries[2].power, 0.0);
    }
}
