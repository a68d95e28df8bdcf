const TOLERANCE: f64 = 1e-9;

/// Tick positions for one axis and the number of decimals needed to label
/// them without ambiguity
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub values: Vec<f64>,
    pub step: f64,
    pub decimals: usize,
}

impl Ticks {
    pub fn label(&self, value: f64) -> String {
        // Avoid "-0.00" for values that are zero up to rounding
        let value = if value.abs() < self.step * 1e-6 { 0.0 } else { value };
        format!("{:.*}", self.decimals, value)
    }
}

/// Pick "nice" ticks (1, 2, 2.5 or 5 times a power of ten) inside
/// `[min, max]`, aiming for roughly `target` intervals
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Ticks {
    let range = max - min;
    if !range.is_finite() || range <= 0.0 || target == 0 {
        return Ticks {
            values: Vec::new(),
            step: 0.0,
            decimals: 0,
        };
    }

    let raw = range / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 + TOLERANCE {
        1.0
    } else if normalized <= 2.0 + TOLERANCE {
        2.0
    } else if normalized <= 2.5 + TOLERANCE {
        2.5
    } else if normalized <= 5.0 + TOLERANCE {
        5.0
    } else {
        10.0
    };
    let step = nice * magnitude;

    let mut decimals = (-(step.log10() + TOLERANCE).floor()).max(0.0) as usize;
    if nice == 2.5 {
        decimals += 1;
    }

    let first = (min / step).ceil() as i64;
    let last = (max / step + TOLERANCE).floor() as i64;
    let values = (first..=last).map(|i| i as f64 * step).collect();

    Ticks {
        values,
        step,
        decimals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range() {
        let ticks = nice_ticks(0.0, 1.0, 5);
        assert!((ticks.step - 0.2).abs() < 1e-12);
        assert_eq!(ticks.values.len(), 6);
        assert_eq!(ticks.label(ticks.values[1]), "0.2");
    }

    #[test]
    fn test_ticks_stay_inside_range() {
        let ticks = nice_ticks(76.84, 77.35, 6);
        assert!(!ticks.values.is_empty());
        for v in &ticks.values {
            assert!(*v >= 76.84 && *v <= 77.35);
        }
        assert!((ticks.step - 0.1).abs() < 1e-12);
        assert_eq!(ticks.label(77.1), "77.1");
    }

    #[test]
    fn test_quarter_steps_get_extra_decimal() {
        let ticks = nice_ticks(0.0, 10.0, 4);
        assert!((ticks.step - 2.5).abs() < 1e-12);
        assert_eq!(ticks.label(2.5), "2.5");
    }

    #[test]
    fn test_degenerate_range() {
        assert!(nice_ticks(1.0, 1.0, 5).values.is_empty());
        assert!(nice_ticks(0.0, f64::NAN, 5).values.is_empty());
    }

    #[test]
    fn test_negative_zero_label() {
        let ticks = nice_ticks(-1.0, 1.0, 4);
        assert!((ticks.step - 0.5).abs() < 1e-12);
        assert_eq!(ticks.label(-1e-17), "0.0");
    }
}
