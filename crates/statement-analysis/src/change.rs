//! Year-over-year change operator shared by every detector.

use serde::{Deserialize, Serialize};

/// Denominator used for a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeBase {
    /// `(x[i] - x[i-1]) / x[i-1]`
    #[default]
    Signed,
    /// `(x[i] - x[i-1]) / |x[i-1]|`, keeps the sign of the move when the base is negative
    Absolute,
}

/// Fractional change of each period against the previous one.
///
/// `result[0]` is always `None`. `result[i]` is `None` when either value is
/// unknown or the previous value is exactly zero, so the output never holds
/// an infinity.
pub fn yoy_change(values: &[f64], base: ChangeBase) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(values.len());
    if values.is_empty() {
        return changes;
    }

    changes.push(None);
    for pair in values.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let change = if !prev.is_finite() || !curr.is_finite() || prev == 0.0 {
            None
        } else {
            let denominator = match base {
                ChangeBase::Signed => prev,
                ChangeBase::Absolute => prev.abs(),
            };
            Some((curr - prev) / denominator)
        };
        changes.push(change);
    }
    changes
}

/// Signed change, the default for every detector.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    yoy_change(values, ChangeBase::Signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_period_is_undefined() {
        let changes = pct_change(&[100.0, 110.0]);
        assert_eq!(changes[0], None);
        assert_relative_eq!(changes[1].unwrap(), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_or_unknown_base_never_divides() {
        let changes = pct_change(&[0.0, 50.0, f64::NAN, 20.0, 10.0]);
        assert_eq!(changes[1], None);
        assert_eq!(changes[2], None);
        assert_eq!(changes[3], None);
        assert_relative_eq!(changes[4].unwrap(), -0.5, epsilon = 1e-12);
        assert!(changes.iter().flatten().all(|c| c.is_finite()));
    }

    #[test]
    fn test_absolute_base_keeps_direction() {
        // Coverage moving from -2 to -1 is an improvement
        let signed = yoy_change(&[-2.0, -1.0], ChangeBase::Signed);
        let absolute = yoy_change(&[-2.0, -1.0], ChangeBase::Absolute);
        assert_relative_eq!(signed[1].unwrap(), -0.5, epsilon = 1e-12);
        assert_relative_eq!(absolute[1].unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_short_series() {
        assert!(pct_change(&[]).is_empty());
        assert_eq!(pct_change(&[5.0]), vec![None]);
    }
}
