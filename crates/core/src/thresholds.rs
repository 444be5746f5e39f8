//! Compiled-in alert thresholds and the pure threshold evaluator.
//!
//! The table is static configuration, not user-editable: every monitored
//! variable has a fixed `[min, max]` safe range and anything outside it is
//! an alert.

use crate::measurement::Variable;

// ---------------------------------------------------------------------------
// Threshold table
// ---------------------------------------------------------------------------

/// Inclusive safe range for one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub min: f64,
    pub max: f64,
}

/// The configured safe range for `variable`.
///
/// Every [`Variable`] has a threshold; unknown column names never reach this
/// function because they are filtered out at parse time.
pub fn threshold_for(variable: Variable) -> Threshold {
    match variable {
        Variable::AxialVibration => Threshold { min: 0.0, max: 5.0 },
        Variable::RadialYVibration => Threshold { min: 0.0, max: 5.0 },
        Variable::RadialXVibration => Threshold { min: 0.0, max: 7.0 },
        Variable::Temperature => Threshold { min: 0.0, max: 70.0 },
        Variable::Current => Threshold { min: 0.0, max: 100.0 },
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Outcome of checking one value against its threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertState {
    /// Value absent or within the safe range.
    NoAlert,
    /// Value above the configured maximum.
    AboveMax {
        /// How far above the maximum, always positive.
        exceeded_by: f64,
    },
    /// Value below the configured minimum.
    BelowMin {
        /// How far below the minimum, always positive.
        exceeded_by: f64,
    },
}

impl AlertState {
    /// Whether this state should trigger a notification.
    pub fn is_alert(self) -> bool {
        !matches!(self, AlertState::NoAlert)
    }

    /// Short human-readable reason, e.g. `above maximum limit (5)`.
    ///
    /// Returns `None` for [`AlertState::NoAlert`].
    pub fn reason(self, threshold: Threshold) -> Option<String> {
        match self {
            AlertState::NoAlert => None,
            AlertState::AboveMax { .. } => {
                Some(format!("above maximum limit ({})", threshold.max))
            }
            AlertState::BelowMin { .. } => {
                Some(format!("below minimum limit ({})", threshold.min))
            }
        }
    }
}

/// Evaluate one reading against the threshold table.
///
/// Pure and total over the float domain: an absent value is `NoAlert`, and a
/// NaN value is treated as absent (`NoAlert`) rather than as an error state,
/// matching the comparison semantics the stores rely on.
pub fn evaluate(variable: Variable, value: Option<f64>) -> AlertState {
    let Some(value) = value else {
        return AlertState::NoAlert;
    };
    if value.is_nan() {
        return AlertState::NoAlert;
    }

    let threshold = threshold_for(variable);
    if value > threshold.max {
        AlertState::AboveMax {
            exceeded_by: value - threshold.max,
        }
    } else if value < threshold.min {
        AlertState::BelowMin {
            exceeded_by: threshold.min - value,
        }
    } else {
        AlertState::NoAlert
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn in_range_values_do_not_alert() {
        for var in Variable::ALL {
            let t = threshold_for(var);
            let mid = (t.min + t.max) / 2.0;
            assert_eq!(evaluate(var, Some(mid)), AlertState::NoAlert, "{var}");
        }
    }

    #[test]
    fn boundary_values_do_not_alert() {
        for var in Variable::ALL {
            let t = threshold_for(var);
            assert_eq!(evaluate(var, Some(t.min)), AlertState::NoAlert);
            assert_eq!(evaluate(var, Some(t.max)), AlertState::NoAlert);
        }
    }

    #[test]
    fn above_max_reports_positive_excess() {
        for var in Variable::ALL {
            let t = threshold_for(var);
            let state = evaluate(var, Some(t.max + 2.5));
            assert_matches!(state, AlertState::AboveMax { exceeded_by } if (exceeded_by - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn below_min_reports_positive_excess() {
        for var in Variable::ALL {
            let t = threshold_for(var);
            let state = evaluate(var, Some(t.min - 1.25));
            assert_matches!(state, AlertState::BelowMin { exceeded_by } if (exceeded_by - 1.25).abs() < 1e-9);
        }
    }

    #[test]
    fn absent_value_never_alerts() {
        for var in Variable::ALL {
            assert_eq!(evaluate(var, None), AlertState::NoAlert);
        }
    }

    #[test]
    fn nan_is_treated_as_absent() {
        for var in Variable::ALL {
            assert_eq!(evaluate(var, Some(f64::NAN)), AlertState::NoAlert);
        }
    }

    #[test]
    fn infinite_value_still_evaluates() {
        // The evaluator is total; +inf is simply very far above max.
        let state = evaluate(Variable::Temperature, Some(f64::INFINITY));
        assert_matches!(state, AlertState::AboveMax { exceeded_by } if exceeded_by.is_infinite());
    }

    #[test]
    fn temperature_75_exceeds_max_by_5() {
        let state = evaluate(Variable::Temperature, Some(75.0));
        assert_matches!(state, AlertState::AboveMax { exceeded_by } if (exceeded_by - 5.0).abs() < 1e-9);
    }

    #[test]
    fn current_50_is_in_range() {
        assert_eq!(evaluate(Variable::Current, Some(50.0)), AlertState::NoAlert);
    }

    #[test]
    fn axial_vibration_6_exceeds_max_by_1() {
        let state = evaluate(Variable::AxialVibration, Some(6.0));
        assert_matches!(state, AlertState::AboveMax { exceeded_by } if (exceeded_by - 1.0).abs() < 1e-9);
    }

    #[test]
    fn reason_names_the_violated_bound() {
        let t = threshold_for(Variable::AxialVibration);
        let above = evaluate(Variable::AxialVibration, Some(6.0));
        assert_eq!(above.reason(t).unwrap(), "above maximum limit (5)");
        let below = evaluate(Variable::AxialVibration, Some(-1.0));
        assert_eq!(below.reason(t).unwrap(), "below minimum limit (0)");
        assert_eq!(AlertState::NoAlert.reason(t), None);
    }
}
