use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FeasibilityError, Result};

/// The ten scalar design parameters of a breeder-pin cross-section.
///
/// The field order here is the canonical order used by [`as_array`](Self::as_array)
/// and therefore by the fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignParameters {
    pub inner_bore: f64,
    pub outer_bore: f64,
    pub bore_turning_point_x: f64,
    pub bore_turning_point_y: f64,
    pub pin_radial_thickness: f64,
    pub breeder_inner_length: f64,
    pub breeder_outer_length: f64,
    pub outer_turning_point_x: f64,
    pub outer_turning_point_y: f64,
    pub outer_length: f64,
}

impl Default for DesignParameters {
    /// The reference pin used for the first sweep.
    fn default() -> Self {
        Self {
            inner_bore: 0.05,
            outer_bore: 0.5,
            bore_turning_point_x: 0.2,
            bore_turning_point_y: 0.8,
            pin_radial_thickness: 0.3,
            breeder_inner_length: 0.7,
            breeder_outer_length: 0.7,
            outer_turning_point_x: 0.25,
            outer_turning_point_y: 1.01,
            outer_length: 0.9,
        }
    }
}

impl DesignParameters {
    /// Number of parameters.
    pub const COUNT: usize = 10;

    /// Field names in canonical order.
    pub const NAMES: [&'static str; Self::COUNT] = [
        "inner_bore",
        "outer_bore",
        "bore_turning_point_x",
        "bore_turning_point_y",
        "pin_radial_thickness",
        "breeder_inner_length",
        "breeder_outer_length",
        "outer_turning_point_x",
        "outer_turning_point_y",
        "outer_length",
    ];

    /// Parameter values in canonical order.
    #[must_use]
    pub fn as_array(&self) -> [f64; Self::COUNT] {
        [
            self.inner_bore,
            self.outer_bore,
            self.bore_turning_point_x,
            self.bore_turning_point_y,
            self.pin_radial_thickness,
            self.breeder_inner_length,
            self.breeder_outer_length,
            self.outer_turning_point_x,
            self.outer_turning_point_y,
            self.outer_length,
        ]
    }

    /// Returns every feasibility rule this parameter set breaks, in rule order.
    #[must_use]
    pub fn violations(&self) -> Vec<Constraint> {
        Constraint::ALL
            .into_iter()
            .filter(|c| !c.holds(self))
            .collect()
    }

    /// Returns `true` if all feasibility rules hold.
    ///
    /// Equality on any rule is accepted.
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        Constraint::ALL.iter().all(|c| c.holds(self))
    }

    /// Like [`is_feasible`](Self::is_feasible), but reports the failing rules.
    ///
    /// # Errors
    ///
    /// Returns [`FeasibilityError::Rejected`] listing every broken rule.
    pub fn check(&self) -> Result<()> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(FeasibilityError::Rejected { violations }.into())
        }
    }
}

/// A geometric feasibility rule on [`DesignParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// `inner_bore ≤ outer_bore`
    BoreOrder,
    /// `inner_bore + pin_radial_thickness ≤ outer_bore`
    WallFitsBore,
    /// `breeder_inner_length ≤ outer_length`
    BreederInnerFits,
    /// `breeder_outer_length ≤ outer_length`
    BreederOuterFits,
    /// `bore_turning_point_x ≤ inner_bore + pin_radial_thickness`
    TurningPointInsideWall,
    /// `bore_turning_point_x ≥ inner_bore`
    TurningPointOutsideBore,
    /// `bore_turning_point_y ≥ 0`
    TurningPointAboveBase,
}

impl Constraint {
    /// All rules, in evaluation order.
    pub const ALL: [Constraint; 7] = [
        Self::BoreOrder,
        Self::WallFitsBore,
        Self::BreederInnerFits,
        Self::BreederOuterFits,
        Self::TurningPointInsideWall,
        Self::TurningPointOutsideBore,
        Self::TurningPointAboveBase,
    ];

    /// Evaluates the rule. NaN inputs never satisfy a rule.
    #[must_use]
    pub fn holds(self, p: &DesignParameters) -> bool {
        match self {
            Self::BoreOrder => p.inner_bore <= p.outer_bore,
            Self::WallFitsBore => p.inner_bore + p.pin_radial_thickness <= p.outer_bore,
            Self::BreederInnerFits => p.breeder_inner_length <= p.outer_length,
            Self::BreederOuterFits => p.breeder_outer_length <= p.outer_length,
            Self::TurningPointInsideWall => {
                p.bore_turning_point_x <= p.inner_bore + p.pin_radial_thickness
            }
            Self::TurningPointOutsideBore => p.bore_turning_point_x >= p.inner_bore,
            Self::TurningPointAboveBase => p.bore_turning_point_y >= 0.0,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = match self {
            Self::BoreOrder => "inner_bore <= outer_bore",
            Self::WallFitsBore => "inner_bore + pin_radial_thickness <= outer_bore",
            Self::BreederInnerFits => "breeder_inner_length <= outer_length",
            Self::BreederOuterFits => "breeder_outer_length <= outer_length",
            Self::TurningPointInsideWall => {
                "bore_turning_point_x <= inner_bore + pin_radial_thickness"
            }
            Self::TurningPointOutsideBore => "bore_turning_point_x >= inner_bore",
            Self::TurningPointAboveBase => "bore_turning_point_y >= 0",
        };
        f.write_str(rule)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PinError;

    #[test]
    fn reference_set_is_feasible() {
        let p = DesignParameters::default();
        assert!(p.is_feasible());
        assert!(p.violations().is_empty());
        assert!(p.check().is_ok());
    }

    #[test]
    fn inner_bore_beyond_outer_bore_is_rejected() {
        let p = DesignParameters {
            inner_bore: 0.6,
            ..DesignParameters::default()
        };
        assert!(!p.is_feasible());
        let v = p.violations();
        assert!(v.contains(&Constraint::BoreOrder));
        assert!(v.contains(&Constraint::WallFitsBore));
    }

    #[test]
    fn each_rule_rejects_on_its_own() {
        let base = DesignParameters::default();
        let cases = [
            (
                Constraint::WallFitsBore,
                DesignParameters {
                    pin_radial_thickness: 0.46,
                    ..base
                },
            ),
            (
                Constraint::BreederInnerFits,
                DesignParameters {
                    breeder_inner_length: 0.95,
                    ..base
                },
            ),
            (
                Constraint::BreederOuterFits,
                DesignParameters {
                    breeder_outer_length: 0.95,
                    ..base
                },
            ),
            (
                Constraint::TurningPointInsideWall,
                DesignParameters {
                    bore_turning_point_x: 0.36,
                    ..base
                },
            ),
            (
                Constraint::TurningPointOutsideBore,
                DesignParameters {
                    bore_turning_point_x: 0.04,
                    ..base
                },
            ),
            (
                Constraint::TurningPointAboveBase,
                DesignParameters {
                    bore_turning_point_y: -0.01,
                    ..base
                },
            ),
        ];
        for (rule, p) in cases {
            assert!(!p.is_feasible(), "{rule} should reject");
            assert_eq!(p.violations(), vec![rule]);
        }
    }

    #[test]
    fn equality_boundaries_are_accepted() {
        let p = DesignParameters {
            inner_bore: 0.5,
            outer_bore: 0.5,
            pin_radial_thickness: 0.0,
            bore_turning_point_x: 0.5,
            bore_turning_point_y: 0.0,
            breeder_inner_length: 0.9,
            breeder_outer_length: 0.9,
            ..DesignParameters::default()
        };
        assert!(p.is_feasible(), "violations: {:?}", p.violations());
    }

    #[test]
    fn nan_is_never_feasible() {
        let p = DesignParameters {
            bore_turning_point_y: f64::NAN,
            ..DesignParameters::default()
        };
        assert!(!p.is_feasible());
    }

    #[test]
    fn check_lists_rules_in_message() {
        let p = DesignParameters {
            bore_turning_point_y: -1.0,
            ..DesignParameters::default()
        };
        let err = p.check().unwrap_err();
        assert!(matches!(err, PinError::Feasibility(_)));
        assert!(err.to_string().contains("bore_turning_point_y >= 0"));
    }

    #[test]
    fn array_order_matches_names() {
        let p = DesignParameters::default();
        let a = p.as_array();
        assert_eq!(DesignParameters::NAMES[3], "bore_turning_point_y");
        assert!((a[3] - p.bore_turning_point_y).abs() < f64::EPSILON);
        assert!((a[9] - p.outer_length).abs() < f64::EPSILON);
    }
}
