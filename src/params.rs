//! Fitting parameters.

use crate::curve::CurveType;
use crate::errors::FitError;
use crate::float_types::{INFINITY, Real};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Knobs of the primitive fitting stage.
///
/// Costs are only compared against infinity here: a type with infinite cost
/// is not needed (JSON `null` stands for infinity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Length-normalized error budget; a candidate is kept while
    /// `error / span_length <= error_threshold²`.
    pub error_threshold: Real,
    #[serde(with = "cost")]
    pub line_cost: Real,
    #[serde(with = "cost")]
    pub arc_cost: Real,
    #[serde(with = "cost")]
    pub clothoid_cost: Real,
    /// Any positive value turns on inflection accounting.
    pub inflection_cost: Real,
    /// Damping of the single refinement step.
    pub curve_adjust_damping: Real,
    /// Registered name of the primitive fitting algorithm.
    pub primitive_fitting: String,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            error_threshold: 1.0,
            line_cost: 1.0,
            arc_cost: 2.0,
            clothoid_cost: 3.0,
            inflection_cost: 5.0,
            curve_adjust_damping: 0.5,
            primitive_fitting: "Adjust".to_string(),
        }
    }
}

impl Parameters {
    pub const fn cost(&self, ty: CurveType) -> Real {
        match ty {
            CurveType::Line => self.line_cost,
            CurveType::Arc => self.arc_cost,
            CurveType::Clothoid => self.clothoid_cost,
        }
    }

    pub fn set_cost(&mut self, ty: CurveType, cost: Real) {
        match ty {
            CurveType::Line => self.line_cost = cost,
            CurveType::Arc => self.arc_cost = cost,
            CurveType::Clothoid => self.clothoid_cost = cost,
        }
    }

    /// Whether primitives of this type are wanted at all.
    pub fn needs(&self, ty: CurveType) -> bool {
        self.cost(ty) < INFINITY
    }

    pub fn inflection_accounting(&self) -> bool {
        self.inflection_cost > 0.0
    }

    pub fn validate(&self) -> Result<(), FitError> {
        if !self.error_threshold.is_finite() || self.error_threshold <= 0.0 {
            return Err(FitError::InvalidParameter {
                name: "error_threshold",
                value: self.error_threshold,
                reason: "must be finite and positive",
            });
        }
        for ty in CurveType::ALL {
            let value = self.cost(ty);
            if value.is_nan() || value < 0.0 {
                return Err(FitError::InvalidParameter {
                    name: match ty {
                        CurveType::Line => "line_cost",
                        CurveType::Arc => "arc_cost",
                        CurveType::Clothoid => "clothoid_cost",
                    },
                    value,
                    reason: "must be non-negative",
                });
            }
        }
        if self.inflection_cost.is_nan() {
            return Err(FitError::InvalidParameter {
                name: "inflection_cost",
                value: self.inflection_cost,
                reason: "must be a number",
            });
        }
        if !self.curve_adjust_damping.is_finite() || self.curve_adjust_damping < 0.0 {
            return Err(FitError::InvalidParameter {
                name: "curve_adjust_damping",
                value: self.curve_adjust_damping,
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, FitError> {
        let params: Parameters = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: &Path) -> Result<Self, FitError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn to_json_string(&self) -> Result<String, FitError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Costs serialize as numbers, with `null` standing for infinity.
mod cost {
    use crate::float_types::{INFINITY, Real};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Real, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Real, D::Error> {
        Ok(Option::<Real>::deserialize(deserializer)?.unwrap_or(INFINITY))
    }
}
