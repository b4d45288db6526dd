use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Solver settings, constructed through [`HipmSettingsBuilder`].
///
/// Defaults are applied to every field not set on the builder:
///
/// ```
/// use hipm::solver::*;
///
/// let settings = HipmSettingsBuilder::<f64>::default()
///     .max_iter(50)
///     .verbose(true)
///     .build()
///     .unwrap();
/// assert_eq!(settings.tau_threshold, 1e-7);
/// ```
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HipmSettings<T: FloatT> {
    ///maximum number of iterations
    #[builder(default = "200")]
    pub max_iter: u32,

    ///maximum run time (seconds)
    #[builder(default = "f64::INFINITY")]
    pub time_limit: f64,

    ///verbose printing
    #[builder(default = "false")]
    pub verbose: bool,

    ///fraction of the maximum feasible step taken by the combined step
    #[builder(default = "T::lit(0.99)")]
    pub max_step_fraction: T,

    ///steps shorter than this stop the solve
    #[builder(default = "T::lit(1e-8)")]
    pub min_step_length: T,

    ///normalized homogeneous gap required for an infeasibility certificate
    #[builder(default = "T::lit(0.01)")]
    pub duality_gap_threshold: T,

    ///normalized primal and dual feasibility tolerance
    #[builder(default = "T::lit(1e-7)")]
    pub infeasibility_threshold: T,

    ///significance (relative objective gap) tolerance
    #[builder(default = "T::lit(1e-7)")]
    pub significance_threshold: T,

    ///τ is considered vanished once τ ≤ tau_threshold⋅max(1,κ)
    #[builder(default = "T::lit(1e-7)")]
    pub tau_threshold: T,

    ///minimum κ accepted as an infeasibility certificate
    #[builder(default = "T::lit(1e-4)")]
    pub kappa_threshold: T,

    ///μ is considered vanished once μ ≤ mu_threshold⋅μ₀
    #[builder(default = "T::lit(1e-7)")]
    pub mu_threshold: T,

    ///constant static regularization added to the Schur complement diagonal
    #[builder(default = "T::lit(1e-12)")]
    pub static_regularization_constant: T,

    ///static regularization proportional to the largest Schur diagonal
    #[builder(default = "T::epsilon()*T::epsilon()")]
    pub static_regularization_proportional: T,

    ///replace tiny pivots during factorisation
    #[builder(default = "true")]
    pub dynamic_regularization_enable: bool,

    ///pivot threshold for dynamic regularization
    #[builder(default = "T::lit(1e-13)")]
    pub dynamic_regularization_eps: T,

    ///replacement value for tiny pivots
    #[builder(default = "T::lit(2e-7)")]
    pub dynamic_regularization_delta: T,

    ///refine Schur complement solves against the unregularized matrix
    #[builder(default = "true")]
    pub iterative_refinement_enable: bool,

    ///iterative refinement relative tolerance
    #[builder(default = "T::lit(1e-13)")]
    pub iterative_refinement_reltol: T,

    ///iterative refinement absolute tolerance
    #[builder(default = "T::lit(1e-12)")]
    pub iterative_refinement_abstol: T,

    ///iterative refinement maximum iterations
    #[builder(default = "10")]
    pub iterative_refinement_max_iter: u32,

    ///iterative refinement stalling tolerance
    #[builder(default = "T::lit(5.0)")]
    pub iterative_refinement_stop_ratio: T,

    ///Mehrotra predictor-corrector steps.  A single step centred
    ///with `sigma_fixed` is taken otherwise
    #[builder(default = "true")]
    pub predictor_corrector: bool,

    ///centring parameter used without the predictor-corrector
    #[builder(default = "T::lit(0.1)")]
    pub sigma_fixed: T,
}

impl<T> Default for HipmSettings<T>
where
    T: FloatT,
{
    fn default() -> HipmSettings<T> {
        HipmSettingsBuilder::<T>::default().build().unwrap()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// A field holds a value outside its admissible range
    #[error("Bad value for field {0}")]
    BadFieldValue(&'static str),
}

impl<T> HipmSettings<T>
where
    T: FloatT,
{
    /// Checks that every numerical field lies in its admissible range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_time_limit(Some(self.time_limit))?;
        validate_fraction("max_step_fraction", Some(self.max_step_fraction), true)?;
        validate_fraction("sigma_fixed", Some(self.sigma_fixed), false)?;

        let positive = [
            ("min_step_length", self.min_step_length),
            ("duality_gap_threshold", self.duality_gap_threshold),
            ("infeasibility_threshold", self.infeasibility_threshold),
            ("significance_threshold", self.significance_threshold),
            ("tau_threshold", self.tau_threshold),
            ("kappa_threshold", self.kappa_threshold),
            ("mu_threshold", self.mu_threshold),
            ("dynamic_regularization_eps", self.dynamic_regularization_eps),
            ("dynamic_regularization_delta", self.dynamic_regularization_delta),
            ("iterative_refinement_stop_ratio", self.iterative_refinement_stop_ratio),
        ];
        for (name, value) in positive {
            validate_positive(name, Some(value))?;
        }

        let nonnegative = [
            ("static_regularization_constant", self.static_regularization_constant),
            ("static_regularization_proportional", self.static_regularization_proportional),
            ("iterative_refinement_reltol", self.iterative_refinement_reltol),
            ("iterative_refinement_abstol", self.iterative_refinement_abstol),
        ];
        for (name, value) in nonnegative {
            validate_nonnegative(name, Some(value))?;
        }

        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for HipmSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        HipmSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> HipmSettingsBuilder<T>
where
    T: FloatT,
{
    /// check the fields that have been set.  Defaults are always valid
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_time_limit(self.time_limit)?;
        validate_fraction("max_step_fraction", self.max_step_fraction, true)?;
        validate_fraction("sigma_fixed", self.sigma_fixed, false)?;

        let positive = [
            ("min_step_length", self.min_step_length),
            ("duality_gap_threshold", self.duality_gap_threshold),
            ("infeasibility_threshold", self.infeasibility_threshold),
            ("significance_threshold", self.significance_threshold),
            ("tau_threshold", self.tau_threshold),
            ("kappa_threshold", self.kappa_threshold),
            ("mu_threshold", self.mu_threshold),
            ("dynamic_regularization_eps", self.dynamic_regularization_eps),
            ("dynamic_regularization_delta", self.dynamic_regularization_delta),
            ("iterative_refinement_stop_ratio", self.iterative_refinement_stop_ratio),
        ];
        for (name, value) in positive {
            validate_positive(name, value)?;
        }

        let nonnegative = [
            ("static_regularization_constant", self.static_regularization_constant),
            ("static_regularization_proportional", self.static_regularization_proportional),
            ("iterative_refinement_reltol", self.iterative_refinement_reltol),
            ("iterative_refinement_abstol", self.iterative_refinement_abstol),
        ];
        for (name, value) in nonnegative {
            validate_nonnegative(name, value)?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here.  Unset fields pass
// ---------------------------------------------------------

fn validate_time_limit(time_limit: Option<f64>) -> Result<(), SettingsError> {
    match time_limit {
        Some(t) if !(t >= 0.0) => Err(SettingsError::BadFieldValue("time_limit")),
        _ => Ok(()),
    }
}

// (0,1], or (0,1) when the upper end is excluded
fn validate_fraction<T: FloatT>(
    name: &'static str,
    value: Option<T>,
    closed: bool,
) -> Result<(), SettingsError> {
    match value {
        Some(v) if !(v > T::zero() && (v < T::one() || (closed && v == T::one()))) => {
            Err(SettingsError::BadFieldValue(name))
        }
        _ => Ok(()),
    }
}

fn validate_positive<T: FloatT>(name: &'static str, value: Option<T>) -> Result<(), SettingsError> {
    match value {
        Some(v) if !(v.is_finite() && v > T::zero()) => Err(SettingsError::BadFieldValue(name)),
        _ => Ok(()),
    }
}

fn validate_nonnegative<T: FloatT>(
    name: &'static str,
    value: Option<T>,
) -> Result<(), SettingsError> {
    match value {
        Some(v) if !(v.is_finite() && v >= T::zero()) => Err(SettingsError::BadFieldValue(name)),
        _ => Ok(()),
    }
}
