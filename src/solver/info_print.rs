use crate::algebra::*;
use crate::io::PrintTarget;
use crate::solver::cones::{CompositeCone, SupportedCone};
use crate::solver::info::SolveInfo;
use crate::solver::program::ProgramData;
use crate::solver::{HipmSettings, SolverError};
use itertools::Itertools;
use std::io::Write;
use std::time::Duration;

macro_rules! expformat {
    ($fmt:expr,$val:expr) => {
        if $val.is_finite() {
            _exp_str_reformat(format!($fmt, $val))
        } else {
            format!($fmt, $val)
        }
    };
}

impl<T> SolveInfo<T>
where
    T: FloatT,
{
    pub(crate) fn print_configuration(
        &self,
        out: &mut PrintTarget,
        settings: &HipmSettings<T>,
        data: &ProgramData<'_, T>,
        cones: &CompositeCone<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        writeln!(out, "hipm v{}  -  homogeneous interior point solver", crate::VERSION)?;
        writeln!(out, "\nproblem:")?;
        writeln!(out, "  variables     = {}", data.A.n)?;
        writeln!(out, "  constraints   = {}", data.A.m)?;
        writeln!(out, "  nnz(A)        = {}", data.A.nnz())?;
        writeln!(out, "  cones (total) = {}", cones.len())?;
        _print_conedims(out, cones)?;
        writeln!(out)?;

        _print_settings(out, settings)?;
        Ok(())
    }

    pub(crate) fn print_status_header(
        &self,
        out: &mut PrintTarget,
        settings: &HipmSettings<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        write!(out, "iter    ")?;
        write!(out, "pcost        ")?;
        write!(out, "sig       ")?;
        write!(out, "pres      ")?;
        write!(out, "dres      ")?;
        write!(out, "gap       ")?;
        write!(out, " τ        ")?;
        write!(out, " κ        ")?;
        write!(out, " μ        ")?;
        write!(out, "step      ")?;
        writeln!(out)?;
        writeln!(
            out,
            "--------------------------------------------------------------------------------------------------"
        )?;
        out.flush()?;
        Ok(())
    }

    pub(crate) fn print_status(
        &self,
        out: &mut PrintTarget,
        settings: &HipmSettings<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        let rec = &self.record;
        write!(out, "{:>3}  ", rec.iteration)?;
        write!(out, "{}  ", expformat!("{:+8.4e}", rec.objective))?;
        write!(out, "{}  ", expformat!("{:6.2e}", rec.significance))?;
        write!(out, "{}  ", expformat!("{:6.2e}", rec.primal_infeasibility))?;
        write!(out, "{}  ", expformat!("{:6.2e}", rec.dual_infeasibility))?;
        write!(out, "{}  ", expformat!("{:6.2e}", rec.gap))?;
        write!(out, "{}  ", expformat!("{:6.2e}", rec.tau))?;
        write!(out, "{}  ", expformat!("{:6.2e}", rec.kappa))?;
        write!(out, "{}  ", expformat!("{:6.2e}", rec.mu))?;

        if rec.iteration > 0 {
            write!(out, "{}  ", expformat!("{:>.2e}", rec.step_length))?;
        } else {
            write!(out, " ------   ")?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub(crate) fn print_footer(
        &self,
        out: &mut PrintTarget,
        settings: &HipmSettings<T>,
        error: Option<&SolverError>,
        solve_time: f64,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return Ok(());
        }

        writeln!(
            out,
            "--------------------------------------------------------------------------------------------------"
        )?;
        match error {
            Some(e) => writeln!(out, "Terminated with error: {e}")?,
            None => writeln!(out, "Terminated with status = {}", self.status)?,
        }
        writeln!(out, "solve time = {:?}", Duration::from_secs_f64(solve_time))?;
        out.flush()?;
        Ok(())
    }
}

fn _print_settings<T: FloatT>(
    out: &mut PrintTarget,
    settings: &HipmSettings<T>,
) -> std::io::Result<()> {
    let set = settings;

    writeln!(out, "settings:")?;
    writeln!(
        out,
        "  linear algebra: Schur complement / sparse LDLᵀ, precision: {} bit",
        _get_precision_string::<T>()
    )?;

    let time_lim_str = {
        if set.time_limit.is_infinite() {
            "Inf".to_string()
        } else {
            format!("{:?}", set.time_limit)
        }
    };
    writeln!(
        out,
        "  max iter = {}, time limit = {},  max step = {:.3}",
        set.max_iter, time_lim_str, set.max_step_fraction
    )?;

    writeln!(
        out,
        "  infeas = {:.1e}, sig = {:.1e}, gap = {:.1e},",
        set.infeasibility_threshold, set.significance_threshold, set.duality_gap_threshold
    )?;

    writeln!(
        out,
        "  τ = {:.1e}, κ = {:.1e}, μ = {:.1e}",
        set.tau_threshold, set.kappa_threshold, set.mu_threshold
    )?;

    writeln!(
        out,
        "  static reg : ϵ1 = {:.1e}, ϵ2 = {:.1e}",
        set.static_regularization_constant, set.static_regularization_proportional,
    )?;

    writeln!(
        out,
        "  dynamic reg: {}, ϵ = {:.1e}, δ = {:.1e}",
        _bool_on_off(set.dynamic_regularization_enable),
        set.dynamic_regularization_eps,
        set.dynamic_regularization_delta
    )?;

    writeln!(
        out,
        "  iter refine: {}, reltol = {:.1e}, abstol = {:.1e},",
        _bool_on_off(set.iterative_refinement_enable),
        set.iterative_refinement_reltol,
        set.iterative_refinement_abstol
    )?;

    writeln!(
        out,
        "               max iter = {}, stop ratio = {:.1}",
        set.iterative_refinement_max_iter, set.iterative_refinement_stop_ratio
    )?;

    if set.predictor_corrector {
        writeln!(out, "  step rule  : predictor-corrector")?;
    } else {
        writeln!(out, "  step rule  : fixed σ = {:.2}", set.sigma_fixed)?;
    }

    writeln!(out)?;
    Ok(())
}

fn _bool_on_off(v: bool) -> &'static str {
    if v {
        "on"
    } else {
        "off"
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (std::mem::size_of::<T>() * 8).to_string()
}

fn _print_conedims<T: FloatT>(out: &mut PrintTarget, cones: &CompositeCone<T>) -> std::io::Result<()> {
    const MAXLIST: usize = 5;

    let (orthants, socs): (Vec<_>, Vec<_>) = cones
        .iter()
        .partition(|(cone, _)| matches!(cone, SupportedCone::NonnegativeCone(_)));

    let orthant_dim: usize = orthants.iter().map(|(_, rng)| rng.len()).sum();
    if orthant_dim > 0 {
        writeln!(out, "    : {:>11} = 1,  numel = {orthant_dim}", "Nonnegative")?;
    }

    let dims: Vec<usize> = socs.iter().map(|(_, rng)| rng.len()).collect();
    let numel = match dims.as_slice() {
        [] => return Ok(()),
        [d] => d.to_string(),
        ds if ds.len() <= MAXLIST => format!("({})", ds.iter().join(",")),
        ds => format!(
            "({},...,{})",
            ds[..MAXLIST - 1].iter().join(","),
            ds[ds.len() - 1]
        ),
    };
    writeln!(out, "    : {:>11} = {},  numel = {numel}", "SecondOrder", dims.len())
}

// LowerExp writes `1.5e-3`; the table wants a signed two digit
// exponent, `1.5e-03`
fn _exp_str_reformat(s: String) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_str_reformat() {
        assert_eq!(_exp_str_reformat(format!("{:6.2e}", 1.5e-3)), "1.50e-03");
        assert_eq!(_exp_str_reformat(format!("{:6.2e}", 1.5e3)), "1.50e+03");
        assert_eq!(_exp_str_reformat(format!("{:6.2e}", 1.5e-12)), "1.50e-12");
        assert_eq!(_exp_str_reformat(format!("{:6.2e}", 2.5e100)), "2.50e+100");
        assert_eq!(_exp_str_reformat(format!("{:+8.4e}", -2.0)), "-2.0000e+00");
        assert_eq!(expformat!("{:6.2e}", f64::INFINITY), "   inf");
    }
}
