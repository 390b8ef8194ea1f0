//! Missing-value solvers for simple and compound growth
//!
//! Each solver takes three of {present value, future value, rate, time}
//! and returns the fourth.

use crate::error::TvmError;
use crate::rate::Rate;

/// Solve the simple-interest relation `fv = pv * (1 + s * t)` for whichever
/// argument is `None`
///
/// The rate `s` is an annual simple interest rate; a solved rate comes back
/// as that same quantity.
pub fn simple_solver(
    pv: Option<f64>,
    fv: Option<f64>,
    s: Option<f64>,
    t: Option<f64>,
) -> Result<f64, TvmError> {
    let missing = [pv.is_none(), fv.is_none(), s.is_none(), t.is_none()]
        .iter()
        .filter(|&&m| m)
        .count();
    if missing != 1 {
        return Err(TvmError::Underdetermined);
    }

    let res = match (pv, fv, s, t) {
        (None, Some(fv), Some(s), Some(t)) => fv / (1.0 + t * s),
        (Some(pv), None, Some(s), Some(t)) => pv * (1.0 + t * s),
        (Some(pv), Some(fv), None, Some(t)) => (fv / pv - 1.0) / t,
        (Some(pv), Some(fv), Some(s), None) => (fv / pv - 1.0) / s,
        _ => unreachable!("exactly one argument is missing"),
    };
    Ok(res)
}

/// Solve the compound-growth relation `fv = pv * (1 + i)^t` for whichever
/// argument is `None`
///
/// The supplied rate may be quoted in any compound-family pattern; a solved
/// rate comes back as the annual effective rate.
pub fn compound_solver(
    pv: Option<f64>,
    fv: Option<f64>,
    gr: Option<Rate>,
    t: Option<f64>,
) -> Result<f64, TvmError> {
    let missing = [pv.is_none(), fv.is_none(), gr.is_none(), t.is_none()]
        .iter()
        .filter(|&&m| m)
        .count();
    if missing != 1 {
        return Err(TvmError::Underdetermined);
    }

    let i = match gr {
        Some(r) => Some(r.annual_effective()?),
        None => None,
    };

    let res = match (pv, fv, i, t) {
        (None, Some(fv), Some(i), Some(t)) => fv / (1.0 + i).powf(t),
        (Some(pv), None, Some(i), Some(t)) => pv * (1.0 + i).powf(t),
        (Some(pv), Some(fv), None, Some(t)) => (fv / pv).powf(1.0 / t) - 1.0,
        (Some(pv), Some(fv), Some(i), None) => (fv / pv).ln() / (1.0 + i).ln(),
        _ => unreachable!("exactly one argument is missing"),
    };
    Ok(res)
}

/// Principal needed so that a growth function `f` reaches `fv` at time `t`
pub fn k_solver<F>(f: F, fv: f64, t: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    fv / f(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_solver_each_unknown() {
        // 1000 at 5% simple for 2 years = 1100
        let fv = simple_solver(Some(1000.0), None, Some(0.05), Some(2.0)).unwrap();
        assert_relative_eq!(fv, 1100.0, epsilon = 1e-9);

        let pv = simple_solver(None, Some(1100.0), Some(0.05), Some(2.0)).unwrap();
        assert_relative_eq!(pv, 1000.0, epsilon = 1e-9);

        let s = simple_solver(Some(1000.0), Some(1100.0), None, Some(2.0)).unwrap();
        assert_relative_eq!(s, 0.05, epsilon = 1e-9);

        let t = simple_solver(Some(1000.0), Some(1100.0), Some(0.05), None).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_simple_solver_rejects_two_unknowns() {
        assert!(simple_solver(Some(1000.0), None, None, Some(2.0)).is_err());
        assert!(simple_solver(Some(1.0), Some(2.0), Some(0.05), Some(1.0)).is_err());
    }

    #[test]
    fn test_compound_solver_each_unknown() {
        let gr = Rate::effective(0.05, 1.0);

        let fv = compound_solver(Some(1000.0), None, Some(gr), Some(2.0)).unwrap();
        assert_relative_eq!(fv, 1000.0 * 1.05 * 1.05, epsilon = 1e-9);

        let pv = compound_solver(None, Some(1102.5), Some(gr), Some(2.0)).unwrap();
        assert_relative_eq!(pv, 1000.0, epsilon = 1e-9);

        let i = compound_solver(Some(1000.0), Some(1102.5), None, Some(2.0)).unwrap();
        assert_relative_eq!(i, 0.05, epsilon = 1e-9);

        let t = compound_solver(Some(1000.0), Some(1102.5), Some(gr), None).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compound_solver_nominal_rate() {
        // nominal rates are standardized before solving
        let gr = Rate::nominal(0.06, 12.0);
        let i = gr.annual_effective().unwrap();
        let fv = compound_solver(Some(100.0), None, Some(gr), Some(1.0)).unwrap();
        assert_relative_eq!(fv, 100.0 * (1.0 + i), epsilon = 1e-9);
    }

    #[test]
    fn test_k_solver() {
        let k = k_solver(|t| 0.05 * t * t + 0.05 * t + 1.0, 5000.0, 5.0);
        assert_relative_eq!(k, 2000.0, epsilon = 1e-9);
    }
}
