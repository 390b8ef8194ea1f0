//! Annuities-certain and perpetuities
//!
//! Level annuities under a level compound rate are valued with the
//! standard closed forms; anything else falls back to direct valuation of
//! the underlying payment stream.

use serde::{Deserialize, Serialize};

use crate::error::TvmError;
use crate::growth::{Accumulation, Growth};
use crate::payments::Payments;

/// Spacing tolerance when inferring the period from an explicit schedule
const INTERVAL_TOLERANCE: f64 = 1e-7;

/// Whether payments fall at the end or the beginning of each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timing {
    /// Payments at the end of each period (annuity-immediate)
    Immediate,
    /// Payments at the beginning of each period (annuity-due)
    Due,
}

/// A series of equally spaced payments, possibly perpetual
#[derive(Clone)]
pub struct Annuity {
    payments: Payments,
    growth: Accumulation,
    period: f64,
    term: f64,
    amount: f64,
    timing: Timing,
    is_level: bool,
}

impl Annuity {
    /// A level annuity: `amount` every `period` years until `term`
    pub fn level(
        gr: impl Into<Growth>,
        period: f64,
        term: f64,
        amount: f64,
        timing: Timing,
    ) -> Result<Self, TvmError> {
        if period <= 0.0 || !period.is_finite() {
            return Err(TvmError::InvalidPeriod(period));
        }
        if !term.is_finite() {
            return Err(TvmError::InfiniteTerm);
        }
        let growth = Accumulation::new(gr);
        let offset = match timing {
            Timing::Immediate => 1.0,
            Timing::Due => 0.0,
        };

        let n = (term / period).ceil().max(0.0) as usize;
        let amounts = vec![amount; n];
        let times: Vec<f64> = (0..n).map(|x| period * (x as f64 + offset)).collect();

        let payments = Payments::new(amounts, times, Some(growth.clone()))?;
        Ok(Self {
            payments,
            growth,
            period,
            term,
            amount,
            timing,
            is_level: true,
        })
    }

    /// A perpetuity: `amount` every `period` years forever
    pub fn perpetuity(
        gr: impl Into<Growth>,
        period: f64,
        amount: f64,
        timing: Timing,
    ) -> Result<Self, TvmError> {
        if period <= 0.0 || !period.is_finite() {
            return Err(TvmError::InvalidPeriod(period));
        }
        let growth = Accumulation::new(gr);
        let payments = Payments::new(Vec::new(), Vec::new(), Some(growth.clone()))?;
        Ok(Self {
            payments,
            growth,
            period,
            term: f64::INFINITY,
            amount,
            timing,
            is_level: true,
        })
    }

    /// Build an annuity from an explicit schedule
    ///
    /// Times must be evenly spaced; the timing is inferred from whether a
    /// payment falls at time 0.
    pub fn from_schedule(
        gr: impl Into<Growth>,
        amounts: Vec<f64>,
        times: Vec<f64>,
    ) -> Result<Self, TvmError> {
        let growth = Accumulation::new(gr);

        let mut schedule: Vec<(f64, f64)> = times.into_iter().zip(amounts).collect();
        schedule.sort_by(|a, b| a.0.total_cmp(&b.0));
        let times: Vec<f64> = schedule.iter().map(|(t, _)| *t).collect();
        let amounts: Vec<f64> = schedule.iter().map(|(_, a)| *a).collect();

        if times.len() < 2 {
            return Err(TvmError::NonLevelIntervals);
        }
        let period = times[1] - times[0];
        if period <= INTERVAL_TOLERANCE {
            return Err(TvmError::InvalidPeriod(period));
        }
        let level_spacing = times
            .windows(2)
            .all(|w| ((w[1] - w[0]) - period).abs() < INTERVAL_TOLERANCE);
        if !level_spacing {
            return Err(TvmError::NonLevelIntervals);
        }

        let first = times[0];
        let last = times[times.len() - 1];
        let (timing, term) = if first == 0.0 {
            (Timing::Due, last + period)
        } else {
            (Timing::Immediate, last)
        };

        let is_level = amounts.windows(2).all(|w| w[0] == w[1]);
        let amount = amounts[0];

        let payments = Payments::new(amounts, times, Some(growth.clone()))?;
        Ok(Self {
            payments,
            growth,
            period,
            term,
            amount,
            timing,
            is_level,
        })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn term(&self) -> f64 {
        self.term
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn is_perpetuity(&self) -> bool {
        self.term.is_infinite()
    }

    /// The underlying payment stream (empty for a perpetuity)
    pub fn payments(&self) -> &Payments {
        &self.payments
    }

    /// Present value at time 0
    pub fn pv(&self) -> Result<f64, TvmError> {
        if !self.is_perpetuity() && self.payments.is_empty() {
            return Ok(0.0);
        }

        let per_period = self.growth.val(self.period)? - 1.0;

        if self.is_perpetuity() {
            if !self.growth.is_level() {
                return Err(TvmError::NonLevelPerpetuity);
            }
            let mut pv = self.amount / per_period;
            if self.timing == Timing::Due {
                pv *= self.growth.val(self.period)?;
            }
            return Ok(pv);
        }

        if self.growth.is_level() && self.is_level {
            let mut pv = self.amount * (1.0 - self.growth.discount_func(self.term)?) / per_period;
            if self.timing == Timing::Due {
                pv *= self.growth.val(self.period)?;
            }
            Ok(pv)
        } else {
            self.payments.npv()
        }
    }

    /// Accumulated value at the end of the term
    pub fn sv(&self) -> Result<f64, TvmError> {
        if self.is_perpetuity() {
            return Err(TvmError::Perpetuity);
        }
        if self.payments.is_empty() {
            return Ok(0.0);
        }

        if self.growth.is_level() && self.is_level {
            let per_period = self.growth.val(self.period)? - 1.0;
            let mut sv = self.amount * (self.growth.val(self.term)? - 1.0) / per_period;
            if self.timing == Timing::Due {
                sv *= self.growth.val(self.period)?;
            }
            Ok(sv)
        } else {
            self.payments.eq_val(self.term)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::Rate;
    use approx::assert_relative_eq;

    #[test]
    fn test_annuity_immediate_pv() {
        // a-angle-5 at 5%: (1 - 1.05^-5) / 0.05
        let ann = Annuity::level(Rate::effective(0.05, 1.0), 1.0, 5.0, 1.0, Timing::Immediate)
            .unwrap();
        let expected = (1.0 - 1.05f64.powi(-5)) / 0.05;
        assert_relative_eq!(ann.pv().unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_annuity_due_pv() {
        // a-due-angle-5 = a-angle-5 * (1 + i)
        let imm = Annuity::level(Rate::effective(0.05, 1.0), 1.0, 5.0, 1.0, Timing::Immediate)
            .unwrap();
        let due = Annuity::level(Rate::effective(0.05, 1.0), 1.0, 5.0, 1.0, Timing::Due).unwrap();
        assert_relative_eq!(
            due.pv().unwrap(),
            imm.pv().unwrap() * 1.05,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_closed_form_matches_direct_npv() {
        let ann = Annuity::level(
            Rate::effective(0.04, 1.0),
            0.5,
            10.0,
            250.0,
            Timing::Immediate,
        )
        .unwrap();
        let closed = ann.pv().unwrap();
        let direct = ann.payments().npv().unwrap();
        assert_relative_eq!(closed, direct, epsilon = 1e-6);
    }

    #[test]
    fn test_annuity_sv() {
        // s-angle-5 at 5%: (1.05^5 - 1) / 0.05
        let ann = Annuity::level(Rate::effective(0.05, 1.0), 1.0, 5.0, 1.0, Timing::Immediate)
            .unwrap();
        let expected = (1.05f64.powi(5) - 1.0) / 0.05;
        assert_relative_eq!(ann.sv().unwrap(), expected, epsilon = 1e-9);

        // pv accumulated to term equals sv
        assert_relative_eq!(
            ann.sv().unwrap(),
            ann.pv().unwrap() * 1.05f64.powi(5),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_perpetuity() {
        // perpetuity-immediate at 5%: 1 / 0.05 = 20
        let perp =
            Annuity::perpetuity(Rate::effective(0.05, 1.0), 1.0, 1.0, Timing::Immediate).unwrap();
        assert_relative_eq!(perp.pv().unwrap(), 20.0, epsilon = 1e-9);
        assert!(perp.sv().is_err());

        // perpetuity-due is one period of interest richer
        let due = Annuity::perpetuity(Rate::effective(0.05, 1.0), 1.0, 1.0, Timing::Due).unwrap();
        assert_relative_eq!(due.pv().unwrap(), 21.0, epsilon = 1e-9);
    }

    #[test]
    fn test_from_schedule_infers_timing() {
        let gr = Rate::effective(0.05, 1.0);

        let imm =
            Annuity::from_schedule(gr, vec![100.0, 100.0, 100.0], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(imm.timing(), Timing::Immediate);
        assert_relative_eq!(imm.term(), 3.0, epsilon = 1e-12);

        let due =
            Annuity::from_schedule(gr, vec![100.0, 100.0, 100.0], vec![0.0, 1.0, 2.0]).unwrap();
        assert_eq!(due.timing(), Timing::Due);
        assert_relative_eq!(due.term(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_level_rejects_bad_period_and_term() {
        let gr = Rate::effective(0.05, 1.0);

        let zero = Annuity::level(gr, 0.0, 5.0, 100.0, Timing::Immediate);
        assert!(matches!(zero, Err(TvmError::InvalidPeriod(_))));

        let negative = Annuity::level(gr, -1.0, 5.0, 100.0, Timing::Immediate);
        assert!(negative.is_err());

        let infinite = Annuity::level(gr, 1.0, f64::INFINITY, 100.0, Timing::Immediate);
        assert!(matches!(infinite, Err(TvmError::InfiniteTerm)));

        let perp = Annuity::perpetuity(gr, 0.0, 100.0, Timing::Immediate);
        assert!(matches!(perp, Err(TvmError::InvalidPeriod(_))));
    }

    #[test]
    fn test_from_schedule_rejects_duplicate_times() {
        let gr = Rate::effective(0.05, 1.0);
        let res = Annuity::from_schedule(gr, vec![100.0, 100.0], vec![1.0, 1.0]);
        assert!(matches!(res, Err(TvmError::InvalidPeriod(_))));
    }

    #[test]
    fn test_from_schedule_rejects_uneven_spacing() {
        let gr = Rate::effective(0.05, 1.0);
        let res = Annuity::from_schedule(gr, vec![100.0, 100.0, 100.0], vec![1.0, 2.0, 4.0]);
        assert!(matches!(res, Err(TvmError::NonLevelIntervals)));
    }

    #[test]
    fn test_non_level_amounts_use_direct_valuation() {
        let gr = Rate::effective(0.05, 1.0);
        let ann = Annuity::from_schedule(gr, vec![100.0, 200.0], vec![1.0, 2.0]).unwrap();
        let expected = 100.0 / 1.05 + 200.0 / (1.05f64 * 1.05);
        assert_relative_eq!(ann.pv().unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_quadratic_growth_falls_back_to_npv() {
        let gr = Growth::from_accumulation_fn(|t| 0.05 * t * t + 0.05 * t + 1.0);
        let ann = Annuity::level(gr, 1.0, 3.0, 100.0, Timing::Immediate).unwrap();
        let a = |t: f64| 0.05 * t * t + 0.05 * t + 1.0;
        let expected = 100.0 / a(1.0) + 100.0 / a(2.0) + 100.0 / a(3.0);
        assert_relative_eq!(ann.pv().unwrap(), expected, epsilon = 1e-9);
    }
}
