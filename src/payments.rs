//! Payment streams: net present value, equation of value, and yield rates
//!
//! A `Payments` is a set of cashflow amounts at (possibly irregular)
//! times, optionally tied to a growth object for valuation. The yield
//! solver uses Newton-Raphson with a bisection fallback.

use std::path::Path;

use log::warn;

use crate::error::TvmError;
use crate::growth::{Accumulation, Growth};
use crate::rate::Rate;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const RATE_FLOOR: f64 = -0.99;
const RATE_CEILING: f64 = 10.0;

/// A stream of payments at given times, with an optional growth object
#[derive(Clone)]
pub struct Payments {
    amounts: Vec<f64>,
    times: Vec<f64>,
    growth: Option<Accumulation>,
}

impl Payments {
    /// Create a payment stream
    ///
    /// Amounts and times must align one-to-one and times must be
    /// non-negative.
    pub fn new(
        amounts: Vec<f64>,
        times: Vec<f64>,
        gr: Option<impl Into<Growth>>,
    ) -> Result<Self, TvmError> {
        if amounts.len() != times.len() {
            return Err(TvmError::MismatchedSchedule {
                amounts: amounts.len(),
                times: times.len(),
            });
        }
        if times.iter().any(|&t| t < 0.0) {
            return Err(TvmError::NegativeTime);
        }
        Ok(Self {
            amounts,
            times,
            growth: gr.map(|g| Accumulation::new(g)),
        })
    }

    /// A stream with no growth object attached
    pub fn bare(amounts: Vec<f64>, times: Vec<f64>) -> Result<Self, TvmError> {
        Self::new(amounts, times, None::<Growth>)
    }

    /// Load a `(time, amount)` schedule from a CSV file with a header row
    pub fn from_csv(path: &Path) -> Result<Self, TvmError> {
        let file = std::fs::File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut amounts = Vec::new();
        let mut times = Vec::new();
        for result in reader.records() {
            let record = result?;
            let time: f64 = record[0].trim().parse()?;
            let amount: f64 = record[1].trim().parse()?;
            times.push(time);
            amounts.push(amount);
        }

        Self::bare(amounts, times)
    }

    pub fn amounts(&self) -> &[f64] {
        &self.amounts
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Attach or replace the growth object
    pub fn set_growth(&mut self, gr: impl Into<Growth>) {
        self.growth = Some(Accumulation::new(gr));
    }

    /// The attached growth object, if any
    pub fn growth(&self) -> Option<&Accumulation> {
        self.growth.as_ref()
    }

    /// Add payments to the stream
    pub fn append(&mut self, amounts: &[f64], times: &[f64]) -> Result<(), TvmError> {
        if amounts.len() != times.len() {
            return Err(TvmError::MismatchedSchedule {
                amounts: amounts.len(),
                times: times.len(),
            });
        }
        if times.iter().any(|&t| t < 0.0) {
            return Err(TvmError::NegativeTime);
        }
        self.amounts.extend_from_slice(amounts);
        self.times.extend_from_slice(times);
        Ok(())
    }

    /// Net present value of the stream under the attached growth object
    pub fn npv(&self) -> Result<f64, TvmError> {
        let acc = self.growth.as_ref().ok_or(TvmError::MissingGrowth)?;
        let mut npv = 0.0;
        for (&amount, &t) in self.amounts.iter().zip(&self.times) {
            npv += amount * acc.discount_func(t)?;
        }
        Ok(npv)
    }

    /// Equation-of-value balance: every payment carried to time `t`
    pub fn eq_val(&self, t: f64) -> Result<f64, TvmError> {
        let acc = self.growth.as_ref().ok_or(TvmError::MissingGrowth)?;
        let at = acc.val(t)?;
        let mut total = 0.0;
        for (&amount, &ti) in self.amounts.iter().zip(&self.times) {
            total += amount * at / acc.val(ti)?;
        }
        Ok(total)
    }

    /// Internal rate of return: the annual effective rate at which the
    /// stream's net present value is zero
    ///
    /// Newton-Raphson from a 5% initial guess, falling back to bisection
    /// when the derivative degenerates or the iteration stalls. Requires
    /// at least one sign change among the cashflows.
    pub fn irr(&self) -> Result<Rate, TvmError> {
        if self.amounts.is_empty() {
            return Err(TvmError::NoSignChange);
        }
        if self.amounts.iter().all(|&cf| cf.abs() < 1e-10) {
            return Ok(Rate::effective(0.0, 1.0));
        }

        let has_positive = self.amounts.iter().any(|&cf| cf > 1e-10);
        let has_negative = self.amounts.iter().any(|&cf| cf < -1e-10);
        if !has_positive || !has_negative {
            return Err(TvmError::NoSignChange);
        }

        let mut rate = 0.05;
        for _ in 0..MAX_ITERATIONS {
            let (npv, dnpv) = self.npv_and_derivative(rate);

            if dnpv.abs() < 1e-20 {
                warn!("degenerate derivative at rate {rate}; switching to bisection");
                return self.irr_bisection();
            }

            let new_rate = (rate - npv / dnpv).clamp(RATE_FLOOR, RATE_CEILING);

            if (new_rate - rate).abs() < TOLERANCE {
                return Ok(Rate::effective(new_rate, 1.0));
            }
            rate = new_rate;
        }

        warn!("Newton-Raphson did not converge; switching to bisection");
        self.irr_bisection()
    }

    /// Alias for `irr` in the vocabulary of interest theory
    pub fn yield_rate(&self) -> Result<Rate, TvmError> {
        self.irr()
    }

    /// NPV and its derivative with respect to the rate
    fn npv_and_derivative(&self, rate: f64) -> (f64, f64) {
        let mut npv = 0.0;
        let mut dnpv = 0.0;
        for (&cf, &t) in self.amounts.iter().zip(&self.times) {
            let v = (1.0 + rate).powf(-t);
            npv += cf * v;
            if t > 0.0 {
                dnpv -= t * cf * (1.0 + rate).powf(-t - 1.0);
            }
        }
        (npv, dnpv)
    }

    fn npv_at(&self, rate: f64) -> f64 {
        self.amounts
            .iter()
            .zip(&self.times)
            .map(|(&cf, &t)| cf * (1.0 + rate).powf(-t))
            .sum()
    }

    fn irr_bisection(&self) -> Result<Rate, TvmError> {
        let mut low = RATE_FLOOR;
        let mut high = RATE_CEILING;

        let npv_low = self.npv_at(low);
        let npv_high = self.npv_at(high);
        if npv_low * npv_high > 0.0 {
            return Err(TvmError::NoConvergence(MAX_ITERATIONS));
        }

        for _ in 0..MAX_ITERATIONS {
            let mid = (low + high) / 2.0;
            let npv_mid = self.npv_at(mid);

            if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
                return Ok(Rate::effective(mid, 1.0));
            }

            if npv_mid * self.npv_at(low) < 0.0 {
                high = mid;
            } else {
                low = mid;
            }
        }

        Err(TvmError::NoConvergence(MAX_ITERATIONS))
    }
}
