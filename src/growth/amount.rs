//! Amount and accumulation functions
//!
//! The amount function `A_K(t)` gives the value at time `t` of a principal
//! `K` invested at time 0. The accumulation function `a(t)` is the special
//! case `K = 1`, and the two are proportionally related: `A_K(t) = K * a(t)`
//! whenever they come from the same growth specification.

use std::rc::Rc;

use crate::error::TvmError;
use crate::rate::Rate;

/// A growth specification: either a quoted rate or a user-supplied function
///
/// User functions come in two shapes: a full amount function of `(t, k)`, or
/// an accumulation function of `t` alone.
#[derive(Clone)]
pub enum Growth {
    /// Growth implied by a quoted rate
    Rate(Rate),
    /// An arbitrary amount function `f(t, k)`
    AmountFn(Rc<dyn Fn(f64, f64) -> f64>),
    /// An arbitrary accumulation function `a(t)`
    AccumulationFn(Rc<dyn Fn(f64) -> f64>),
}

impl Growth {
    /// Wrap an amount function of `(t, k)`
    pub fn from_amount_fn<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + 'static,
    {
        Growth::AmountFn(Rc::new(f))
    }

    /// Wrap an accumulation function of `t`
    pub fn from_accumulation_fn<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        Growth::AccumulationFn(Rc::new(f))
    }
}

impl From<Rate> for Growth {
    fn from(rate: Rate) -> Self {
        Growth::Rate(rate)
    }
}

impl From<f64> for Growth {
    /// A bare float is read as an annual effective interest rate
    fn from(rate: f64) -> Self {
        Growth::Rate(Rate::from(rate))
    }
}

/// The amount function: principal `k` growing according to a `Growth`
#[derive(Clone)]
pub struct Amount {
    growth: Growth,
    k: f64,
}

impl Amount {
    /// Create an amount function from any growth specification
    pub fn new(gr: impl Into<Growth>, k: f64) -> Self {
        Self {
            growth: gr.into(),
            k,
        }
    }

    /// Compound interest amount function
    pub fn compound(k: f64, gr: Rate) -> Self {
        Self::new(gr, k)
    }

    /// Simple interest amount function at annual rate `s`
    pub fn simple(k: f64, s: f64) -> Self {
        Self::new(Rate::simple(s, 1.0), k)
    }

    /// Simple (linear) discount amount function at annual rate `d`
    pub fn simple_discount(k: f64, d: f64) -> Self {
        Self::new(Rate::simple_discount(d, 1.0), k)
    }

    /// Compound discount amount function at annual rate `d`
    pub fn compound_discount(k: f64, d: f64) -> Self {
        Self::new(Rate::nominal_discount(d, 1.0), k)
    }

    /// Continuously compounded amount function at force of interest `delta`
    pub fn force(k: f64, delta: f64) -> Self {
        Self::new(Rate::force(delta), k)
    }

    /// The principal
    pub fn principal(&self) -> f64 {
        self.k
    }

    /// Value of the investment at time `t`
    ///
    /// Fails when the growth pattern has no value at `t`, e.g. simple
    /// discount at or past `1/d`.
    pub fn val(&self, t: f64) -> Result<f64, TvmError> {
        match &self.growth {
            Growth::Rate(r) => r.amt_factor(self.k, t),
            Growth::AmountFn(f) => Ok(f(t, self.k)),
            Growth::AccumulationFn(a) => Ok(self.k * a(t)),
        }
    }

    /// Interest earned between `t1` and `t2`
    pub fn interest_earned(&self, t1: f64, t2: f64) -> Result<f64, TvmError> {
        if t2 < t1 {
            return Err(TvmError::InvalidInterval { t1, t2 });
        }
        if t1 < 0.0 || t2 < 0.0 {
            return Err(TvmError::NegativeTime);
        }
        Ok(self.val(t2)? - self.val(t1)?)
    }

    /// Effective interest rate earned over `[t1, t2]`, quoted over that
    /// interval
    pub fn effective_interval(&self, t1: f64, t2: f64) -> Result<Rate, TvmError> {
        let rate = (self.val(t2)? - self.val(t1)?) / self.val(t1)?;
        Ok(Rate::effective(rate, t2 - t1))
    }

    /// Effective interest rate for the n-th period, `[n-1, n]`
    pub fn effective_rate(&self, n: u32) -> Result<Rate, TvmError> {
        self.effective_interval(f64::from(n) - 1.0, f64::from(n))
    }

    /// Effective discount rate over `[t1, t2]`
    pub fn discount_interval(&self, t1: f64, t2: f64) -> Result<f64, TvmError> {
        Ok((self.val(t2)? - self.val(t1)?) / self.val(t2)?)
    }

    /// Effective discount rate for the n-th period, `[n-1, n]`
    pub fn effective_discount(&self, n: u32) -> Result<f64, TvmError> {
        self.discount_interval(f64::from(n) - 1.0, f64::from(n))
    }

    /// Extract the accumulation function by pinning the principal to 1
    pub fn accumulation(&self) -> Accumulation {
        match &self.growth {
            Growth::Rate(r) => Accumulation::new(*r),
            Growth::AccumulationFn(a) => Accumulation::new(Growth::AccumulationFn(Rc::clone(a))),
            Growth::AmountFn(f) => {
                let f = Rc::clone(f);
                Accumulation::new(Growth::from_accumulation_fn(move |t| f(t, 1.0)))
            }
        }
    }
}

/// The accumulation function: the amount function with principal 1
///
/// When built from a `Rate` the originating rate is kept, which lets
/// annuity valuation recognize level compound growth and use closed forms.
#[derive(Clone)]
pub struct Accumulation {
    growth: Growth,
    rate: Option<Rate>,
}

impl Accumulation {
    /// Create an accumulation function from any growth specification
    pub fn new(gr: impl Into<Growth>) -> Self {
        let growth = gr.into();
        let rate = match &growth {
            Growth::Rate(r) => Some(*r),
            _ => None,
        };
        Self { growth, rate }
    }

    /// Compound interest accumulation function
    pub fn compound(gr: Rate) -> Self {
        Self::new(gr)
    }

    /// Simple interest accumulation function at annual rate `s`
    pub fn simple(s: f64) -> Self {
        Self::new(Rate::simple(s, 1.0))
    }

    /// Simple (linear) discount accumulation function at annual rate `d`
    pub fn simple_discount(d: f64) -> Self {
        Self::new(Rate::simple_discount(d, 1.0))
    }

    /// Compound discount accumulation function at annual rate `d`
    pub fn compound_discount(d: f64) -> Self {
        Self::new(Rate::nominal_discount(d, 1.0))
    }

    /// Continuously compounded accumulation function at force `delta`
    pub fn force(delta: f64) -> Self {
        Self::new(Rate::force(delta))
    }

    /// The originating rate, when this accumulation came from one
    pub fn interest_rate(&self) -> Option<Rate> {
        self.rate
    }

    /// Whether growth is a level compound-family rate, making geometric
    /// closed forms valid
    pub fn is_level(&self) -> bool {
        self.rate.is_some_and(|r| r.pattern.is_compound())
    }

    /// Value of 1 unit of principal at time `t`
    ///
    /// Fails when the growth pattern has no value at `t`, e.g. simple
    /// discount at or past `1/d`.
    pub fn val(&self, t: f64) -> Result<f64, TvmError> {
        match &self.growth {
            Growth::Rate(r) => r.acc_factor(t),
            Growth::AmountFn(f) => Ok(f(t, 1.0)),
            Growth::AccumulationFn(a) => Ok(a(t)),
        }
    }

    /// Discount factor at time `t`, the reciprocal of the accumulation
    /// function
    pub fn discount_func(&self, t: f64) -> Result<f64, TvmError> {
        Ok(1.0 / self.val(t)?)
    }

    /// Present value at time 0 of `fv` due at time `t`
    pub fn pv(&self, fv: f64, t: f64) -> Result<f64, TvmError> {
        Ok(fv * self.discount_func(t)?)
    }

    /// Principal needed at `t1` to reach `fv` at `t2`
    pub fn future_principal(&self, fv: f64, t1: f64, t2: f64) -> Result<f64, TvmError> {
        Ok(fv * self.discount_func(t2)? * self.val(t1)?)
    }

    /// Effective interest rate earned over `[t1, t2]`, quoted over that
    /// interval
    pub fn effective_interval(&self, t1: f64, t2: f64) -> Result<Rate, TvmError> {
        self.as_amount(1.0).effective_interval(t1, t2)
    }

    /// Effective interest rate for the n-th period
    pub fn effective_rate(&self, n: u32) -> Result<Rate, TvmError> {
        self.as_amount(1.0).effective_rate(n)
    }

    /// Effective discount rate over `[t1, t2]`
    pub fn discount_interval(&self, t1: f64, t2: f64) -> Result<f64, TvmError> {
        self.as_amount(1.0).discount_interval(t1, t2)
    }

    /// Effective discount rate for the n-th period
    pub fn effective_discount(&self, n: u32) -> Result<f64, TvmError> {
        self.as_amount(1.0).effective_discount(n)
    }

    /// Interest earned on 1 unit of principal between `t1` and `t2`
    pub fn interest_earned(&self, t1: f64, t2: f64) -> Result<f64, TvmError> {
        self.as_amount(1.0).interest_earned(t1, t2)
    }

    /// View this accumulation as an amount function with principal `k`
    pub fn as_amount(&self, k: f64) -> Amount {
        Amount {
            growth: self.growth.clone(),
            k,
        }
    }
}

impl From<Accumulation> for Growth {
    fn from(acc: Accumulation) -> Self {
        acc.growth
    }
}

impl From<Rate> for Accumulation {
    fn from(rate: Rate) -> Self {
        Accumulation::new(rate)
    }
}

impl From<f64> for Accumulation {
    fn from(rate: f64) -> Self {
        Accumulation::new(rate)
    }
}
