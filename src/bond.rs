//! Fixed-coupon bond pricing, yield, and book value
//!
//! A bond is a coupon annuity plus a redemption payment; its price is the
//! present value of both under the valuation rate, and its yield is the
//! internal rate of return of the purchase cashflows.

use serde::{Deserialize, Serialize};

use crate::annuity::{Annuity, Timing};
use crate::error::TvmError;
use crate::growth::Accumulation;
use crate::payments::Payments;
use crate::rate::Rate;

/// A fixed-coupon bond
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    /// Face (par) amount the coupon rate applies to
    pub face: f64,
    /// Amount repaid at maturity (usually the face amount)
    pub redemption: f64,
    /// Annual coupon rate, paid `coupon_freq` times per year
    pub coupon_rate: f64,
    /// Coupon payments per year
    pub coupon_freq: f64,
    /// Term in years
    pub term: f64,
    /// Valuation rate
    pub gr: Rate,
}

impl Bond {
    /// A bond redeemed at par
    pub fn at_par(face: f64, coupon_rate: f64, coupon_freq: f64, term: f64, gr: Rate) -> Self {
        Self {
            face,
            redemption: face,
            coupon_rate,
            coupon_freq,
            term,
            gr,
        }
    }

    /// The coupon amount paid each period
    pub fn coupon(&self) -> f64 {
        self.face * self.coupon_rate / self.coupon_freq
    }

    /// Number of coupon payments over the term
    pub fn n_coupons(&self) -> u32 {
        (self.term * self.coupon_freq).round() as u32
    }

    /// The bond's cashflows as a payment stream under the valuation rate
    pub fn payments(&self) -> Result<Payments, TvmError> {
        let period = 1.0 / self.coupon_freq;
        let n = self.n_coupons();
        let mut amounts = vec![self.coupon(); n as usize];
        let times: Vec<f64> = (1..=n).map(|j| f64::from(j) * period).collect();
        if let Some(last) = amounts.last_mut() {
            *last += self.redemption;
        }
        Payments::new(amounts, times, Some(self.gr))
    }

    /// Price: present value of coupons and redemption at the valuation
    /// rate
    pub fn price(&self) -> Result<f64, TvmError> {
        let period = 1.0 / self.coupon_freq;
        let ann = Annuity::level(self.gr, period, self.term, self.coupon(), Timing::Immediate)?;
        let acc = Accumulation::new(self.gr);
        Ok(ann.pv()? + self.redemption * acc.discount_func(self.term)?)
    }

    /// Yield rate implied by a market price, as an annual effective rate
    pub fn yield_from_price(&self, price: f64) -> Result<Rate, TvmError> {
        let cashflows = self.payments()?;
        let mut all = Payments::bare(vec![-price], vec![0.0])?;
        all.append(cashflows.amounts(), cashflows.times())?;
        all.irr()
    }

    /// Book value at time `t` by the prospective method: present value of
    /// the remaining cashflows at the valuation rate
    pub fn book_value(&self, t: f64) -> Result<f64, TvmError> {
        if t < 0.0 {
            return Err(TvmError::NegativeTime);
        }
        let acc = Accumulation::new(self.gr);
        let period = 1.0 / self.coupon_freq;
        let at = acc.val(t)?;

        let mut bv = self.redemption * at / acc.val(self.term)?;
        for j in 1..=self.n_coupons() {
            let tj = f64::from(j) * period;
            if tj > t {
                bv += self.coupon() * at / acc.val(tj)?;
            }
        }
        Ok(bv)
    }

    /// Amount by which the price exceeds the redemption value (negative
    /// for a discount bond)
    pub fn premium(&self) -> Result<f64, TvmError> {
        Ok(self.price()? - self.redemption)
    }
}
