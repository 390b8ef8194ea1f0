//! Loan and savings schedules and outstanding balance methods
//!
//! Payment sizing for level-payment loans and savings plans, with a
//! cents-rounded variant where the regular payment is rounded up to the
//! cent and the final payment absorbs the drift. Outstanding balances
//! follow the retrospective and prospective methods.

use serde::{Deserialize, Serialize};

use crate::annuity::{Annuity, Timing};
use crate::error::TvmError;
use crate::growth::Accumulation;
use crate::rate::{Rate, RatePattern};

/// A rounded payment plan: a level installment and a (possibly different)
/// final installment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Installments {
    /// The regular payment, rounded up to the cent
    pub amount: f64,
    /// The final payment after absorbing the rounding drift
    pub last: f64,
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn ceil_cents(x: f64) -> f64 {
    (x * 100.0).ceil() / 100.0
}

/// Loan amount financed by a down payment plus a level payment annuity
pub fn loan_amount(
    down_payment: f64,
    loan_payment: f64,
    period: f64,
    term: f64,
    gr: Rate,
) -> Result<f64, TvmError> {
    let ann = Annuity::level(gr, period, term, loan_payment, Timing::Immediate)?;
    Ok(ann.pv()? + down_payment)
}

/// Level payment that amortizes `loan_amt` over the term
pub fn loan_payment(
    loan_amt: f64,
    period: f64,
    term: f64,
    gr: Rate,
    timing: Timing,
) -> Result<f64, TvmError> {
    let ann = Annuity::level(gr, period, term, 1.0, timing)?;
    Ok(loan_amt / ann.pv()?)
}

/// Level payment rounded to whole cents, with the final payment adjusted
/// so the loan still amortizes exactly
pub fn loan_payment_rounded(
    loan_amt: f64,
    period: f64,
    term: f64,
    gr: Rate,
    timing: Timing,
) -> Result<Installments, TvmError> {
    let exact = loan_payment(loan_amt, period, term, gr, timing)?;
    let acc = Accumulation::new(gr);

    let nearest = round_cents(exact);
    let pv_nearest = Annuity::level(gr, period, term, nearest, timing)?.pv()?;
    if round_cents(pv_nearest) == loan_amt {
        return Ok(Installments {
            amount: nearest,
            last: nearest,
        });
    }

    // round up, then shrink the final payment by the accumulated overshoot
    let rounded_up = ceil_cents(exact);
    let overshoot = Annuity::level(gr, period, term, rounded_up, timing)?.pv()? - loan_amt;
    let last = rounded_up - round_cents(overshoot * acc.val(term)?);

    Ok(Installments {
        amount: rounded_up,
        last,
    })
}

/// Level deposit that accumulates to `fv` by the end of the term
pub fn savings_payment(fv: f64, period: f64, term: f64, gr: Rate) -> Result<f64, TvmError> {
    let ann = Annuity::level(gr, period, term, 1.0, Timing::Immediate)?;
    Ok(fv / ann.sv()?)
}

/// Level deposit rounded to whole cents, with the final deposit adjusted
/// so the target is still met exactly
pub fn savings_payment_rounded(
    fv: f64,
    period: f64,
    term: f64,
    gr: Rate,
) -> Result<Installments, TvmError> {
    let exact = savings_payment(fv, period, term, gr)?;

    let nearest = round_cents(exact);
    let fv_nearest = Annuity::level(gr, period, term, nearest, Timing::Immediate)?.sv()?;
    if round_cents(fv_nearest) == fv {
        return Ok(Installments {
            amount: nearest,
            last: nearest,
        });
    }

    let rounded_up = ceil_cents(exact);
    let overshoot = Annuity::level(gr, period, term, rounded_up, Timing::Immediate)?.sv()? - fv;
    let last = round_cents(rounded_up - round_cents(overshoot));

    Ok(Installments {
        amount: rounded_up,
        last,
    })
}

/// Number of level payments of `pmt` needed to accumulate at least `fv`
pub fn number_of_payments(pmt: f64, fv: f64, period: f64, gr: Rate) -> Result<u32, TvmError> {
    if period <= 0.0 || !period.is_finite() {
        return Err(TvmError::InvalidPeriod(period));
    }
    let i = gr
        .convert_rate(RatePattern::EffectiveInterest { interval: period })?
        .rate;
    let n = (fv / pmt * i + 1.0).ln() / (1.0 + i).ln();
    Ok(n.ceil() as u32)
}

/// Outstanding loan balance by the retrospective method: the accumulated
/// loan minus the accumulated value of the payments made through time `t`
pub fn outstanding_balance_retrospective(
    loan: f64,
    payment: f64,
    period: f64,
    gr: Rate,
    t: f64,
) -> Result<f64, TvmError> {
    let ann = Annuity::level(gr, period, t, payment, Timing::Immediate)?;
    let acc = Accumulation::new(gr);
    Ok((loan * acc.val(t)? - ann.sv()?).max(0.0))
}

/// Outstanding loan balance by the prospective method: the present value
/// at time `t` of the remaining payments
///
/// `final_payment` is an irregular balloon payment at the end of the term,
/// and `missed` lists payment times that were skipped and therefore still
/// accrue.
pub fn outstanding_balance_prospective(
    payment: f64,
    period: f64,
    term: f64,
    gr: Rate,
    t: f64,
    final_payment: Option<f64>,
    missed: &[f64],
) -> Result<f64, TvmError> {
    let acc = Accumulation::new(gr);

    let mut olb = if let Some(r) = final_payment {
        let ann = Annuity::level(gr, period, term - t - period, payment, Timing::Immediate)?;
        ann.pv()? + r * acc.discount_func(term - t)?
    } else {
        Annuity::level(gr, period, term - t, payment, Timing::Immediate)?.pv()?
    };

    for &p in missed {
        olb += payment * acc.val(t - p)?;
    }

    Ok(olb)
}
