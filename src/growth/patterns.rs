//! Growth patterns beyond a single level rate
//!
//! Tiered accounts pay a rate that depends on the balance or on how long
//! the account has been open; a simple loan is a lump sum discounted up
//! front and repaid in one payment.

use std::rc::Rc;

use crate::error::TvmError;
use crate::growth::Growth;
use crate::rate::Rate;

/// Growth pattern where the rate depends on the account balance
///
/// Tiers are the lower bounds of the balance intervals; `tiers[i]` earns
/// `rates[i]` until the balance crosses `tiers[i + 1]`.
#[derive(Clone)]
pub struct TieredBalance {
    tiers: Vec<f64>,
    rates: Vec<Rate>,
    // annual effective equivalents, precomputed at construction
    effective: Vec<f64>,
}

impl TieredBalance {
    /// Build a balance-tiered pattern; all rates must be compound-family
    pub fn new(tiers: Vec<f64>, rates: Vec<Rate>) -> Result<Self, TvmError> {
        if tiers.is_empty() || tiers.len() != rates.len() {
            return Err(TvmError::InvalidTiers);
        }
        if tiers.windows(2).any(|w| w[1] <= w[0]) {
            return Err(TvmError::InvalidTiers);
        }
        let effective = rates
            .iter()
            .map(|r| r.annual_effective())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tiers,
            rates,
            effective,
        })
    }

    /// Times at which the balance crosses into a higher tier, assuming a
    /// single deposit of `k` at time 0
    pub fn jump_times(&self, k: f64) -> Vec<f64> {
        let jump_balances: Vec<f64> = self.tiers.iter().copied().filter(|&b| b > k).collect();
        if jump_balances.is_empty() {
            return Vec::new();
        }

        // rates in effect on the way up: drop the top tier's rate, then
        // take the ones leading into each crossed boundary
        let below_top = &self.effective[..self.effective.len() - 1];
        let start = below_top.len().saturating_sub(jump_balances.len());
        let jump_rates = &below_top[start..];

        let mut times = Vec::with_capacity(jump_balances.len());
        let mut pv = k;
        let mut t_base = 0.0;
        for (&fv, &i) in jump_balances.iter().zip(jump_rates) {
            let increment = (fv / pv).ln() / (1.0 + i).ln();
            t_base += increment;
            times.push(t_base);
            pv = fv;
        }
        times
    }

    /// Balance at time `t` of a deposit `k` made at time 0
    pub fn balance(&self, k: f64, t: f64) -> f64 {
        let mut jump_times = self.jump_times(k);
        jump_times.insert(0, 0.0);

        let n = jump_times.len();
        let rates = &self.effective[self.effective.len() - n..];
        let tiers = &self.tiers[self.tiers.len() - n..];

        // t before the first boundary (including t < 0) stays in the
        // starting tier
        let index = jump_times
            .iter()
            .filter(|&&jt| jt <= t)
            .count()
            .saturating_sub(1);
        let lower_t = jump_times[index];
        let base = tiers[index].max(k);

        base * (1.0 + rates[index]).powf(t - lower_t)
    }

    /// The tier boundaries
    pub fn tiers(&self) -> &[f64] {
        &self.tiers
    }

    /// The tier rates
    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }
}

impl From<TieredBalance> for Growth {
    fn from(tb: TieredBalance) -> Self {
        Growth::AmountFn(Rc::new(move |t, k| tb.balance(k, t)))
    }
}

/// Growth pattern where the rate depends on how long the account has been
/// open
///
/// Tiers are the lower bounds of the time intervals; money earns
/// `rates[i]` from `tiers[i]` until `tiers[i + 1]`.
#[derive(Clone)]
pub struct TieredTime {
    tiers: Vec<f64>,
    rates: Vec<Rate>,
    // annual effective equivalents, precomputed at construction
    effective: Vec<f64>,
}

impl TieredTime {
    /// Build a time-tiered pattern; all rates must be compound-family
    pub fn new(tiers: Vec<f64>, rates: Vec<Rate>) -> Result<Self, TvmError> {
        if tiers.is_empty() || tiers.len() != rates.len() {
            return Err(TvmError::InvalidTiers);
        }
        if tiers.windows(2).any(|w| w[1] <= w[0]) {
            return Err(TvmError::InvalidTiers);
        }
        let effective = rates
            .iter()
            .map(|r| r.annual_effective())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tiers,
            rates,
            effective,
        })
    }

    /// Balance at time `t` of a deposit `k` made at time 0
    pub fn balance(&self, k: f64, t: f64) -> f64 {
        let mut boundaries: Vec<f64> = self.tiers.iter().copied().filter(|&x| x < t).collect();
        let applicable = boundaries.len();
        boundaries.push(t);

        let mut bal = k;
        for (i, window) in boundaries.windows(2).enumerate().take(applicable) {
            let span = window[1] - window[0];
            bal *= (1.0 + self.effective[i]).powf(span);
        }
        bal
    }

    /// The tier boundaries
    pub fn tiers(&self) -> &[f64] {
        &self.tiers
    }

    /// The tier rates
    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }
}

impl From<TieredTime> for Growth {
    fn from(tt: TieredTime) -> Self {
        Growth::AmountFn(Rc::new(move |t, k| tt.balance(k, t)))
    }
}

/// A lump-sum loan with interest taken up front, repaid in one payment
///
/// Only meaningful at origination (the borrower receives principal minus
/// the discount) and at maturity (the full principal is repaid).
#[derive(Debug, Clone)]
pub struct SimpleLoan {
    principal: f64,
    term: f64,
    discount_amount: f64,
    discount_rate: f64,
}

impl SimpleLoan {
    /// Build a simple loan from a discount rate
    pub fn from_discount_rate(principal: f64, term: f64, discount_rate: f64) -> Self {
        Self {
            principal,
            term,
            discount_amount: principal * discount_rate,
            discount_rate,
        }
    }

    /// Build a simple loan from a discount amount
    pub fn from_discount_amount(principal: f64, term: f64, discount_amount: f64) -> Self {
        Self {
            principal,
            term,
            discount_amount,
            discount_rate: discount_amount / principal,
        }
    }

    /// Cash the borrower actually receives at origination
    pub fn proceeds(&self) -> f64 {
        self.principal - self.discount_amount
    }

    /// The single repayment due at maturity
    pub fn repayment(&self) -> f64 {
        self.principal
    }

    pub fn discount_amount(&self) -> f64 {
        self.discount_amount
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    pub fn term(&self) -> f64 {
        self.term
    }

    /// Value of the loan at time `t`; defined only at origination and
    /// maturity
    pub fn value(&self, t: f64) -> Result<f64, TvmError> {
        if t == 0.0 {
            Ok(self.proceeds())
        } else if t == self.term {
            Ok(self.repayment())
        } else {
            Err(TvmError::OutsideLoanTerm)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tiered_balance_single_tier_is_compound() {
        let tb = TieredBalance::new(vec![0.0], vec![Rate::effective(0.05, 1.0)]).unwrap();
        assert_relative_eq!(tb.balance(1000.0, 2.0), 1000.0 * 1.05 * 1.05, epsilon = 1e-9);
        assert!(tb.jump_times(1000.0).is_empty());
    }

    #[test]
    fn test_tiered_balance_jump_times() {
        // 1% below 1000, 2% to 5000, 3% above
        let tb = TieredBalance::new(
            vec![0.0, 1000.0, 5000.0],
            vec![
                Rate::effective(0.01, 1.0),
                Rate::effective(0.02, 1.0),
                Rate::effective(0.03, 1.0),
            ],
        )
        .unwrap();

        let jumps = tb.jump_times(500.0);
        assert_eq!(jumps.len(), 2);

        // first crossing: 500 -> 1000 at 1%
        let t1 = (1000.0f64 / 500.0).ln() / 1.01f64.ln();
        assert_relative_eq!(jumps[0], t1, epsilon = 1e-9);

        // second crossing: 1000 -> 5000 at 2%
        let t2 = t1 + (5000.0f64 / 1000.0).ln() / 1.02f64.ln();
        assert_relative_eq!(jumps[1], t2, epsilon = 1e-9);

        // balance exactly at the first crossing equals the tier boundary
        assert_relative_eq!(tb.balance(500.0, t1), 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tiered_balance_above_all_tiers() {
        let tb = TieredBalance::new(
            vec![0.0, 1000.0],
            vec![Rate::effective(0.01, 1.0), Rate::effective(0.02, 1.0)],
        )
        .unwrap();
        // deposit already in the top tier earns the top rate from day one
        assert_relative_eq!(tb.balance(2000.0, 1.0), 2000.0 * 1.02, epsilon = 1e-9);
    }

    #[test]
    fn test_tiered_balance_validation() {
        assert!(TieredBalance::new(vec![0.0, 1.0], vec![Rate::effective(0.01, 1.0)]).is_err());
        assert!(TieredBalance::new(
            vec![1000.0, 0.0],
            vec![Rate::effective(0.01, 1.0), Rate::effective(0.02, 1.0)]
        )
        .is_err());
        // simple rates cannot back a balance-tiered account
        assert!(TieredBalance::new(vec![0.0], vec![Rate::simple(0.01, 1.0)]).is_err());
    }

    #[test]
    fn test_tiered_balance_before_time_zero() {
        let tb = TieredBalance::new(
            vec![0.0, 1000.0],
            vec![Rate::effective(0.01, 1.0), Rate::effective(0.02, 1.0)],
        )
        .unwrap();
        // a negative time discounts at the starting tier's rate
        assert_relative_eq!(tb.balance(500.0, -1.0), 500.0 / 1.01, epsilon = 1e-9);
        assert_relative_eq!(tb.balance(500.0, 0.0), 500.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tiered_time() {
        // 1% in year one, 2% in year two, 3% after
        let tt = TieredTime::new(
            vec![0.0, 1.0, 2.0],
            vec![
                Rate::effective(0.01, 1.0),
                Rate::effective(0.02, 1.0),
                Rate::effective(0.03, 1.0),
            ],
        )
        .unwrap();

        assert_relative_eq!(tt.balance(1000.0, 1.0), 1010.0, epsilon = 1e-9);
        assert_relative_eq!(tt.balance(1000.0, 2.0), 1000.0 * 1.01 * 1.02, epsilon = 1e-9);
        assert_relative_eq!(
            tt.balance(1000.0, 3.5),
            1000.0 * 1.01 * 1.02 * 1.03f64.powf(1.5),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_tiered_time_rejects_simple_rates() {
        let res = TieredTime::new(
            vec![0.0, 1.0],
            vec![Rate::effective(0.01, 1.0), Rate::simple(0.02, 1.0)],
        );
        assert!(matches!(res, Err(TvmError::IncompatiblePattern(_))));
    }

    #[test]
    fn test_tiered_time_as_growth() {
        use crate::growth::Amount;

        let tt = TieredTime::new(
            vec![0.0, 1.0],
            vec![Rate::effective(0.01, 1.0), Rate::effective(0.02, 1.0)],
        )
        .unwrap();
        let amt = Amount::new(Growth::from(tt.clone()), 1000.0);
        assert_relative_eq!(
            amt.val(2.0).unwrap(),
            tt.balance(1000.0, 2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_simple_loan() {
        let loan = SimpleLoan::from_discount_rate(1000.0, 1.0, 0.05);
        assert_relative_eq!(loan.proceeds(), 950.0, epsilon = 1e-12);
        assert_relative_eq!(loan.repayment(), 1000.0, epsilon = 1e-12);
        assert_relative_eq!(loan.value(0.0).unwrap(), 950.0, epsilon = 1e-12);
        assert_relative_eq!(loan.value(1.0).unwrap(), 1000.0, epsilon = 1e-12);
        assert!(loan.value(0.5).is_err());

        let by_amount = SimpleLoan::from_discount_amount(1000.0, 1.0, 50.0);
        assert_relative_eq!(by_amount.discount_rate(), 0.05, epsilon = 1e-12);
    }
}
