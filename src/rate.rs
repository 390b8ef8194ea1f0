//! Interest rate representation and pattern conversion
//!
//! A `Rate` pairs a numeric rate with the pattern it is quoted in:
//! effective or nominal, interest or discount, force of interest, or the
//! simple (non-compounding) patterns. Compound-family patterns convert
//! freely between each other through the annual effective rate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TvmError;

/// How a rate is quoted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RatePattern {
    /// Effective interest rate over an interval measured in years
    EffectiveInterest { interval: f64 },
    /// Effective discount rate over an interval measured in years
    EffectiveDiscount { interval: f64 },
    /// Nominal interest rate compounded `freq` times per year
    NominalInterest { freq: f64 },
    /// Nominal discount rate compounded `freq` times per year
    NominalDiscount { freq: f64 },
    /// Force of interest (continuous compounding)
    Force,
    /// Simple interest earned linearly over an interval measured in years
    SimpleInterest { interval: f64 },
    /// Simple discount applied linearly over an interval measured in years
    SimpleDiscount { interval: f64 },
}

impl RatePattern {
    /// Whether the pattern belongs to the compound family, i.e. it has an
    /// equivalent annual effective interest rate
    pub fn is_compound(&self) -> bool {
        !matches!(
            self,
            RatePattern::SimpleInterest { .. } | RatePattern::SimpleDiscount { .. }
        )
    }

    /// Human-readable pattern name
    pub fn name(&self) -> &'static str {
        match self {
            RatePattern::EffectiveInterest { .. } => "effective interest",
            RatePattern::EffectiveDiscount { .. } => "effective discount",
            RatePattern::NominalInterest { .. } => "nominal interest",
            RatePattern::NominalDiscount { .. } => "nominal discount",
            RatePattern::Force => "force of interest",
            RatePattern::SimpleInterest { .. } => "simple interest",
            RatePattern::SimpleDiscount { .. } => "simple discount",
        }
    }
}

/// An interest rate quoted in a particular pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    /// The numeric rate, interpreted according to `pattern`
    pub rate: f64,
    /// The quoting convention
    pub pattern: RatePattern,
}

impl Rate {
    /// Effective interest rate over an interval (1.0 = annual)
    pub fn effective(rate: f64, interval: f64) -> Self {
        Self {
            rate,
            pattern: RatePattern::EffectiveInterest { interval },
        }
    }

    /// Effective discount rate over an interval (1.0 = annual)
    pub fn effective_discount(rate: f64, interval: f64) -> Self {
        Self {
            rate,
            pattern: RatePattern::EffectiveDiscount { interval },
        }
    }

    /// Nominal interest rate compounded `freq` times per year
    pub fn nominal(rate: f64, freq: f64) -> Self {
        Self {
            rate,
            pattern: RatePattern::NominalInterest { freq },
        }
    }

    /// Nominal discount rate compounded `freq` times per year
    pub fn nominal_discount(rate: f64, freq: f64) -> Self {
        Self {
            rate,
            pattern: RatePattern::NominalDiscount { freq },
        }
    }

    /// Force of interest
    pub fn force(delta: f64) -> Self {
        Self {
            rate: delta,
            pattern: RatePattern::Force,
        }
    }

    /// Simple interest rate over an interval (1.0 = annual)
    pub fn simple(rate: f64, interval: f64) -> Self {
        Self {
            rate,
            pattern: RatePattern::SimpleInterest { interval },
        }
    }

    /// Simple discount rate over an interval (1.0 = annual)
    pub fn simple_discount(rate: f64, interval: f64) -> Self {
        Self {
            rate,
            pattern: RatePattern::SimpleDiscount { interval },
        }
    }

    /// Annual effective interest rate for compound-family patterns, None
    /// for the simple patterns
    fn compound_annual(&self) -> Option<f64> {
        let r = self.rate;
        match self.pattern {
            RatePattern::EffectiveInterest { interval } => {
                Some((1.0 + r).powf(1.0 / interval) - 1.0)
            }
            RatePattern::EffectiveDiscount { interval } => {
                // d over the interval is equivalent to i = d / (1 - d)
                let i = r / (1.0 - r);
                Some((1.0 + i).powf(1.0 / interval) - 1.0)
            }
            RatePattern::NominalInterest { freq } => Some((1.0 + r / freq).powf(freq) - 1.0),
            RatePattern::NominalDiscount { freq } => Some((1.0 - r / freq).powf(-freq) - 1.0),
            RatePattern::Force => Some(r.exp() - 1.0),
            RatePattern::SimpleInterest { .. } | RatePattern::SimpleDiscount { .. } => None,
        }
    }

    /// Convert to the equivalent annual effective interest rate (APY)
    pub fn annual_effective(&self) -> Result<f64, TvmError> {
        self.compound_annual()
            .ok_or_else(|| TvmError::IncompatiblePattern(self.pattern.name().to_string()))
    }

    /// Convert to a `Rate` quoted as annual effective interest
    pub fn standardize(&self) -> Result<Rate, TvmError> {
        Ok(Rate::effective(self.annual_effective()?, 1.0))
    }

    /// Convert to another compound-family pattern through the annual
    /// effective rate
    pub fn convert_rate(&self, target: RatePattern) -> Result<Rate, TvmError> {
        let i = self.annual_effective()?;
        let rate = match target {
            RatePattern::EffectiveInterest { interval } => (1.0 + i).powf(interval) - 1.0,
            RatePattern::EffectiveDiscount { interval } => 1.0 - (1.0 + i).powf(-interval),
            RatePattern::NominalInterest { freq } => freq * ((1.0 + i).powf(1.0 / freq) - 1.0),
            RatePattern::NominalDiscount { freq } => freq * (1.0 - (1.0 + i).powf(-1.0 / freq)),
            RatePattern::Force => (1.0 + i).ln(),
            RatePattern::SimpleInterest { .. } | RatePattern::SimpleDiscount { .. } => {
                return Err(TvmError::IncompatiblePattern(target.name().to_string()));
            }
        };
        Ok(Rate {
            rate,
            pattern: target,
        })
    }

    /// Growth factor for one unit of principal after `t` years
    ///
    /// Compound-family rates grow geometrically; the simple patterns grow
    /// linearly (or hyperbolically, for simple discount), matching the
    /// amount functions they imply. A simple-discount factor is undefined
    /// once `d * t` reaches 1.
    pub fn acc_factor(&self, t: f64) -> Result<f64, TvmError> {
        match self.pattern {
            RatePattern::SimpleInterest { interval } => Ok(1.0 + self.rate * t / interval),
            RatePattern::SimpleDiscount { interval } => {
                let dt = self.rate * t / interval;
                if dt >= 1.0 {
                    return Err(TvmError::ExpiredDiscount { rate: self.rate, t });
                }
                Ok(1.0 / (1.0 - dt))
            }
            _ => {
                // compound_annual is always Some for compound patterns
                let i = self.compound_annual().unwrap_or(0.0);
                Ok((1.0 + i).powf(t))
            }
        }
    }

    /// Growth of principal `k` after `t` years
    pub fn amt_factor(&self, k: f64, t: f64) -> Result<f64, TvmError> {
        Ok(k * self.acc_factor(t)?)
    }
}

impl From<f64> for Rate {
    /// A bare float is read as an annual effective interest rate
    fn from(rate: f64) -> Self {
        Rate::effective(rate, 1.0)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pattern {
            RatePattern::EffectiveInterest { interval }
            | RatePattern::EffectiveDiscount { interval }
            | RatePattern::SimpleInterest { interval }
            | RatePattern::SimpleDiscount { interval } => {
                write!(
                    f,
                    "{:.6} {} per {} year(s)",
                    self.rate,
                    self.pattern.name(),
                    interval
                )
            }
            RatePattern::NominalInterest { freq } | RatePattern::NominalDiscount { freq } => {
                write!(
                    f,
                    "{:.6} {} compounded {} times per year",
                    self.rate,
                    self.pattern.name(),
                    freq
                )
            }
            RatePattern::Force => write!(f, "{:.6} {}", self.rate, self.pattern.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_annual_effective_identity() {
        let r = Rate::effective(0.05, 1.0);
        assert_relative_eq!(r.annual_effective().unwrap(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_nominal_to_effective() {
        // 6% nominal compounded monthly ~ 6.1678% APY
        let r = Rate::nominal(0.06, 12.0);
        let i = r.annual_effective().unwrap();
        assert_relative_eq!(i, (1.0 + 0.005f64).powi(12) - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_discount_to_interest() {
        // d = i / (1 + i), so i = d / (1 - d)
        let d = Rate::effective_discount(0.05, 1.0);
        let i = d.annual_effective().unwrap();
        assert_relative_eq!(i, 0.05 / 0.95, epsilon = 1e-12);
    }

    #[test]
    fn test_force_of_interest() {
        let delta = Rate::force(0.05);
        assert_relative_eq!(
            delta.annual_effective().unwrap(),
            0.05f64.exp() - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_conversion_round_trip() {
        let r = Rate::effective(0.05, 1.0);
        let nom = r
            .convert_rate(RatePattern::NominalDiscount { freq: 4.0 })
            .unwrap();
        let back = nom.standardize().unwrap();
        assert_relative_eq!(back.rate, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_simple_rate_rejects_conversion() {
        let s = Rate::simple(0.04, 1.0);
        assert!(s.annual_effective().is_err());
    }

    #[test]
    fn test_acc_factor_compound() {
        let r = Rate::effective(0.05, 1.0);
        assert_relative_eq!(r.acc_factor(2.0).unwrap(), 1.05f64 * 1.05, epsilon = 1e-12);
    }

    #[test]
    fn test_acc_factor_simple() {
        let s = Rate::simple(0.04, 1.0);
        assert_relative_eq!(s.acc_factor(2.5).unwrap(), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_simple_discount_expires() {
        let d = Rate::simple_discount(0.05, 1.0);
        assert_relative_eq!(d.acc_factor(2.0).unwrap(), 1.0 / 0.9, epsilon = 1e-12);

        // undefined at 1/d and beyond
        assert!(matches!(
            d.acc_factor(20.0),
            Err(TvmError::ExpiredDiscount { .. })
        ));
        assert!(d.acc_factor(25.0).is_err());
    }
}
