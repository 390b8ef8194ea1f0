//! Error types shared across the crate

use thiserror::Error;

/// Errors produced by growth functions, solvers, and valuation routines
#[derive(Debug, Error)]
pub enum TvmError {
    /// Interval endpoints supplied in the wrong order
    #[error("invalid interval: t2 ({t2}) must not precede t1 ({t1})")]
    InvalidInterval { t1: f64, t2: f64 },

    /// A time argument was negative where only non-negative times make sense
    #[error("times must be non-negative")]
    NegativeTime,

    /// Payment amounts and payment times differ in length
    #[error("amounts and times must have the same length ({amounts} vs {times})")]
    MismatchedSchedule { amounts: usize, times: usize },

    /// A missing-value solver was given more than one unknown
    #[error("exactly one argument may be missing")]
    Underdetermined,

    /// A simple-pattern rate was used where a compound-family rate is required
    #[error("a {0} rate has no compound-family equivalent")]
    IncompatiblePattern(String),

    /// A simple-discount growth function is undefined once `d * t` reaches 1
    #[error("simple discount at rate {rate} has no value at time {t}")]
    ExpiredDiscount { rate: f64, t: f64 },

    /// A payment period must be a positive, finite number of years
    #[error("payment period must be positive and finite, got {0}")]
    InvalidPeriod(f64),

    /// Level annuities need a finite term
    #[error("term must be finite; use a perpetuity for an unbounded term")]
    InfiniteTerm,

    /// An explicit payment schedule does not have evenly spaced times
    #[error("payment intervals are not level; use Payments instead")]
    NonLevelIntervals,

    /// A valuation was requested on a stream with no growth object attached
    #[error("no growth object attached to this payment stream")]
    MissingGrowth,

    /// The yield solver ran out of iterations
    #[error("yield solver failed to converge after {0} iterations")]
    NoConvergence(usize),

    /// All cashflows share a sign, so no internal rate of return exists
    #[error("no sign change in cashflows; yield rate is undefined")]
    NoSignChange,

    /// Accumulated values and similar quantities are undefined for perpetuities
    #[error("operation is undefined for a perpetuity")]
    Perpetuity,

    /// Closed-form perpetuity valuation needs a level compound rate
    #[error("perpetuity valuation requires a level compound growth rate")]
    NonLevelPerpetuity,

    /// A simple loan only has a value at origination and maturity
    #[error("simple loan has no value between origination and maturity")]
    OutsideLoanTerm,

    /// Tier boundaries and rates do not line up, or tiers are not ascending
    #[error("tiers and rates must align and tiers must be strictly ascending")]
    InvalidTiers,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A schedule file contained a field that is not a number
    #[error("invalid numeric field in schedule: {0}")]
    Parse(#[from] std::num::ParseFloatError),
}
