//! tvm - Interest theory toolkit
//!
//! This library provides:
//! - Amount and accumulation functions over arbitrary growth patterns
//! - Interest rate patterns (effective, nominal, discount, force, simple)
//!   and conversions between them
//! - Payment streams with NPV, equation of value, and yield rate solving
//! - Annuities-certain, perpetuities, and loan amortization helpers
//! - Fixed-coupon bond pricing, yield, and book value

pub mod annuity;
pub mod bond;
pub mod error;
pub mod growth;
pub mod loan;
pub mod payments;
pub mod rate;

// Re-export commonly used types
pub use annuity::{Annuity, Timing};
pub use bond::Bond;
pub use error::TvmError;
pub use growth::{Accumulation, Amount, Growth};
pub use payments::Payments;
pub use rate::{Rate, RatePattern};
