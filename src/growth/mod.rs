//! Growth functions: amount and accumulation functions, growth patterns,
//! missing-value solvers, and day-count conventions

mod amount;
mod patterns;
pub mod daycount;
pub mod solvers;

pub use amount::{Accumulation, Amount, Growth};
pub use patterns::{SimpleLoan, TieredBalance, TieredTime};
