//! tvm CLI
//!
//! Command-line calculator for annuity values, loan payments, savings
//! plans, bond prices, and payment-stream NPV/yield.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use tvm::annuity::{Annuity, Timing};
use tvm::bond::Bond;
use tvm::loan;
use tvm::payments::Payments;
use tvm::rate::Rate;

#[derive(Parser)]
#[command(name = "tvm", version, about = "Interest theory calculator")]
struct Cli {
    /// Emit results as JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Present and accumulated value of a level annuity
    Annuity {
        /// Annual effective interest rate (e.g. 0.05)
        #[arg(long)]
        rate: f64,
        /// Years between payments
        #[arg(long, default_value_t = 1.0)]
        period: f64,
        /// Term in years
        #[arg(long)]
        term: f64,
        /// Payment amount
        #[arg(long, default_value_t = 1.0)]
        amount: f64,
        /// Payments at the beginning of each period
        #[arg(long)]
        due: bool,
    },
    /// Level payment that amortizes a loan
    Loan {
        /// Loan amount
        #[arg(long)]
        amount: f64,
        /// Annual effective interest rate
        #[arg(long)]
        rate: f64,
        /// Years between payments
        #[arg(long, default_value_t = 1.0)]
        period: f64,
        /// Term in years
        #[arg(long)]
        term: f64,
        /// Round the payment to whole cents and adjust the final payment
        #[arg(long)]
        cents: bool,
    },
    /// Level deposit that accumulates to a target
    Savings {
        /// Target future value
        #[arg(long)]
        target: f64,
        /// Annual effective interest rate
        #[arg(long)]
        rate: f64,
        /// Years between deposits
        #[arg(long, default_value_t = 1.0)]
        period: f64,
        /// Term in years
        #[arg(long)]
        term: f64,
    },
    /// Price and premium of a fixed-coupon bond
    Bond {
        /// Face amount
        #[arg(long)]
        face: f64,
        /// Annual coupon rate
        #[arg(long)]
        coupon: f64,
        /// Coupons per year
        #[arg(long, default_value_t = 2.0)]
        freq: f64,
        /// Term in years
        #[arg(long)]
        term: f64,
        /// Annual nominal valuation rate, compounded with the coupons
        #[arg(long)]
        rate: f64,
        /// Redemption amount if different from face
        #[arg(long)]
        redemption: Option<f64>,
    },
    /// Net present value of a CSV payment schedule (time,amount)
    Npv {
        /// Path to the schedule file
        #[arg(long)]
        schedule: PathBuf,
        /// Annual effective interest rate
        #[arg(long)]
        rate: f64,
    },
    /// Yield rate of a CSV payment schedule (time,amount)
    Yield {
        /// Path to the schedule file
        #[arg(long)]
        schedule: PathBuf,
    },
}

/// A single labeled result for output
#[derive(Debug, Serialize)]
struct Figure {
    label: &'static str,
    value: f64,
}

fn report(figures: &[Figure], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(figures)?);
    } else {
        for f in figures {
            println!("{}: {:.6}", f.label, f.value);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Annuity {
            rate,
            period,
            term,
            amount,
            due,
        } => {
            let timing = if due { Timing::Due } else { Timing::Immediate };
            let ann = Annuity::level(Rate::effective(rate, 1.0), period, term, amount, timing)?;
            report(
                &[
                    Figure {
                        label: "present value",
                        value: ann.pv()?,
                    },
                    Figure {
                        label: "accumulated value",
                        value: ann.sv()?,
                    },
                ],
                cli.json,
            )
        }
        Command::Loan {
            amount,
            rate,
            period,
            term,
            cents,
        } => {
            let gr = Rate::effective(rate, 1.0);
            if cents {
                let plan = loan::loan_payment_rounded(amount, period, term, gr, Timing::Immediate)?;
                report(
                    &[
                        Figure {
                            label: "payment",
                            value: plan.amount,
                        },
                        Figure {
                            label: "final payment",
                            value: plan.last,
                        },
                    ],
                    cli.json,
                )
            } else {
                let pmt = loan::loan_payment(amount, period, term, gr, Timing::Immediate)?;
                report(
                    &[Figure {
                        label: "payment",
                        value: pmt,
                    }],
                    cli.json,
                )
            }
        }
        Command::Savings {
            target,
            rate,
            period,
            term,
        } => {
            let pmt = loan::savings_payment(target, period, term, Rate::effective(rate, 1.0))?;
            report(
                &[Figure {
                    label: "deposit",
                    value: pmt,
                }],
                cli.json,
            )
        }
        Command::Bond {
            face,
            coupon,
            freq,
            term,
            rate,
            redemption,
        } => {
            let bond = Bond {
                face,
                redemption: redemption.unwrap_or(face),
                coupon_rate: coupon,
                coupon_freq: freq,
                term,
                gr: Rate::nominal(rate, freq),
            };
            report(
                &[
                    Figure {
                        label: "price",
                        value: bond.price()?,
                    },
                    Figure {
                        label: "premium",
                        value: bond.premium()?,
                    },
                ],
                cli.json,
            )
        }
        Command::Npv { schedule, rate } => {
            let mut payments = Payments::from_csv(&schedule)
                .with_context(|| format!("failed to load schedule {}", schedule.display()))?;
            payments.set_growth(Rate::effective(rate, 1.0));
            report(
                &[Figure {
                    label: "npv",
                    value: payments.npv()?,
                }],
                cli.json,
            )
        }
        Command::Yield { schedule } => {
            let payments = Payments::from_csv(&schedule)
                .with_context(|| format!("failed to load schedule {}", schedule.display()))?;
            let y = payments.irr()?;
            report(
                &[Figure {
                    label: "yield (annual effective)",
                    value: y.rate,
                }],
                cli.json,
            )
        }
    }
}
