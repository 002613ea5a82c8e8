//! # Kinetics Module
//!
//! Power-law kinetics for homogeneous reactions.
//!
//! The rate of a reaction is evaluated as
//!
//! ```text
//! r = k * Π C_i^n_i
//! ```
//!
//! where `k` is the rate constant, `C_i` the concentrations of the participating substances
//! and `n_i` their reaction orders (exponents). Orders may be fractional; the convention
//! `0^0 = 1` is used so that a zero concentration with zero order does not kill the rate.
//!
//! Three kinds of rate laws are supported and selected by an explicit tag:
//! - zero order: `r = k`
//! - elementary: all orders equal to one
//! - power law: user-defined orders
//!
//! # Examples
//! ```
//! use PFRsim::Kinetics::rate_law::{rate, RateLaw, RateLawCalculator};
//! let r = rate(0.1, &[1.0, 3.0], &[2.0, 2.0]).unwrap();
//! assert!((r - 0.9).abs() < 1e-12);
//! let law = RateLaw::elementary(0.3).unwrap();
//! assert!((law.rate(&[10.0, 5.0]).unwrap() - 15.0).abs() < 1e-12);
//! ```
pub mod rate_law;
