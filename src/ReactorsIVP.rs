//! # Reactor Initial Value Problem Module
//!
//! Steady-state isothermal plug-flow reactor described by a system of ODEs along the
//! reactor length (or, equivalently, along the residence time):
//!
//! ```text
//! dC_i/dL = Σ_j ν_ij r_j,   r_j = k_j Π C_m^n_mj
//! C_i(0) = C_i0
//! ```
//!
//! ## Structure
//! - `network` - species, stoichiometric matrix and the fixed network A+B=>C, A+C=>D, E inert
//! - `domain` - sample points and the independent variable (length or residence time)
//! - `ivp_solver` - adaptive Dormand–Prince integration (`ode_solvers`) onto the sample points
//! - `PlugFlowReactor` - `integrate`, `conversion_and_yield` and the `PFRTask` workflow
//! - `sweep` - parallel runs over sets of rate constants
//! - `pfr_config` - task description in JSON
//! - `reactor_error` - error type of the module
#[allow(non_snake_case)]
pub mod PlugFlowReactor;
pub mod domain;
pub mod ivp_solver;
pub mod network;
pub mod pfr_config;
pub mod reactor_error;
pub mod sweep;
