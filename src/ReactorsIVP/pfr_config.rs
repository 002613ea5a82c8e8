//! JSON task description for a reactor run.
//!
//! ```json
//! {
//!   "problem_name": "PFR",
//!   "k1": 0.3,
//!   "k2": 0.5,
//!   "initial_concentrations": [10.0, 5.0, 0.0, 0.0, 2.0],
//!   "domain": { "start": 0.0, "end": 5.0, "n_points": 100, "variable": "ReactorLength" },
//!   "solver": { "rtol": 1e-8 }
//! }
//! ```
//! `rate_laws` may replace the elementary kinetics, e.g.
//! `"rate_laws": [{"type": "PowerLaw", "k": 0.3, "exponents": [1.0, 0.5]}, {"type": "Elementary", "k": 0.5}]`;
//! `k1`/`k2` are then ignored.
use super::PlugFlowReactor::PFRTask;
use super::domain::{IndependentVariable, IntegrationDomain};
use super::reactor_error::ReactorError;
use super::ivp_solver::SolverParams;
use crate::Kinetics::rate_law::RateLaw;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub start: f64,
    pub end: f64,
    pub n_points: usize,
    #[serde(default)]
    pub variable: IndependentVariable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PFRConfig {
    #[serde(default)]
    pub problem_name: Option<String>,
    #[serde(default)]
    pub problem_description: Option<String>,
    #[serde(default)]
    pub k1: Option<f64>,
    #[serde(default)]
    pub k2: Option<f64>,
    #[serde(default)]
    pub rate_laws: Option<[RateLaw; 2]>,
    pub initial_concentrations: Vec<f64>,
    pub domain: DomainConfig,
    #[serde(default)]
    pub solver: SolverParams,
}

impl PFRConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ReactorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReactorError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReactorError::MissingData(format!(
                "file '{}' does not exist",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        info!("task loaded from {}", path.display());
        Self::from_json_str(&content)
    }

    /// Builds a validated task ready for `solve()`
    pub fn into_task(self) -> Result<PFRTask, ReactorError> {
        let mut task = PFRTask::new();
        if let Some(name) = &self.problem_name {
            task.set_problem_name(name);
        }
        if let Some(description) = &self.problem_description {
            task.set_problem_description(description);
        }
        match self.rate_laws {
            Some([r1, r2]) => {
                if self.k1.is_some() || self.k2.is_some() {
                    warn!("rate_laws given, k1 and k2 are ignored");
                }
                task.set_rate_laws(r1, r2)?;
                task.set_initial(self.initial_concentrations)?;
            }
            None => {
                let (k1, k2) = match (self.k1, self.k2) {
                    (Some(k1), Some(k2)) => (k1, k2),
                    _ => {
                        return Err(ReactorError::MissingData(
                            "either k1 and k2 or rate_laws must be given".to_string(),
                        ));
                    }
                };
                task.set_problem(k1, k2, self.initial_concentrations)?;
            }
        }
        let d = &self.domain;
        task.set_domain(IntegrationDomain::linspace(d.start, d.end, d.n_points, d.variable)?);
        task.set_solver_params(self.solver)?;
        task.check_task()?;
        Ok(task)
    }
}
