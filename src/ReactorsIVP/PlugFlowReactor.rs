//! # Plug-Flow Reactor
//!
//! Steady-state isothermal plug-flow reactor with the network
//! `A + B => C`, `A + C => D`, `E` inert:
//!
//! ```text
//! dC_A/dL = -r1 - r2
//! dC_B/dL = -r1
//! dC_C/dL =  r1 - r2
//! dC_D/dL =  r2
//! dC_E/dL =  0
//! ```
//!
//! The free functions [`integrate`], [`integrate_network`] and [`conversion_and_yield`] are
//! pure: every call builds its own network and solver state, so runs may be executed
//! concurrently (see [`super::sweep`]). [`PFRTask`] wraps them into the usual
//! set → check → solve → output workflow.
//!
//! ## Example
//! ```
//! use PFRsim::ReactorsIVP::PlugFlowReactor::{integrate, conversion_and_yield};
//! use PFRsim::ReactorsIVP::domain::{IntegrationDomain, IndependentVariable};
//! let c0 = [10.0, 5.0, 0.0, 0.0, 2.0];
//! let domain = IntegrationDomain::linspace(0.0, 5.0, 100, IndependentVariable::ReactorLength).unwrap();
//! let trajectory = integrate(&c0, &domain, 0.3, 0.5).unwrap();
//! let (x_a, y_d) = conversion_and_yield(&trajectory, &c0).unwrap();
//! assert!(x_a > 0.0 && x_a <= 1.0 && y_d >= 0.0 && y_d <= 1.0);
//! ```
use super::domain::{IndependentVariable, IntegrationDomain};
use super::network::{N_SPECIES, ReactionNetwork, Species};
use super::reactor_error::ReactorError;
use super::ivp_solver::{SolverParams, SolverStats, solve_on_mesh};
use crate::Kinetics::rate_law::RateLaw;
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Concentration profiles: rows - domain samples, columns - A, B, C, D, E
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    domain: IntegrationDomain,
    concentrations: DMatrix<f64>,
    stats: SolverStats,
}

/// serializable form of a trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub variable: IndependentVariable,
    pub points: Vec<f64>,
    pub species: Vec<String>,
    /// one row per sample point
    pub concentrations: Vec<Vec<f64>>,
}

impl Trajectory {
    pub fn domain(&self) -> &IntegrationDomain {
        &self.domain
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.concentrations
    }

    pub fn n_samples(&self) -> usize {
        self.concentrations.nrows()
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    /// species vector at sample `i`
    pub fn row(&self, i: usize) -> Option<DVector<f64>> {
        if i >= self.n_samples() {
            return None;
        }
        Some(self.concentrations.row(i).transpose())
    }

    pub fn first_row(&self) -> DVector<f64> {
        self.concentrations.row(0).transpose()
    }

    pub fn last_row(&self) -> DVector<f64> {
        self.concentrations.row(self.n_samples() - 1).transpose()
    }

    /// profile of one species along the domain
    pub fn species(&self, s: Species) -> DVector<f64> {
        self.concentrations.column(s.index()).into_owned()
    }

    pub fn to_record(&self) -> TrajectoryRecord {
        TrajectoryRecord {
            variable: self.domain.variable(),
            points: self.domain.points().iter().copied().collect(),
            species: Species::ALL.iter().map(|s| s.name().to_string()).collect(),
            concentrations: self
                .concentrations
                .row_iter()
                .map(|r| r.iter().copied().collect())
                .collect(),
        }
    }

    /// CSV with header `<axis>,A,B,C,D,E`
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ReactorError> {
        let mut file = BufWriter::new(File::create(path)?);
        let header: Vec<&str> = Species::ALL.iter().map(|s| s.name()).collect();
        writeln!(file, "{},{}", self.domain.variable().label(), header.join(","))?;
        for (i, x) in self.domain.points().iter().enumerate() {
            let values: Vec<String> = self
                .concentrations
                .row(i)
                .iter()
                .map(|v| format!("{:e}", v))
                .collect();
            writeln!(file, "{:e},{}", x, values.join(","))?;
        }
        file.flush()?;
        Ok(())
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ReactorError> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &self.to_record())?;
        Ok(())
    }
}

fn check_initial_state(initial: &[f64]) -> Result<DVector<f64>, ReactorError> {
    if initial.len() != N_SPECIES {
        return Err(ReactorError::InvalidInitialState(format!(
            "expected {} concentrations (A, B, C, D, E), got {}",
            N_SPECIES,
            initial.len()
        )));
    }
    for (s, c) in Species::ALL.iter().zip(initial.iter()) {
        if !c.is_finite() || *c < 0.0 {
            return Err(ReactorError::InvalidInitialState(format!(
                "concentration of {} must be finite and non-negative, got {}",
                s, c
            )));
        }
    }
    Ok(DVector::from_column_slice(initial))
}

/// Integrates the network with elementary rate laws of rate constants `k1` and `k2`
/// over `domain`, starting from `initial` = [C_A, C_B, C_C, C_D, C_E].
pub fn integrate(
    initial: &[f64],
    domain: &IntegrationDomain,
    k1: f64,
    k2: f64,
) -> Result<Trajectory, ReactorError> {
    let network = ReactionNetwork::elementary(k1, k2)?;
    integrate_network(&network, initial, domain, &SolverParams::default())
}

/// Same as [`integrate`] for arbitrary rate laws and solver settings
pub fn integrate_network(
    network: &ReactionNetwork,
    initial: &[f64],
    domain: &IntegrationDomain,
    params: &SolverParams,
) -> Result<Trajectory, ReactorError> {
    let y0 = check_initial_state(initial)?;
    let (concentrations, stats) = solve_on_mesh(network, &y0, domain.points(), params)?;
    Ok(Trajectory {
        domain: domain.clone(),
        concentrations,
        stats,
    })
}

/// Conversion of A and yield of D at the reactor outlet:
///
/// X_A = (C_A,0 - C_A,out)/C_A,0,  Y_D = C_D,out/C_A,0
pub fn conversion_and_yield(
    trajectory: &Trajectory,
    initial: &[f64],
) -> Result<(f64, f64), ReactorError> {
    let a = Species::A.index();
    let d = Species::D.index();
    if initial.len() != N_SPECIES {
        return Err(ReactorError::InvalidInitialState(format!(
            "expected {} concentrations, got {}",
            N_SPECIES,
            initial.len()
        )));
    }
    let c_a0 = initial[a];
    if c_a0 == 0.0 {
        return Err(ReactorError::DivideByZero);
    }
    let outlet = trajectory.last_row();
    let conversion = (c_a0 - outlet[a]) / c_a0;
    let yield_d = outlet[d] / c_a0;
    Ok((conversion, yield_d))
}

/// Reactor simulation task
///
/// # Usage Pattern
/// 1. `new()`
/// 2. `set_problem()` - rate constants and inlet composition
/// 3. `set_domain()` - sample points along the reactor (or residence time)
/// 4. optional: `set_network()` for non-elementary kinetics, `set_solver_params()`
/// 5. `solve()`
/// 6. `conversion_and_yield()`, `pretty_print()`, `save_csv()`, `save_json()`
#[derive(Debug, Clone)]
pub struct PFRTask {
    pub problem_name: Option<String>,
    pub problem_description: Option<String>,
    /// R1 and R2 kinetics
    pub network: Option<ReactionNetwork>,
    /// inlet concentrations A, B, C, D, E
    pub initial: Vec<f64>,
    pub domain: Option<IntegrationDomain>,
    pub solver_params: SolverParams,
    pub trajectory: Option<Trajectory>,
}

impl Default for PFRTask {
    fn default() -> Self {
        Self::new()
    }
}

impl PFRTask {
    pub fn new() -> Self {
        Self {
            problem_name: None,
            problem_description: None,
            network: None,
            initial: Vec::new(),
            domain: None,
            solver_params: SolverParams::default(),
            trajectory: None,
        }
    }
    /////////////////////////////////SETTERS////////////////////////////////////////////////
    pub fn set_problem_name(&mut self, name: &str) {
        self.problem_name = Some(name.to_string());
    }

    pub fn set_problem_description(&mut self, description: &str) {
        self.problem_description = Some(description.to_string());
    }

    /// Elementary kinetics with rate constants k1, k2 and inlet composition
    pub fn set_problem(&mut self, k1: f64, k2: f64, initial: Vec<f64>) -> Result<(), ReactorError> {
        let network = ReactionNetwork::elementary(k1, k2)?;
        check_initial_state(&initial)?;
        self.network = Some(network);
        self.initial = initial;
        self.trajectory = None;
        Ok(())
    }

    pub fn set_network(&mut self, network: ReactionNetwork) {
        self.network = Some(network);
        self.trajectory = None;
    }

    pub fn set_rate_laws(&mut self, r1: RateLaw, r2: RateLaw) -> Result<(), ReactorError> {
        self.set_network(ReactionNetwork::with_rate_laws(r1, r2)?);
        Ok(())
    }

    pub fn set_initial(&mut self, initial: Vec<f64>) -> Result<(), ReactorError> {
        check_initial_state(&initial)?;
        self.initial = initial;
        self.trajectory = None;
        Ok(())
    }

    pub fn set_domain(&mut self, domain: IntegrationDomain) {
        self.domain = Some(domain);
        self.trajectory = None;
    }

    pub fn set_solver_params(&mut self, params: SolverParams) -> Result<(), ReactorError> {
        params.validate()?;
        self.solver_params = params;
        self.trajectory = None;
        Ok(())
    }
    ///////////////////////////////////////////VALIDATION////////////////////////////////////////
    /// Checks that kinetics, inlet composition, domain and solver settings are present and valid
    pub fn check_task(&self) -> Result<(), ReactorError> {
        if self.network.is_none() {
            return Err(ReactorError::MissingData(
                "reaction kinetics not set".to_string(),
            ));
        }
        if self.initial.is_empty() {
            return Err(ReactorError::MissingData(
                "inlet concentrations not set".to_string(),
            ));
        }
        check_initial_state(&self.initial)?;
        if self.domain.is_none() {
            return Err(ReactorError::MissingData(
                "integration domain not set".to_string(),
            ));
        }
        self.solver_params.validate()?;
        Ok(())
    }
    ///////////////////////////////////////////SOLUTION////////////////////////////////////////
    pub fn solve(&mut self) -> Result<&Trajectory, ReactorError> {
        self.check_task()?;
        let network = self
            .network
            .as_ref()
            .ok_or_else(|| ReactorError::MissingData("reaction kinetics not set".to_string()))?;
        let domain = self
            .domain
            .as_ref()
            .ok_or_else(|| ReactorError::MissingData("integration domain not set".to_string()))?;
        info!(
            "solving {}: {} samples on [{}, {}] {}",
            self.problem_name.as_deref().unwrap_or("PFR task"),
            domain.len(),
            domain.start(),
            domain.end(),
            domain.variable()
        );
        let trajectory = integrate_network(network, &self.initial, domain, &self.solver_params)?;
        let stats = trajectory.stats();
        info!(
            "solved: {} accepted steps, {} rejected steps, {} rhs evaluations",
            stats.accepted_steps, stats.rejected_steps, stats.rhs_evaluations
        );
        // depleted species may end a few atol below zero
        let lowest = trajectory.matrix().min();
        if lowest < -self.solver_params.atol {
            warn!(
                "concentration {:e} below zero in the solution, check kinetic parameters and tolerances",
                lowest
            );
        }
        Ok(&*self.trajectory.insert(trajectory))
    }

    pub fn get_trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    fn solved(&self) -> Result<&Trajectory, ReactorError> {
        self.trajectory
            .as_ref()
            .ok_or_else(|| ReactorError::MissingData("task is not solved yet".to_string()))
    }

    pub fn conversion_and_yield(&self) -> Result<(f64, f64), ReactorError> {
        conversion_and_yield(self.solved()?, &self.initial)
    }
    ///////////////////////////////////////////OUTPUT////////////////////////////////////////
    /// Prints every `every`-th sample (and the outlet) with conversion and yield
    pub fn pretty_print(&self, every: usize) -> Result<(), ReactorError> {
        let trajectory = self.solved()?;
        println!("{}", self.table(every)?);
        if let Some(network) = &self.network {
            for line in network.describe() {
                println!("{}", line);
            }
        }
        match conversion_and_yield(trajectory, &self.initial) {
            Ok((x_a, y_d)) => println!("X_A = {:.6}, Y_D = {:.6}", x_a, y_d),
            Err(e) => println!("X_A, Y_D undefined: {}", e),
        }
        Ok(())
    }

    /// table of the subsampled trajectory
    pub fn table(&self, every: usize) -> Result<Table, ReactorError> {
        let trajectory = self.solved()?;
        let every = every.max(1);
        let mut table = Table::new();
        let mut header = vec![Cell::new(&trajectory.domain().variable().to_string())];
        header.extend(Species::ALL.iter().map(|s| Cell::new(s.name())));
        table.add_row(Row::new(header));
        let last = trajectory.n_samples() - 1;
        for (i, x) in trajectory.domain().points().iter().enumerate() {
            if i % every != 0 && i != last {
                continue;
            }
            let mut cells = vec![Cell::new(&format!("{:.4}", x))];
            cells.extend(
                trajectory
                    .matrix()
                    .row(i)
                    .iter()
                    .map(|c| Cell::new(&format!("{:.6}", c))),
            );
            table.add_row(Row::new(cells));
        }
        Ok(table)
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ReactorError> {
        self.solved()?.save_csv(path.as_ref())?;
        info!("trajectory written to {}", path.as_ref().display());
        Ok(())
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ReactorError> {
        self.solved()?.save_json(path.as_ref())?;
        info!("trajectory written to {}", path.as_ref().display());
        Ok(())
    }
}
