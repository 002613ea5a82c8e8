//! # Integration of the reactor ODEs on a sampling mesh
//!
//! Drives the explicit embedded Runge-Kutta pairs of `ode_solvers`: Dormand–Prince 5(4)
//! (`Dopri5`) and Dormand–Prince 8(5,3) (`Dop853`). Both control the step size with
//!
//! ```text
//! err = sqrt( 1/n Σ (e_i / (atol + rtol*max(|y_i|, |y_new_i|)))^2 )
//! ```
//!
//! The stepper is restarted on every mesh interval `[x_j, x_j+1]`, its last step is cut to
//! end at `x_j+1`, so the returned matrix holds the state at exactly the requested points.
use super::reactor_error::ReactorError;
use nalgebra::{DMatrix, DVector};
use ode_solvers::dop_shared::OutputType;
use ode_solvers::dop853::Dop853;
use ode_solvers::dopri5::Dopri5;
use ode_solvers::{System, Vector5};
use serde::{Deserialize, Serialize};

/// state vector of the integrator: concentrations of A, B, C, D, E
pub type State = Vector5<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverMethod {
    /// Dormand–Prince 5(4)
    #[default]
    Dopri5,
    /// Dormand–Prince 8(5,3), cheaper per unit accuracy at tight tolerances
    Dop853,
}

/// Solver choice, tolerances and step bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    pub method: SolverMethod,
    pub rtol: f64,
    pub atol: f64,
    /// initial step of every interval; `None` lets the solver estimate it
    pub first_step: Option<f64>,
    /// upper bound of the step; `None` means the length of the mesh interval
    pub max_step: Option<f64>,
    /// limit on attempted steps within one mesh interval
    pub max_steps: u32,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            method: SolverMethod::Dopri5,
            rtol: 1e-8,
            atol: 1e-10,
            first_step: None,
            max_step: None,
            max_steps: 1_000_000,
        }
    }
}

impl SolverParams {
    pub fn validate(&self) -> Result<(), ReactorError> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(ReactorError::InvalidConfiguration(
                "rtol must be finite and positive".to_string(),
            ));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(ReactorError::InvalidConfiguration(
                "atol must be finite and positive".to_string(),
            ));
        }
        for (name, value) in [("first_step", self.first_step), ("max_step", self.max_step)] {
            if let Some(h) = value {
                if !h.is_finite() || h <= 0.0 {
                    return Err(ReactorError::InvalidConfiguration(format!(
                        "{} must be finite and positive, got {}",
                        name, h
                    )));
                }
            }
        }
        if self.max_steps == 0 {
            return Err(ReactorError::InvalidConfiguration(
                "max_steps must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Step statistics of one integration run, summed over all mesh intervals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evaluations: usize,
}

/// Integrates one mesh interval and returns the state at `x_end`
fn integrate_interval<F>(
    system: F,
    x: f64,
    x_end: f64,
    y: State,
    params: &SolverParams,
    stats: &mut SolverStats,
) -> Result<State, ReactorError>
where
    F: System<f64, State>,
{
    let h_max = params.max_step.map_or(x_end - x, |h| h.min(x_end - x));
    // zero initial step asks the solver for its own estimate
    let h = params.first_step.map_or(0.0, |h| h.min(h_max));
    // no stiffness test
    let n_stiff = u32::MAX;
    let (outcome, last) = match params.method {
        SolverMethod::Dopri5 => {
            let mut stepper = Dopri5::from_param(
                system,
                x,
                x_end,
                0.0,
                y,
                params.rtol,
                params.atol,
                0.9,
                0.04,
                0.2,
                10.0,
                h_max,
                h,
                params.max_steps,
                n_stiff,
                OutputType::Sparse,
            );
            let outcome = stepper.integrate();
            (outcome, stepper.y_out().last().copied())
        }
        SolverMethod::Dop853 => {
            let mut stepper = Dop853::from_param(
                system,
                x,
                x_end,
                0.0,
                y,
                params.rtol,
                params.atol,
                0.9,
                0.0,
                0.333,
                6.0,
                h_max,
                h,
                params.max_steps,
                n_stiff,
                OutputType::Sparse,
            );
            let outcome = stepper.integrate();
            (outcome, stepper.y_out().last().copied())
        }
    };
    let run = outcome.map_err(|e| {
        ReactorError::NumericInstability(format!(
            "{} on the interval [{:e}, {:e}]",
            e, x, x_end
        ))
    })?;
    stats.accepted_steps += run.accepted_steps as usize;
    stats.rejected_steps += run.rejected_steps as usize;
    stats.rhs_evaluations += run.num_eval as usize;

    let y_end = last.ok_or_else(|| {
        ReactorError::NumericInstability(format!("no output produced at x = {:e}", x_end))
    })?;
    if y_end.iter().any(|v| !v.is_finite()) {
        return Err(ReactorError::NumericInstability(format!(
            "non-finite state at x = {:e}",
            x_end
        )));
    }
    Ok(y_end)
}

/// Integrates `system` from `y0` at `mesh[0]` and returns the state at every mesh point.
///
/// # Returns
/// matrix of shape `mesh.len() × 5`; row 0 is `y0` exactly
///
/// # Errors
/// * `InvalidConfiguration` for bad solver parameters or a `y0` of wrong length
/// * `InvalidDomain` for a mesh with less than 2 or non increasing points
/// * `NumericInstability` for non-finite states, step size underflow or exceeding `max_steps`
pub fn solve_on_mesh<F>(
    system: &F,
    y0: &DVector<f64>,
    mesh: &DVector<f64>,
    params: &SolverParams,
) -> Result<(DMatrix<f64>, SolverStats), ReactorError>
where
    F: System<f64, State> + Clone,
{
    params.validate()?;
    let n = State::zeros().len();
    if y0.len() != n {
        return Err(ReactorError::InvalidConfiguration(format!(
            "initial state has {} entries, system has {}",
            y0.len(),
            n
        )));
    }
    let n_points = mesh.len();
    if n_points < 2 {
        return Err(ReactorError::InvalidDomain(
            "at least 2 mesh points required".to_string(),
        ));
    }
    if mesh.as_slice().windows(2).any(|w| !(w[1] > w[0])) {
        return Err(ReactorError::InvalidDomain(
            "mesh must be strictly increasing".to_string(),
        ));
    }

    let mut stats = SolverStats::default();
    let mut solution = DMatrix::<f64>::zeros(n_points, n);
    solution.set_row(0, &y0.transpose());

    let mut y = State::from_column_slice(y0.as_slice());
    for j in 1..n_points {
        y = integrate_interval(system.clone(), mesh[j - 1], mesh[j], y, params, &mut stats)?;
        for (i, value) in y.iter().enumerate() {
            solution[(j, i)] = *value;
        }
    }

    Ok((solution, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// dy_i/dx = -lambda_i*y_i
    #[derive(Clone)]
    struct Decay {
        lambda: [f64; 5],
    }
    impl System<f64, State> for Decay {
        fn system(&self, _x: f64, y: &State, dy: &mut State) {
            for i in 0..5 {
                dy[i] = -self.lambda[i] * y[i];
            }
        }
    }

    /// harmonic oscillator y'' = -y in the first two components
    #[derive(Clone)]
    struct Oscillator;
    impl System<f64, State> for Oscillator {
        fn system(&self, _x: f64, y: &State, dy: &mut State) {
            dy.fill(0.0);
            dy[0] = y[1];
            dy[1] = -y[0];
        }
    }

    /// dy/dx = y^2 blows up at x = 1 for y(0) = 1
    #[derive(Clone)]
    struct BlowUp;
    impl System<f64, State> for BlowUp {
        fn system(&self, _x: f64, y: &State, dy: &mut State) {
            dy.fill(0.0);
            dy[0] = y[0] * y[0];
        }
    }

    fn mesh(start: f64, end: f64, n: usize) -> DVector<f64> {
        DVector::from_fn(n, |i, _| start + (end - start) * i as f64 / (n - 1) as f64)
    }

    #[test]
    fn test_exponential_decay() {
        let sys = Decay {
            lambda: [2.0, 0.5, 0.0, 0.0, 0.0],
        };
        let y0 = DVector::from_vec(vec![3.0, 1.0, 0.0, 0.0, 4.0]);
        let x = mesh(0.0, 2.0, 21);
        let (sol, stats) = solve_on_mesh(&sys, &y0, &x, &SolverParams::default()).unwrap();
        assert_eq!(sol.nrows(), 21);
        assert_eq!(sol.ncols(), 5);
        assert_eq!(sol[(0, 0)], 3.0);
        for i in 0..21 {
            assert_relative_eq!(sol[(i, 0)], 3.0 * (-2.0 * x[i]).exp(), max_relative = 1e-7);
            assert_relative_eq!(sol[(i, 1)], (-0.5 * x[i]).exp(), max_relative = 1e-7);
            assert_eq!(sol[(i, 4)], 4.0);
        }
        assert!(stats.accepted_steps >= 20);
        assert!(stats.rhs_evaluations > stats.accepted_steps);
    }

    #[test]
    fn test_oscillator_irregular_mesh() {
        let y0 = DVector::from_vec(vec![0.0, 1.0, 0.0, 0.0, 0.0]);
        let x = DVector::from_vec(vec![0.0, 1e-3, 0.5, 3.0, 10.0]);
        for method in [SolverMethod::Dopri5, SolverMethod::Dop853] {
            let params = SolverParams {
                method,
                ..SolverParams::default()
            };
            let (sol, _) = solve_on_mesh(&Oscillator, &y0, &x, &params).unwrap();
            for i in 0..x.len() {
                assert_relative_eq!(sol[(i, 0)], x[i].sin(), epsilon = 1e-6);
                assert_relative_eq!(sol[(i, 1)], x[i].cos(), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_first_and_max_step_are_respected() {
        let sys = Decay {
            lambda: [1.0; 5],
        };
        let y0 = DVector::from_vec(vec![1.0; 5]);
        let x = mesh(0.0, 1.0, 3);
        let params = SolverParams {
            first_step: Some(1e-3),
            max_step: Some(0.01),
            ..SolverParams::default()
        };
        let (sol, stats) = solve_on_mesh(&sys, &y0, &x, &params).unwrap();
        // two intervals of 0.5 with steps not longer than 0.01
        assert!(stats.accepted_steps >= 100);
        assert_relative_eq!(sol[(2, 3)], (-1.0f64).exp(), max_relative = 1e-7);
    }

    #[test]
    fn test_blow_up_is_reported() {
        let y0 = DVector::from_vec(vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        let x = mesh(0.0, 2.0, 5);
        let params = SolverParams {
            max_steps: 10_000,
            ..SolverParams::default()
        };
        let r = solve_on_mesh(&BlowUp, &y0, &x, &params);
        assert!(matches!(r, Err(ReactorError::NumericInstability(_))));
    }

    #[test]
    fn test_invalid_params() {
        let params = SolverParams {
            rtol: 0.0,
            ..SolverParams::default()
        };
        assert!(params.validate().is_err());
        let params = SolverParams {
            max_step: Some(f64::NAN),
            ..SolverParams::default()
        };
        assert!(params.validate().is_err());
        let params = SolverParams {
            first_step: Some(-1.0),
            ..SolverParams::default()
        };
        assert!(params.validate().is_err());
        let params = SolverParams {
            max_steps: 0,
            ..SolverParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_bad_mesh_and_dimension() {
        let sys = Decay {
            lambda: [1.0; 5],
        };
        let y0 = DVector::from_vec(vec![1.0; 5]);
        let bad = DVector::from_vec(vec![0.0, 1.0, 0.5]);
        let r = solve_on_mesh(&sys, &y0, &bad, &SolverParams::default());
        assert!(matches!(r, Err(ReactorError::InvalidDomain(_))));
        let y0 = DVector::from_vec(vec![1.0, 2.0]);
        let r = solve_on_mesh(&sys, &y0, &mesh(0.0, 1.0, 3), &SolverParams::default());
        assert!(matches!(r, Err(ReactorError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_serde_defaults() {
        let params: SolverParams =
            serde_json::from_str(r#"{"rtol": 1e-6, "method": "Dop853"}"#).unwrap();
        assert_eq!(params.rtol, 1e-6);
        assert_eq!(params.method, SolverMethod::Dop853);
        assert_eq!(params.atol, SolverParams::default().atol);
        assert_eq!(params.max_step, None);
        assert_eq!(params.max_steps, 1_000_000);
        let back: SolverParams =
            serde_json::from_str(&serde_json::to_string(&params).unwrap()).unwrap();
        assert_eq!(back, params);
    }
}
