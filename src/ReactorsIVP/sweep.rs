//! Parallel parameter sweep over (k1, k2) pairs.
//!
//! Each run owns its network, state and solver buffers, so the runs are executed with
//! rayon without any locking. Results come back in the order of the input pairs; a failed
//! run does not affect the others.
use super::PlugFlowReactor::{Trajectory, conversion_and_yield, integrate};
use super::domain::IntegrationDomain;
use super::reactor_error::ReactorError;
use log::info;
use rayon::prelude::*;

#[derive(Debug)]
pub struct SweepResult {
    pub k1: f64,
    pub k2: f64,
    pub trajectory: Result<Trajectory, ReactorError>,
}

impl SweepResult {
    /// (X_A, Y_D) of a successful run, the error of the run otherwise
    pub fn into_conversion_and_yield(self, initial: &[f64]) -> Result<(f64, f64), ReactorError> {
        conversion_and_yield(&self.trajectory?, initial)
    }
}

pub fn parameter_sweep(
    initial: &[f64],
    domain: &IntegrationDomain,
    rate_constants: &[(f64, f64)],
) -> Vec<SweepResult> {
    info!("parameter sweep over {} (k1, k2) pairs", rate_constants.len());
    rate_constants
        .par_iter()
        .map(|&(k1, k2)| SweepResult {
            k1,
            k2,
            trajectory: integrate(initial, domain, k1, k2),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::rate_law::KineticsError;
    use crate::ReactorsIVP::domain::IndependentVariable;

    #[test]
    fn test_sweep_matches_sequential_runs() {
        let c0 = [10.0, 5.0, 0.0, 0.0, 2.0];
        let domain =
            IntegrationDomain::linspace(0.0, 2.0, 50, IndependentVariable::ReactorLength).unwrap();
        let pairs: Vec<(f64, f64)> = (0..8).map(|i| (0.05 * i as f64, 0.1)).collect();
        let results = parameter_sweep(&c0, &domain, &pairs);
        assert_eq!(results.len(), pairs.len());
        for (res, (k1, k2)) in results.iter().zip(pairs.iter()) {
            assert_eq!(res.k1, *k1);
            assert_eq!(res.k2, *k2);
            let sequential = integrate(&c0, &domain, *k1, *k2).unwrap();
            assert_eq!(res.trajectory.as_ref().unwrap(), &sequential);
        }
        // faster first reaction converts more A
        let x: Vec<f64> = results
            .into_iter()
            .map(|r| r.into_conversion_and_yield(&c0).unwrap().0)
            .collect();
        assert!(x.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_failed_run_is_isolated() {
        let c0 = [1.0, 1.0, 0.0, 0.0, 0.0];
        let domain =
            IntegrationDomain::linspace(0.0, 1.0, 10, IndependentVariable::ResidenceTime).unwrap();
        let results = parameter_sweep(&c0, &domain, &[(0.1, 0.1), (-1.0, 0.1), (0.2, 0.1)]);
        assert!(results[0].trajectory.is_ok());
        assert!(matches!(
            results[1].trajectory,
            Err(ReactorError::Kinetics(_))
        ));
        assert!(results[2].trajectory.is_ok());
    }

    #[test]
    fn test_failed_run_keeps_its_error() {
        let c0 = [1.0, 1.0, 0.0, 0.0, 0.0];
        let domain =
            IntegrationDomain::linspace(0.0, 1.0, 10, IndependentVariable::ReactorLength).unwrap();
        let mut results = parameter_sweep(&c0, &domain, &[(-1.0, 0.1), (0.1, 0.1)]).into_iter();
        let failed = results.next().unwrap().into_conversion_and_yield(&c0);
        assert!(matches!(
            failed,
            Err(ReactorError::Kinetics(KineticsError::InvalidRateConstant(k))) if k == -1.0
        ));
        let (x_a, _) = results.next().unwrap().into_conversion_and_yield(&c0).unwrap();
        assert!(x_a > 0.0);
        // no inlet A: the outlet metrics are undefined, not an instability
        let results = parameter_sweep(&[0.0, 1.0, 0.0, 0.0, 0.0], &domain, &[(0.1, 0.1)]);
        let r = results.into_iter().next().unwrap();
        assert!(matches!(
            r.into_conversion_and_yield(&[0.0, 1.0, 0.0, 0.0, 0.0]),
            Err(ReactorError::DivideByZero)
        ));
    }
}
