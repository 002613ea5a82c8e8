use crate::ReactorsIVP::PlugFlowReactor::PFRTask;
use crate::ReactorsIVP::domain::{IndependentVariable, IntegrationDomain};
use crate::ReactorsIVP::network::Species;
use crate::ReactorsIVP::reactor_error::ReactorError;
use crate::ReactorsIVP::sweep::parameter_sweep;
use log::error;
use prettytable::{Table, row};

pub fn pfr_examples(task: usize) {
    //
    match task {
        0 => {
            // concentration profiles along the reactor length
            let mut pfr = PFRTask::new();
            pfr.set_problem_name("PFR, length domain");
            if let Err(e) = run_length_profile(&mut pfr) {
                error!("{}", e);
            }
        }
        1 => {
            // residence time variant: tau = 0.5 h, k1 = 0.3 1/h, k2 = 0.1 1/h
            let mut pfr = PFRTask::new();
            pfr.set_problem_name("PFR, residence time domain");
            if let Err(e) = run_residence_time_profile(&mut pfr) {
                error!("{}", e);
            }
        }
        2 => {
            // outlet conversion and yield for a grid of rate constants
            match sweep_table(&[0.1, 0.3, 1.0], &[0.1, 0.5, 1.0]) {
                Ok(table) => {
                    table.printstd();
                }
                Err(e) => error!("{}", e),
            }
        }
        _ => {
            println!("Wrong task number");
        }
    }
}

/// Solves the reference problem on the length domain and returns (X_A, Y_D)
fn run_length_profile(pfr: &mut PFRTask) -> Result<(f64, f64), ReactorError> {
    pfr.set_problem(0.3, 0.5, vec![10.0, 5.0, 0.0, 0.0, 2.0])?;
    pfr.set_domain(IntegrationDomain::linspace(
        0.0,
        5.0,
        100,
        IndependentVariable::ReactorLength,
    )?);
    pfr.solve()?;
    pfr.pretty_print(10)?;
    pfr.conversion_and_yield()
}

fn run_residence_time_profile(pfr: &mut PFRTask) -> Result<(f64, f64), ReactorError> {
    pfr.set_problem(0.3, 0.1, vec![10.0, 10.0, 0.0, 0.0, 2.0])?;
    pfr.set_domain(IntegrationDomain::linspace(
        0.0,
        0.5,
        100,
        IndependentVariable::ResidenceTime,
    )?);
    pfr.solve()?;
    pfr.pretty_print(10)?;
    pfr.conversion_and_yield()
}

/// One row per (k1, k2) pair; a failed run is logged and left out
fn sweep_table(k1_values: &[f64], k2_values: &[f64]) -> Result<Table, ReactorError> {
    let c0 = [10.0, 5.0, 0.0, 0.0, 2.0];
    let domain = IntegrationDomain::linspace(0.0, 5.0, 100, IndependentVariable::ReactorLength)?;
    let mut pairs = Vec::new();
    for &k1 in k1_values {
        for &k2 in k2_values {
            pairs.push((k1, k2));
        }
    }
    let mut table = Table::new();
    table.add_row(row!["k1", "k2", "X_A", "Y_D", "C_D,out"]);
    for res in parameter_sweep(&c0, &domain, &pairs) {
        let (k1, k2) = (res.k1, res.k2);
        let d_out = match &res.trajectory {
            Ok(trajectory) => trajectory.last_row()[Species::D.index()],
            Err(_) => f64::NAN,
        };
        match res.into_conversion_and_yield(&c0) {
            Ok((x_a, y_d)) => {
                table.add_row(row![
                    k1,
                    k2,
                    format!("{:.4}", x_a),
                    format!("{:.4}", y_d),
                    format!("{:.4}", d_out)
                ]);
            }
            Err(e) => error!("k1 = {}, k2 = {}: {}", k1, k2, e),
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_profile_example() {
        let mut pfr = PFRTask::new();
        let (x_a, y_d) = run_length_profile(&mut pfr).unwrap();
        assert!(x_a > 0.0 && x_a < 1.0);
        assert!(y_d > 0.0 && y_d < x_a);
        let trajectory = pfr.get_trajectory().unwrap();
        assert_eq!(trajectory.n_samples(), 100);
        assert_eq!(trajectory.last_row()[Species::E.index()], 2.0);
    }

    #[test]
    fn test_residence_time_example() {
        let mut pfr = PFRTask::new();
        let (x_a, y_d) = run_residence_time_profile(&mut pfr).unwrap();
        assert!(x_a > 0.0 && x_a < 1.0);
        assert!(y_d >= 0.0 && y_d < x_a);
        assert_eq!(
            pfr.get_trajectory().unwrap().domain().variable(),
            IndependentVariable::ResidenceTime
        );
    }

    #[test]
    fn test_sweep_table_example() {
        let table = sweep_table(&[0.1, 0.3, 1.0], &[0.1, 0.5, 1.0]).unwrap();
        // header + 9 runs
        assert_eq!(table.len(), 10);
        // the failing run is left out
        let table = sweep_table(&[-0.1, 0.3], &[0.1]).unwrap();
        assert_eq!(table.len(), 2);
    }
}
