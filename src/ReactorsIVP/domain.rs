//! Integration domain: the mesh of sample points along the reactor.
//!
//! Length and residence time variants of the model are the same engine; the independent
//! variable only changes the axis label and unit.
use super::reactor_error::ReactorError;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IndependentVariable {
    #[default]
    ReactorLength,
    ResidenceTime,
}

impl IndependentVariable {
    pub fn label(&self) -> &'static str {
        match self {
            IndependentVariable::ReactorLength => "L",
            IndependentVariable::ResidenceTime => "tau",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            IndependentVariable::ReactorLength => "m",
            IndependentVariable::ResidenceTime => "h",
        }
    }
}

impl fmt::Display for IndependentVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.unit())
    }
}

/// Strictly increasing sample points with at least two entries
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationDomain {
    points: DVector<f64>,
    variable: IndependentVariable,
}

impl IntegrationDomain {
    /// `n_points` evenly spaced samples from `start` to `end` inclusive
    pub fn linspace(
        start: f64,
        end: f64,
        n_points: usize,
        variable: IndependentVariable,
    ) -> Result<Self, ReactorError> {
        if n_points < 2 {
            return Err(ReactorError::InvalidDomain(format!(
                "at least 2 sample points required, got {}",
                n_points
            )));
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(ReactorError::InvalidDomain(format!(
                "end ({}) must be finite and greater than start ({})",
                end, start
            )));
        }
        let step = (end - start) / (n_points - 1) as f64;
        let mut points: Vec<f64> = (0..n_points).map(|i| start + step * i as f64).collect();
        // last sample lands exactly on `end`
        points[n_points - 1] = end;
        Self::from_points(points, variable)
    }

    pub fn from_points(points: Vec<f64>, variable: IndependentVariable) -> Result<Self, ReactorError> {
        if points.len() < 2 {
            return Err(ReactorError::InvalidDomain(format!(
                "at least 2 sample points required, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|x| !x.is_finite()) {
            return Err(ReactorError::InvalidDomain(format!(
                "sample {} is not finite: {}",
                i, points[i]
            )));
        }
        if let Some(i) = points.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ReactorError::InvalidDomain(format!(
                "samples must be strictly increasing: x[{}] = {} >= x[{}] = {}",
                i,
                points[i],
                i + 1,
                points[i + 1]
            )));
        }
        Ok(Self {
            points: DVector::from_vec(points),
            variable,
        })
    }

    pub fn points(&self) -> &DVector<f64> {
        &self.points
    }

    pub fn variable(&self) -> IndependentVariable {
        self.variable
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace() {
        let d = IntegrationDomain::linspace(0.0, 5.0, 100, IndependentVariable::ReactorLength)
            .unwrap();
        assert_eq!(d.len(), 100);
        assert_eq!(d.start(), 0.0);
        assert_eq!(d.end(), 5.0);
        assert_relative_eq!(d.points()[1], 5.0 / 99.0, epsilon = 1e-15);
        assert_eq!(d.variable().label(), "L");
    }

    #[test]
    fn test_too_few_points() {
        let r = IntegrationDomain::linspace(0.0, 1.0, 1, IndependentVariable::ResidenceTime);
        assert!(matches!(r, Err(ReactorError::InvalidDomain(_))));
        let r = IntegrationDomain::from_points(vec![0.0], IndependentVariable::ResidenceTime);
        assert!(matches!(r, Err(ReactorError::InvalidDomain(_))));
    }

    #[test]
    fn test_not_increasing() {
        let r = IntegrationDomain::from_points(
            vec![0.0, 1.0, 1.0, 2.0],
            IndependentVariable::ReactorLength,
        );
        assert!(matches!(r, Err(ReactorError::InvalidDomain(_))));
        let r = IntegrationDomain::linspace(1.0, 0.0, 10, IndependentVariable::ReactorLength);
        assert!(matches!(r, Err(ReactorError::InvalidDomain(_))));
        let r = IntegrationDomain::from_points(
            vec![0.0, f64::NAN],
            IndependentVariable::ReactorLength,
        );
        assert!(matches!(r, Err(ReactorError::InvalidDomain(_))));
    }

    #[test]
    fn test_irregular_points() {
        let d = IntegrationDomain::from_points(
            vec![0.0, 0.01, 0.5, 3.0],
            IndependentVariable::ResidenceTime,
        )
        .unwrap();
        assert_eq!(d.len(), 4);
        assert_eq!(format!("{}", d.variable()), "tau (h)");
    }
}
