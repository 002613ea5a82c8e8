//! Fixed reaction network of the plug-flow reactor:
//!
//! ```text
//! R1: A + B -> C
//! R2: A + C -> D
//! E is inert
//! ```
//!
//! The right-hand side is assembled from the stoichiometric matrix ν (reactions × species)
//! and the vector of reaction rates r: dC/dL = νᵀ·r
//!
//! Rate laws are evaluated on max(C_i, 0). Round-off may push a depleted species slightly
//! below zero, such a species then takes no further part in any reaction.
use super::ivp_solver::State;
use super::reactor_error::ReactorError;
use crate::Kinetics::rate_law::{KineticsError, RateLaw, RateLawCalculator};
use nalgebra::{DVector, SMatrix};
use ode_solvers::System;
use std::fmt;

pub const N_SPECIES: usize = 5;
pub const N_REACTIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    A,
    B,
    C,
    D,
    E,
}

impl Species {
    pub const ALL: [Species; N_SPECIES] = [Species::A, Species::B, Species::C, Species::D, Species::E];

    /// column of the species in state vectors and trajectories
    pub fn index(&self) -> usize {
        match self {
            Species::A => 0,
            Species::B => 1,
            Species::C => 2,
            Species::D => 3,
            Species::E => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::A => "A",
            Species::B => "B",
            Species::C => "C",
            Species::D => "D",
            Species::E => "E",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// substances entering the rate law of each reaction
const PARTICIPANTS: [[Species; 2]; N_REACTIONS] = [[Species::A, Species::B], [Species::A, Species::C]];

/// stoichiometric matrix, rows - reactions, columns - A, B, C, D, E
pub fn stoichiometric_matrix() -> SMatrix<f64, N_REACTIONS, N_SPECIES> {
    SMatrix::<f64, N_REACTIONS, N_SPECIES>::from_row_slice(&[
        -1.0, -1.0, 1.0, 0.0, 0.0, //
        -1.0, 0.0, -1.0, 1.0, 0.0,
    ])
}

pub const REACTION_EQUATIONS: [&str; N_REACTIONS] = ["A+B=>C", "A+C=>D"];

#[derive(Debug, Clone, PartialEq)]
pub struct ReactionNetwork {
    rate_laws: [RateLaw; N_REACTIONS],
    stoich: SMatrix<f64, N_REACTIONS, N_SPECIES>,
}

impl ReactionNetwork {
    /// both reactions elementary (first order in each reactant)
    pub fn elementary(k1: f64, k2: f64) -> Result<Self, ReactorError> {
        Self::with_rate_laws(RateLaw::elementary(k1)?, RateLaw::elementary(k2)?)
    }

    /// arbitrary rate laws; power-law descriptors must carry two exponents,
    /// over [C_A, C_B] for R1 and over [C_A, C_C] for R2
    pub fn with_rate_laws(r1: RateLaw, r2: RateLaw) -> Result<Self, ReactorError> {
        r1.validate(PARTICIPANTS[0].len())?;
        r2.validate(PARTICIPANTS[1].len())?;
        Ok(Self {
            rate_laws: [r1, r2],
            stoich: stoichiometric_matrix(),
        })
    }

    pub fn rate_laws(&self) -> &[RateLaw; N_REACTIONS] {
        &self.rate_laws
    }

    fn rates_at(&self, c: &[f64]) -> Result<[f64; N_REACTIONS], KineticsError> {
        let mut rates = [0.0; N_REACTIONS];
        for (j, law) in self.rate_laws.iter().enumerate() {
            let conc = PARTICIPANTS[j].map(|s| c[s.index()].max(0.0));
            rates[j] = law.rate(&conc)?;
        }
        Ok(rates)
    }

    fn fill_derivatives(&self, c: &[f64], dc: &mut [f64]) -> Result<(), KineticsError> {
        let rates = self.rates_at(c)?;
        for i in 0..N_SPECIES {
            dc[i] = 0.0;
            for j in 0..N_REACTIONS {
                let nu = self.stoich[(j, i)];
                // inert entries stay exactly zero
                if nu != 0.0 {
                    dc[i] += nu * rates[j];
                }
            }
        }
        Ok(())
    }

    fn check_len(c: &DVector<f64>) -> Result<(), ReactorError> {
        if c.len() != N_SPECIES {
            return Err(ReactorError::InvalidInitialState(format!(
                "species vector must have {} entries, got {}",
                N_SPECIES,
                c.len()
            )));
        }
        Ok(())
    }

    /// rates of R1 and R2 at the composition `c`
    pub fn reaction_rates(&self, c: &DVector<f64>) -> Result<DVector<f64>, ReactorError> {
        Self::check_len(c)?;
        let rates = self.rates_at(c.as_slice())?;
        Ok(DVector::from_column_slice(&rates))
    }

    /// dC/dL for every species
    pub fn derivatives(&self, c: &DVector<f64>) -> Result<DVector<f64>, ReactorError> {
        Self::check_len(c)?;
        let mut dc = DVector::<f64>::zeros(N_SPECIES);
        self.fill_derivatives(c.as_slice(), dc.as_mut_slice())?;
        Ok(dc)
    }

    /// rate law formulas in terms of species names
    pub fn describe(&self) -> Vec<String> {
        self.rate_laws
            .iter()
            .enumerate()
            .map(|(j, law)| {
                let mut formula = law.formula();
                for (p, s) in PARTICIPANTS[j].iter().enumerate() {
                    formula = formula.replace(&format!("C{}", p), &format!("C_{}", s.name()));
                }
                format!("{}: r{} = {} ({})", REACTION_EQUATIONS[j], j + 1, formula, law.kind())
            })
            .collect()
    }
}

// the system is autonomous
impl System<f64, State> for ReactionNetwork {
    fn system(&self, _x: f64, y: &State, dy: &mut State) {
        // exponents are checked in `with_rate_laws`; NaN makes the solver reject the step
        if self.fill_derivatives(y.as_slice(), dy.as_mut_slice()).is_err() {
            dy.fill(f64::NAN);
        }
    }
}
