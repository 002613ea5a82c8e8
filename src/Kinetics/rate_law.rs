use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// error types of the kinetics evaluator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KineticsError {
    #[error("Invalid rate constant k = {0}: must be finite and non-negative")]
    InvalidRateConstant(f64),
    #[error("Length mismatch: {concentrations} concentrations vs {exponents} exponents")]
    LengthMismatch {
        concentrations: usize,
        exponents: usize,
    },
}

fn check_rate_constant(k: f64) -> Result<(), KineticsError> {
    if !k.is_finite() || k < 0.0 {
        return Err(KineticsError::InvalidRateConstant(k));
    }
    Ok(())
}

/// Π C_i^n_i. `powf(0.0, 0.0)` is 1.0 so zero orders are neutral.
fn concentration_product(concentrations: &[f64], exponents: &[f64]) -> f64 {
    concentrations
        .iter()
        .zip(exponents.iter())
        .map(|(c, n)| c.powf(*n))
        .product()
}

/// Generalized power-law rate r = k·∏ C_i^n_i.
///
/// # Arguments
/// * `k` - rate constant (finite, >= 0)
/// * `concentrations` - concentrations of participating substances
/// * `exponents` - reaction orders, one per concentration
///
/// # Returns
/// * `Err(KineticsError::InvalidRateConstant)` if `k` is negative or not finite
/// * `Err(KineticsError::LengthMismatch)` if the sequences differ in length
pub fn rate(k: f64, concentrations: &[f64], exponents: &[f64]) -> Result<f64, KineticsError> {
    check_rate_constant(k)?;
    if concentrations.len() != exponents.len() {
        return Err(KineticsError::LengthMismatch {
            concentrations: concentrations.len(),
            exponents: exponents.len(),
        });
    }
    Ok(k * concentration_product(concentrations, exponents))
}

#[enum_dispatch]
pub trait RateLawCalculator {
    fn rate_constant(&self) -> f64;
    /// reaction rate for the given concentrations of participating substances
    fn rate(&self, concentrations: &[f64]) -> Result<f64, KineticsError>;
    /// sum of reaction orders for a reaction with `n_participants` substances
    fn overall_order(&self, n_participants: usize) -> f64;
    /// human readable form of the rate law, e.g. "0.3*C0^1*C1^1"
    fn formula(&self) -> String;
}

/////////////////////////ZERO ORDER///////////////////////////////////////////////////////////////
/// r = k, concentrations are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroOrderStruct {
    pub k: f64,
}

impl RateLawCalculator for ZeroOrderStruct {
    fn rate_constant(&self) -> f64 {
        self.k
    }
    fn rate(&self, _concentrations: &[f64]) -> Result<f64, KineticsError> {
        check_rate_constant(self.k)?;
        Ok(self.k)
    }
    fn overall_order(&self, _n_participants: usize) -> f64 {
        0.0
    }
    fn formula(&self) -> String {
        format!("{}", self.k)
    }
}

/////////////////////////ELEMENTARY///////////////////////////////////////////////////////////////
/// all reaction orders equal to one: r = k * Π C_i
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementaryStruct {
    pub k: f64,
}

impl RateLawCalculator for ElementaryStruct {
    fn rate_constant(&self) -> f64 {
        self.k
    }
    fn rate(&self, concentrations: &[f64]) -> Result<f64, KineticsError> {
        check_rate_constant(self.k)?;
        Ok(self.k * concentrations.iter().product::<f64>())
    }
    fn overall_order(&self, n_participants: usize) -> f64 {
        n_participants as f64
    }
    fn formula(&self) -> String {
        format!("{}*Π C_i", self.k)
    }
}

/////////////////////////POWER LAW///////////////////////////////////////////////////////////////
/// empirical kinetics with arbitrary (also fractional) orders: r = k * Π C_i^n_i
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerLawStruct {
    pub k: f64,
    pub exponents: Vec<f64>,
}

impl RateLawCalculator for PowerLawStruct {
    fn rate_constant(&self) -> f64 {
        self.k
    }
    fn rate(&self, concentrations: &[f64]) -> Result<f64, KineticsError> {
        rate(self.k, concentrations, &self.exponents)
    }
    fn overall_order(&self, _n_participants: usize) -> f64 {
        self.exponents.iter().sum()
    }
    fn formula(&self) -> String {
        let factors: Vec<String> = self
            .exponents
            .iter()
            .enumerate()
            .map(|(i, n)| format!("C{}^{}", i, n))
            .collect();
        if factors.is_empty() {
            return format!("{}", self.k);
        }
        format!("{}*{}", self.k, factors.join("*"))
    }
}

/// Rate law descriptor. The variant is an explicit tag; in JSON it is stored in the
/// "type" field, e.g. `{"type": "PowerLaw", "k": 0.1, "exponents": [2.0, 2.0]}`
#[enum_dispatch(RateLawCalculator)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RateLaw {
    ZeroOrder(ZeroOrderStruct),
    Elementary(ElementaryStruct),
    PowerLaw(PowerLawStruct),
}

impl RateLaw {
    pub fn zero_order(k: f64) -> Result<Self, KineticsError> {
        check_rate_constant(k)?;
        Ok(RateLaw::ZeroOrder(ZeroOrderStruct { k }))
    }

    pub fn elementary(k: f64) -> Result<Self, KineticsError> {
        check_rate_constant(k)?;
        Ok(RateLaw::Elementary(ElementaryStruct { k }))
    }

    pub fn power_law(k: f64, exponents: Vec<f64>) -> Result<Self, KineticsError> {
        check_rate_constant(k)?;
        Ok(RateLaw::PowerLaw(PowerLawStruct { k, exponents }))
    }

    /// Checks the descriptor against the number of substances taking part in the reaction.
    /// Only power-law descriptors carry exponents, so only they can mismatch.
    pub fn validate(&self, n_participants: usize) -> Result<(), KineticsError> {
        check_rate_constant(self.rate_constant())?;
        if let RateLaw::PowerLaw(law) = self {
            if law.exponents.len() != n_participants {
                return Err(KineticsError::LengthMismatch {
                    concentrations: n_participants,
                    exponents: law.exponents.len(),
                });
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RateLaw::ZeroOrder(_) => "zero order",
            RateLaw::Elementary(_) => "elementary",
            RateLaw::PowerLaw(_) => "power law",
        }
    }
}
