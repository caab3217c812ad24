use crate::consts::{DEFAULT_P_ACCEPT, DEFAULT_TEMPERATURE};
use crate::error::{CfResult, CipherError};
use clap::ValueEnum;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How a proposal that does not raise the score may still be accepted.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceRule {
    /// Constant probability `p_accept`.
    #[default]
    Fixed,
    /// `exp((candidate - current) / temperature)`, floored at `p_accept`.
    Metropolis,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceptance {
    pub rule: AcceptanceRule,
    pub p_accept: f64,
    pub temperature: f64,
}

impl Default for Acceptance {
    fn default() -> Self {
        Self::fixed(DEFAULT_P_ACCEPT)
    }
}

impl Acceptance {
    pub fn fixed(p_accept: f64) -> Self {
        Self {
            rule: AcceptanceRule::Fixed,
            p_accept,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn metropolis(temperature: f64, p_accept: f64) -> Self {
        Self {
            rule: AcceptanceRule::Metropolis,
            p_accept,
            temperature,
        }
    }

    pub fn validate(&self) -> CfResult<()> {
        if !(0.0..=1.0).contains(&self.p_accept) {
            return Err(CipherError::Config(format!(
                "p_accept must lie in [0, 1], got {}",
                self.p_accept
            )));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(CipherError::Config(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Probability of moving to a candidate `delta = candidate - current` away.
    #[inline(always)]
    pub fn probability(&self, delta: f64) -> f64 {
        if delta > 0.0 {
            return 1.0;
        }
        match self.rule {
            AcceptanceRule::Fixed => self.p_accept,
            AcceptanceRule::Metropolis => (delta / self.temperature)
                .exp()
                .max(self.p_accept)
                .min(1.0),
        }
    }

    /// Draws once from `rng` for a non-improving proposal.
    #[inline(always)]
    pub fn accepts_worse(&self, delta: f64, rng: &mut Rng) -> bool {
        rng.f64() < self.probability(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improvement_always_accepted() {
        for acc in [Acceptance::fixed(0.0), Acceptance::metropolis(0.5, 0.0)] {
            assert_eq!(acc.probability(1e-12), 1.0);
        }
    }

    #[test]
    fn test_fixed_ignores_delta() {
        let acc = Acceptance::fixed(0.01);
        assert_eq!(acc.probability(0.0), 0.01);
        assert_eq!(acc.probability(-1000.0), 0.01);
    }

    #[test]
    fn test_metropolis_decays_with_floor() {
        let acc = Acceptance::metropolis(1.0, 0.001);
        assert_eq!(acc.probability(0.0), 1.0);
        assert!((acc.probability(-1.0) - (-1.0f64).exp()).abs() < 1e-12);
        assert_eq!(acc.probability(-1000.0), 0.001);
    }

    #[test]
    fn test_zero_probability_never_accepts() {
        let acc = Acceptance::fixed(0.0);
        let mut rng = Rng::with_seed(7);
        assert!((0..1000).all(|_| !acc.accepts_worse(-0.1, &mut rng)));
    }

    #[test]
    fn test_validation() {
        assert!(Acceptance::fixed(1.5).validate().is_err());
        assert!(Acceptance::fixed(-0.1).validate().is_err());
        assert!(Acceptance::metropolis(0.0, 0.01).validate().is_err());
        assert!(Acceptance::default().validate().is_ok());
    }
}
