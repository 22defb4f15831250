// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::str::FromStr;

use float_cmp::approx_eq;
use rand::Rng;
use rand::distr::Bernoulli as BernoulliSampler;
use rand_distr::Distribution as _;

use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::sampling::special::{ln_choose, ln_gamma, xlogy};
use crate::sampling_err;

// Densities for Beta and Gamma diverge at the edges of their support, so
// both report a support and mode nudged inward by this much.
const EDGE_OFFSET: f64 = 0.001;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DistributionType {
    Normal,
    Exponential,
    Gamma,
    Beta,
    Bernoulli,
    Binomial,
}

impl DistributionType {
    pub const ALL: [DistributionType; 6] = [
        DistributionType::Normal,
        DistributionType::Exponential,
        DistributionType::Gamma,
        DistributionType::Beta,
        DistributionType::Bernoulli,
        DistributionType::Binomial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DistributionType::Normal => "normal",
            DistributionType::Exponential => "exponential",
            DistributionType::Gamma => "gamma",
            DistributionType::Beta => "beta",
            DistributionType::Bernoulli => "bernoulli",
            DistributionType::Binomial => "binomial",
        }
    }

    pub fn is_continuous(self) -> bool {
        !matches!(self, DistributionType::Bernoulli | DistributionType::Binomial)
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DistributionType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Sampling,
                    ErrorCode::InvalidDistribution,
                    Some(format!("unknown distribution type '{s}'")),
                )
            })
    }
}

/// Named parameter slots across all distribution variants.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Parameter {
    Mu,
    Sigma,
    Lambda,
    K,
    Theta,
    Alpha,
    Beta,
    P,
    N,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::Mu,
        Parameter::Sigma,
        Parameter::Lambda,
        Parameter::K,
        Parameter::Theta,
        Parameter::Alpha,
        Parameter::Beta,
        Parameter::P,
        Parameter::N,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Mu => "mu",
            Parameter::Sigma => "sigma",
            Parameter::Lambda => "lambda",
            Parameter::K => "k",
            Parameter::Theta => "theta",
            Parameter::Alpha => "alpha",
            Parameter::Beta => "beta",
            Parameter::P => "p",
            Parameter::N => "n",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Sampling,
                    ErrorCode::UnknownParameter,
                    Some(s.to_owned()),
                )
            })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ParameterKind {
    Shape,
    Location,
    Scale,
}

/// Display metadata and valid range for one parameter.
#[derive(Clone, PartialEq, Debug)]
pub struct ParameterInfo {
    pub parameter: Parameter,
    pub display_name: &'static str,
    pub description: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub kind: Option<ParameterKind>,
}

const MU: ParameterInfo = ParameterInfo {
    parameter: Parameter::Mu,
    display_name: "\u{03bc} \u{2013} mu",
    description: "Location parameter, corresponds to the distribution's mean.",
    min: None,
    max: None,
    step: None,
    kind: Some(ParameterKind::Location),
};

const SIGMA: ParameterInfo = ParameterInfo {
    parameter: Parameter::Sigma,
    display_name: "\u{03c3} \u{2013} sigma",
    description: "Scale parameter, corresponds to the distribution's standard deviation.",
    min: Some(0.1),
    max: None,
    step: Some(0.1),
    kind: Some(ParameterKind::Scale),
};

const LAMBDA: ParameterInfo = ParameterInfo {
    parameter: Parameter::Lambda,
    display_name: "\u{03bb} \u{2013} lambda",
    description: "Rate parameter, corresponds to the rate (frequency) of Poisson events.",
    min: Some(0.01),
    max: None,
    step: Some(0.01),
    kind: Some(ParameterKind::Scale),
};

const K: ParameterInfo = ParameterInfo {
    parameter: Parameter::K,
    display_name: "k",
    description: "Shape parameter.",
    min: Some(0.1),
    max: None,
    step: Some(0.1),
    kind: Some(ParameterKind::Shape),
};

const THETA: ParameterInfo = ParameterInfo {
    parameter: Parameter::Theta,
    display_name: "\u{03b8} \u{2013} theta",
    description: "Scale parameter.",
    min: Some(0.1),
    max: None,
    step: Some(0.1),
    kind: Some(ParameterKind::Scale),
};

const ALPHA: ParameterInfo = ParameterInfo {
    parameter: Parameter::Alpha,
    display_name: "\u{03b1} \u{2013} alpha",
    description: "Shape parameter.",
    min: Some(0.1),
    max: None,
    step: Some(0.1),
    kind: Some(ParameterKind::Shape),
};

const BETA: ParameterInfo = ParameterInfo {
    parameter: Parameter::Beta,
    display_name: "\u{03b2} \u{2013} beta",
    description: "Shape parameter.",
    min: Some(0.1),
    max: None,
    step: Some(0.1),
    kind: Some(ParameterKind::Shape),
};

const BERNOULLI_P: ParameterInfo = ParameterInfo {
    parameter: Parameter::P,
    display_name: "p",
    description: "Probability of success.",
    min: Some(0.0),
    max: Some(1.0),
    step: Some(0.01),
    kind: None,
};

const BINOMIAL_N: ParameterInfo = ParameterInfo {
    parameter: Parameter::N,
    display_name: "n",
    description: "Number of trials.",
    min: Some(0.0),
    max: None,
    step: Some(1.0),
    kind: None,
};

const BINOMIAL_P: ParameterInfo = ParameterInfo {
    parameter: Parameter::P,
    display_name: "p",
    description: "Probability of success in each trial.",
    min: Some(0.0),
    max: Some(1.0),
    step: Some(0.1),
    kind: None,
};

/// A parametric probability distribution.  All statistics are pure
/// functions of the current parameter values.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Distribution {
    Normal { mu: f64, sigma: f64 },
    Exponential { lambda: f64 },
    Gamma { k: f64, theta: f64 },
    Beta { alpha: f64, beta: f64 },
    Bernoulli { p: f64 },
    Binomial { n: f64, p: f64 },
}

impl Default for Distribution {
    fn default() -> Self {
        Distribution::with_defaults(DistributionType::Normal)
    }
}

impl Distribution {
    pub fn with_defaults(ty: DistributionType) -> Self {
        match ty {
            DistributionType::Normal => Distribution::Normal { mu: 0.0, sigma: 1.0 },
            DistributionType::Exponential => Distribution::Exponential { lambda: 0.5 },
            DistributionType::Gamma => Distribution::Gamma { k: 2.0, theta: 5.0 },
            DistributionType::Beta => Distribution::Beta {
                alpha: 2.0,
                beta: 5.0,
            },
            DistributionType::Bernoulli => Distribution::Bernoulli { p: 0.8 },
            DistributionType::Binomial => Distribution::Binomial { n: 10.0, p: 0.5 },
        }
    }

    pub fn distribution_type(&self) -> DistributionType {
        match self {
            Distribution::Normal { .. } => DistributionType::Normal,
            Distribution::Exponential { .. } => DistributionType::Exponential,
            Distribution::Gamma { .. } => DistributionType::Gamma,
            Distribution::Beta { .. } => DistributionType::Beta,
            Distribution::Bernoulli { .. } => DistributionType::Bernoulli,
            Distribution::Binomial { .. } => DistributionType::Binomial,
        }
    }

    pub fn is_continuous(&self) -> bool {
        self.distribution_type().is_continuous()
    }

    pub fn is_discrete(&self) -> bool {
        !self.is_continuous()
    }

    pub fn parameters(&self) -> &'static [ParameterInfo] {
        match self {
            Distribution::Normal { .. } => &[MU, SIGMA],
            Distribution::Exponential { .. } => &[LAMBDA],
            Distribution::Gamma { .. } => &[K, THETA],
            Distribution::Beta { .. } => &[ALPHA, BETA],
            Distribution::Bernoulli { .. } => &[BERNOULLI_P],
            Distribution::Binomial { .. } => &[BINOMIAL_N, BINOMIAL_P],
        }
    }

    pub fn parameter_values(&self) -> Vec<(Parameter, f64)> {
        self.parameters()
            .iter()
            .filter_map(|info| {
                self.parameter_value(info.parameter)
                    .map(|v| (info.parameter, v))
            })
            .collect()
    }

    pub fn parameter_value(&self, parameter: Parameter) -> Option<f64> {
        use Parameter as P;
        match (*self, parameter) {
            (Distribution::Normal { mu, .. }, P::Mu) => Some(mu),
            (Distribution::Normal { sigma, .. }, P::Sigma) => Some(sigma),
            (Distribution::Exponential { lambda }, P::Lambda) => Some(lambda),
            (Distribution::Gamma { k, .. }, P::K) => Some(k),
            (Distribution::Gamma { theta, .. }, P::Theta) => Some(theta),
            (Distribution::Beta { alpha, .. }, P::Alpha) => Some(alpha),
            (Distribution::Beta { beta, .. }, P::Beta) => Some(beta),
            (Distribution::Bernoulli { p }, P::P) => Some(p),
            (Distribution::Binomial { n, .. }, P::N) => Some(n),
            (Distribution::Binomial { p, .. }, P::P) => Some(p),
            _ => None,
        }
    }

    /// Set one parameter in place.  Fails if this variant has no such
    /// parameter or `value` falls outside the parameter's range.
    pub fn set_parameter_value(&mut self, parameter: Parameter, value: f64) -> Result<()> {
        let Some(info) = self.parameters().iter().find(|i| i.parameter == parameter) else {
            return sampling_err!(
                UnknownParameter,
                format!("{} has no parameter {parameter}", self.distribution_type())
            );
        };
        let in_range = value.is_finite()
            && info.min.is_none_or(|min| value >= min)
            && info.max.is_none_or(|max| value <= max);
        if !in_range {
            return sampling_err!(ParameterOutOfRange, format!("{parameter} = {value}"));
        }
        if parameter == Parameter::N && !approx_eq!(f64, value, value.round()) {
            return sampling_err!(
                ParameterOutOfRange,
                format!("{parameter} must be a whole number, got {value}")
            );
        }

        use Parameter as P;
        let slot = match (self, parameter) {
            (Distribution::Normal { mu, .. }, P::Mu) => mu,
            (Distribution::Normal { sigma, .. }, P::Sigma) => sigma,
            (Distribution::Exponential { lambda }, P::Lambda) => lambda,
            (Distribution::Gamma { k, .. }, P::K) => k,
            (Distribution::Gamma { theta, .. }, P::Theta) => theta,
            (Distribution::Beta { alpha, .. }, P::Alpha) => alpha,
            (Distribution::Beta { beta, .. }, P::Beta) => beta,
            (Distribution::Bernoulli { p }, P::P) => p,
            (Distribution::Binomial { n, .. }, P::N) => n,
            (Distribution::Binomial { p, .. }, P::P) => p,
            (dist, _) => {
                return sampling_err!(
                    UnknownParameter,
                    format!("{} has no parameter {parameter}", dist.distribution_type())
                );
            }
        };
        *slot = if parameter == Parameter::N {
            value.round()
        } else {
            value
        };
        Ok(())
    }

    /// The parameter a child node's conditional mean is written to, if this
    /// variant has one.
    pub fn location_parameter(&self) -> Option<Parameter> {
        self.parameters()
            .iter()
            .find(|i| i.kind == Some(ParameterKind::Location))
            .map(|i| i.parameter)
    }

    pub fn location(&self) -> Option<f64> {
        self.location_parameter()
            .and_then(|p| self.parameter_value(p))
    }

    pub fn set_location(&mut self, value: f64) -> Result<()> {
        match self.location_parameter() {
            Some(parameter) => self.set_parameter_value(parameter, value),
            None => sampling_err!(
                MissingLocationParameter,
                format!("{} has no location parameter", self.distribution_type())
            ),
        }
    }

    pub fn support(&self) -> (f64, f64) {
        match *self {
            Distribution::Normal { .. } => (f64::NEG_INFINITY, f64::INFINITY),
            Distribution::Exponential { .. } => (0.0, f64::INFINITY),
            Distribution::Gamma { .. } => (EDGE_OFFSET, f64::INFINITY),
            Distribution::Beta { .. } => (EDGE_OFFSET, 1.0 - EDGE_OFFSET),
            Distribution::Bernoulli { .. } => (0.0, 1.0),
            Distribution::Binomial { n, .. } => (0.0, n),
        }
    }

    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Normal { mu, .. } => mu,
            Distribution::Exponential { lambda } => 1.0 / lambda,
            Distribution::Gamma { k, theta } => k * theta,
            Distribution::Beta { alpha, beta } => alpha / (alpha + beta),
            Distribution::Bernoulli { p } => p,
            Distribution::Binomial { n, p } => n * p,
        }
    }

    pub fn mode(&self) -> f64 {
        match *self {
            Distribution::Normal { mu, .. } => mu,
            Distribution::Exponential { .. } => 0.0,
            Distribution::Gamma { k, theta } => {
                if k >= 1.0 {
                    (k - 1.0) * theta
                } else {
                    EDGE_OFFSET
                }
            }
            Distribution::Beta { alpha, beta } => {
                if alpha > 1.0 && beta > 1.0 {
                    (alpha - 1.0) / (alpha + beta - 2.0)
                } else if alpha > 1.0 {
                    1.0 - EDGE_OFFSET
                } else if beta > 1.0 {
                    EDGE_OFFSET
                } else if alpha >= beta {
                    1.0 - EDGE_OFFSET
                } else {
                    EDGE_OFFSET
                }
            }
            Distribution::Bernoulli { p } => {
                if p <= 0.5 {
                    0.0
                } else {
                    1.0
                }
            }
            Distribution::Binomial { n, p } => ((n + 1.0) * p).floor().min(n),
        }
    }

    pub fn variance(&self) -> f64 {
        match *self {
            Distribution::Normal { sigma, .. } => sigma * sigma,
            Distribution::Exponential { lambda } => 1.0 / (lambda * lambda),
            Distribution::Gamma { k, theta } => k * theta * theta,
            Distribution::Beta { alpha, beta } => {
                let sum = alpha + beta;
                (alpha * beta) / (sum * sum * (sum + 1.0))
            }
            Distribution::Bernoulli { p } => p * (1.0 - p),
            Distribution::Binomial { n, p } => n * p * (1.0 - p),
        }
    }

    /// Probability density (continuous variants) or mass (discrete
    /// variants) at `x`.
    pub fn density(&self, x: f64) -> f64 {
        match *self {
            Distribution::Normal { mu, sigma } => {
                let z = (x - mu) / sigma;
                (-z * z / 2.0).exp() / (sigma * (2.0 * std::f64::consts::PI).sqrt())
            }
            Distribution::Exponential { lambda } => {
                if x < 0.0 {
                    0.0
                } else {
                    lambda * (-lambda * x).exp()
                }
            }
            Distribution::Gamma { k, theta } => {
                if x < 0.0 {
                    return 0.0;
                }
                (xlogy(k - 1.0, x) - x / theta - ln_gamma(k) - k * theta.ln()).exp()
            }
            Distribution::Beta { alpha, beta } => {
                if !(0.0..=1.0).contains(&x) {
                    return 0.0;
                }
                let ln_b = ln_gamma(alpha) + ln_gamma(beta) - ln_gamma(alpha + beta);
                (xlogy(alpha - 1.0, x) + xlogy(beta - 1.0, 1.0 - x) - ln_b).exp()
            }
            Distribution::Bernoulli { p } => {
                if x == 1.0 {
                    p
                } else if x == 0.0 {
                    1.0 - p
                } else {
                    0.0
                }
            }
            Distribution::Binomial { n, p } => {
                if x < 0.0 || x > n || x.fract() != 0.0 {
                    return 0.0;
                }
                ln_choose(n, x).exp() * p.powf(x) * (1.0 - p).powf(n - x)
            }
        }
    }

    /// Plotting range: the support, with unbounded ends replaced by
    /// mean ± 4 standard deviations.
    pub fn value_domain(&self) -> (f64, f64) {
        let (lower, upper) = self.support();
        let std = self.variance().sqrt();
        let mean = self.mean();
        let lower = if lower.is_finite() {
            lower
        } else {
            mean - 4.0 * std
        };
        let upper = if upper.is_finite() {
            upper
        } else {
            mean + 4.0 * std
        };
        (lower, upper)
    }

    /// Draw `count` independent samples under the current parameters.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Result<Vec<f64>> {
        let invalid = |err: &dyn fmt::Display| {
            Error::new(
                ErrorKind::Sampling,
                ErrorCode::InvalidDistribution,
                Some(format!("{self:?}: {err}")),
            )
        };

        let samples = match *self {
            Distribution::Normal { mu, sigma } => {
                let dist = rand_distr::Normal::new(mu, sigma).map_err(|e| invalid(&e))?;
                dist.sample_iter(rng).take(count).collect()
            }
            Distribution::Exponential { lambda } => {
                let dist = rand_distr::Exp::new(lambda).map_err(|e| invalid(&e))?;
                dist.sample_iter(rng).take(count).collect()
            }
            Distribution::Gamma { k, theta } => {
                let dist = rand_distr::Gamma::new(k, theta).map_err(|e| invalid(&e))?;
                dist.sample_iter(rng).take(count).collect()
            }
            Distribution::Beta { alpha, beta } => {
                let dist = rand_distr::Beta::new(alpha, beta).map_err(|e| invalid(&e))?;
                dist.sample_iter(rng).take(count).collect()
            }
            Distribution::Bernoulli { p } => {
                let dist = BernoulliSampler::new(p).map_err(|e| invalid(&e))?;
                dist.sample_iter(rng)
                    .take(count)
                    .map(|hit| if hit { 1.0 } else { 0.0 })
                    .collect()
            }
            Distribution::Binomial { n, p } => {
                let dist = rand_distr::Binomial::new(n as u64, p).map_err(|e| invalid(&e))?;
                dist.sample_iter(rng).take(count).map(|k| k as f64).collect()
            }
        };

        Ok(samples)
    }
}
