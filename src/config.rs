//! JSON configuration for a potential-flow solve.

use crate::constraints::{resolve_index, NodeKutta};
use crate::error::{PanelError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Angle of attack as read from configuration.
///
/// Only a scalar is accepted by the solver; arrays are parsed so they can
/// be rejected with a clear error rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlphaInput {
    /// Single angle in radians
    Scalar(f64),
    /// Several angles, which is rejected
    Array(Vec<f64>),
}

impl AlphaInput {
    /// The scalar angle, rejecting arrays and non-finite values.
    pub fn scalar(&self) -> Result<f64> {
        match self {
            AlphaInput::Scalar(alpha) if alpha.is_finite() => Ok(*alpha),
            AlphaInput::Scalar(alpha) => Err(PanelError::NonFiniteAlpha(*alpha)),
            AlphaInput::Array(values) => Err(PanelError::NonScalarAlpha { len: values.len() }),
        }
    }
}

impl Default for AlphaInput {
    fn default() -> Self {
        AlphaInput::Scalar(0.0)
    }
}

impl From<f64> for AlphaInput {
    fn from(alpha: f64) -> Self {
        AlphaInput::Scalar(alpha)
    }
}

/// Strength distribution used for the solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formulation {
    /// Constant strength per panel, no-slip at centers
    #[default]
    Constant,
    /// Linear strength between shared nodes, no-penetration at centers
    Linear,
}

/// Complete solve configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Free-stream angle of attack (radians)
    #[serde(default)]
    pub alpha: AlphaInput,
    /// Strength formulation
    #[serde(default)]
    pub formulation: Formulation,
    /// Kutta index pairs: `(first, last)` panels for the constant
    /// formulation, `(body, node)` for the linear one. Negative indices
    /// count from the end.
    #[serde(default)]
    pub kutta: Vec<(isize, isize)>,
    /// Kinematic viscosity for boundary-layer marching
    #[serde(default = "default_viscosity")]
    pub viscosity: f64,
    /// Use Thwaites' method instead of Pohlhausen's
    #[serde(default)]
    pub thwaites: bool,
}

fn default_viscosity() -> f64 {
    1e-5
}

impl Default for FlowConfig {
    fn default() -> Self {
        FlowConfig {
            alpha: AlphaInput::default(),
            formulation: Formulation::default(),
            kutta: Vec::new(),
            viscosity: default_viscosity(),
            thwaites: false,
        }
    }
}

impl FlowConfig {
    /// Parse from a JSON string and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FlowConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file and validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the parameters that do not depend on the geometry.
    pub fn validate(&self) -> Result<()> {
        self.alpha.scalar()?;
        if !(self.viscosity > 0.0 && self.viscosity.is_finite()) {
            return Err(PanelError::InvalidViscosity(self.viscosity));
        }
        Ok(())
    }

    /// Kutta pairs read as `(body, node)`, resolving negative body indices
    /// against `num_bodies`.
    pub fn node_kutta(&self, num_bodies: usize) -> Result<Vec<NodeKutta>> {
        self.kutta
            .iter()
            .map(|&(body, node)| {
                let body = resolve_index(body, num_bodies)?;
                Ok(NodeKutta { body, node })
            })
            .collect()
    }
}
