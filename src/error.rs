//! Error types for panel construction, assembly and solving.

use thiserror::Error;

/// Errors raised by the vortex-panel library.
///
/// Every variant is detected before the dense solve is attempted, except
/// [`PanelError::SingularSystem`], which is reported by the solve itself.
/// In all cases the panel strengths of the array being solved are left
/// at their previous values.
#[derive(Debug, Error)]
pub enum PanelError {
    /// A panel whose two end points coincide (zero half-width).
    #[error("degenerate panel at ({x}, {y}): end points coincide")]
    DegeneratePanel {
        /// x location of the coincident end points
        x: f64,
        /// y location of the coincident end points
        y: f64,
    },

    /// Coordinate sequences of different lengths.
    #[error("x and y must be same length: x has {x_len} points, y has {y_len}")]
    LengthMismatch {
        /// Number of x coordinates
        x_len: usize,
        /// Number of y coordinates
        y_len: usize,
    },

    /// Fewer than two points, so no panel can be made.
    #[error("point arrays must have len > 1, got {len}")]
    TooFewPoints {
        /// Number of points supplied
        len: usize,
    },

    /// Body ranges that do not partition the panel sequence.
    #[error("invalid body topology: {0}")]
    InvalidTopology(String),

    /// Angle of attack supplied as an array instead of a scalar.
    #[error("only accepts scalar alpha, got an array of {len} values")]
    NonScalarAlpha {
        /// Number of values supplied
        len: usize,
    },

    /// Angle of attack that is NaN or infinite.
    #[error("alpha must be finite, got {0}")]
    NonFiniteAlpha(f64),

    /// A (possibly negative) panel index outside the panel sequence.
    #[error("index {index} out of range for {len} panels")]
    IndexOutOfRange {
        /// The index as supplied
        index: isize,
        /// Number of panels
        len: usize,
    },

    /// A kutta pair naming a body that does not exist.
    #[error("body {body} does not exist ({bodies} bodies)")]
    UnknownBody {
        /// Requested body index
        body: usize,
        /// Number of bodies
        bodies: usize,
    },

    /// A kutta node that is not part of the body it was paired with.
    #[error("node {node} is not part of body {body}")]
    NodeOutsideBody {
        /// Resolved node index
        node: usize,
        /// Body index
        body: usize,
    },

    /// Non-positive or non-finite kinematic viscosity.
    #[error("viscosity must be positive and finite, got {0}")]
    InvalidViscosity(f64),

    /// An operation that needs at least one panel got none.
    #[error("operation requires a non-empty panel array")]
    EmptyInput,

    /// The assembled linear system could not be solved.
    #[error("linear system of size {size} is singular")]
    SingularSystem {
        /// Number of unknowns
        size: usize,
    },

    /// Malformed JSON configuration.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Failure reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

impl PanelError {
    /// Returns `true` for degenerate panels, bad coordinate input and broken
    /// body topology.
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            PanelError::DegeneratePanel { .. }
                | PanelError::LengthMismatch { .. }
                | PanelError::TooFewPoints { .. }
                | PanelError::InvalidTopology(_)
        )
    }

    /// Returns `true` for rejected call parameters (alpha, indices, viscosity).
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            PanelError::NonScalarAlpha { .. }
                | PanelError::NonFiniteAlpha(_)
                | PanelError::IndexOutOfRange { .. }
                | PanelError::UnknownBody { .. }
                | PanelError::NodeOutsideBody { .. }
                | PanelError::InvalidViscosity(_)
                | PanelError::EmptyInput
        )
    }

    /// Returns `true` if the linear solve failed.
    pub fn is_singular(&self) -> bool {
        matches!(self, PanelError::SingularSystem { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PanelError::LengthMismatch { x_len: 3, y_len: 5 };
        assert_eq!(
            err.to_string(),
            "x and y must be same length: x has 3 points, y has 5"
        );
        let err = PanelError::SingularSystem { size: 12 };
        assert_eq!(err.to_string(), "linear system of size 12 is singular");
    }

    #[test]
    fn test_categories() {
        let geom = PanelError::DegeneratePanel { x: 1.0, y: 0.0 };
        let param = PanelError::NonScalarAlpha { len: 3 };
        let singular = PanelError::SingularSystem { size: 4 };

        assert!(geom.is_geometry_error());
        assert!(!geom.is_parameter_error());
        assert!(param.is_parameter_error());
        assert!(!param.is_singular());
        assert!(singular.is_singular());
        assert!(!singular.is_geometry_error());
    }
}
