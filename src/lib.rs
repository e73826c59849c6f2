//! Inviscid potential flow around two-dimensional bodies with vortex panels.
//!
//! Bodies are discretized into straight [`Panel`]s collected in a
//! [`PanelArray`]. A solve assembles the influence matrix, applies the
//! kutta or closure conditions and writes the panel strengths back; the
//! surface speed can then be handed to a [`BoundaryLayer`] march.
//!
//! ```no_run
//! use vortex_panel::{make_jukowski, LaminarMarch};
//!
//! let mut foil = make_jukowski(64, 0.18, 0.0, 0.0)?;
//! foil.solve_gamma_kutta(0.1)?;
//! let (top, _bottom) = foil.split();
//! let separation = top.sep_point(&LaminarMarch)?;
//! # Ok::<(), vortex_panel::PanelError>(())
//! ```

pub mod assembly;
pub mod boundary_layer;
pub mod config;
pub mod constraints;
pub mod error;
pub mod geometry;
pub mod panel;
pub mod panel_array;
pub mod solver;
pub mod topology;

pub use assembly::{assemble_constant, assemble_linear, LinearSystem};
pub use boundary_layer::{BoundaryLayer, BoundaryLayerProfile, LaminarMarch};
pub use config::{AlphaInput, FlowConfig, Formulation};
pub use constraints::{KuttaPair, NodeKutta};
pub use error::{PanelError, Result};
pub use geometry::{make_circle, make_ellipse, make_jukowski, make_polygon, panelize};
pub use panel::{Panel, Strength};
pub use panel_array::{concatenate, PanelArray};
pub use solver::{solve_dense, PIVOT_TOLERANCE};
pub use topology::Topology;
