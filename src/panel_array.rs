//! Ordered collections of panels forming one or more bodies.

use crate::boundary_layer::{BoundaryLayer, BoundaryLayerProfile};
use crate::config::FlowConfig;
use crate::error::{PanelError, Result};
use crate::panel::Panel;
use crate::topology::Topology;
use nalgebra as na;
use rayon::prelude::*;
use std::ops::Range;

/// Panels sharing one free stream and one set of unknowns.
///
/// The free stream has unit magnitude and direction `alpha` (radians from
/// the x-axis). `alpha` and the panel strengths are only changed by a
/// successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelArray {
    pub(crate) panels: Vec<Panel>,
    pub(crate) alpha: f64,
    pub(crate) topology: Topology,
}

impl PanelArray {
    /// Array forming a single body.
    pub fn new(panels: Vec<Panel>) -> Self {
        let topology = Topology::single(panels.len());
        PanelArray {
            panels,
            alpha: 0.0,
            topology,
        }
    }

    /// Array with explicit body ranges.
    pub fn with_bodies(panels: Vec<Panel>, bodies: Vec<Range<usize>>) -> Result<Self> {
        let topology = Topology::from_bodies(bodies, panels.len())?;
        Ok(PanelArray {
            panels,
            alpha: 0.0,
            topology,
        })
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Angle of attack used by the last solve.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn bodies(&self) -> &[Range<usize>] {
        self.topology.bodies()
    }

    /// Index of the preceding panel within the same body, per panel.
    pub fn left_indices(&self) -> Vec<usize> {
        self.topology.left_indices()
    }

    pub fn centers(&self) -> Vec<na::Point2<f64>> {
        self.panels.iter().map(Panel::center).collect()
    }

    pub fn half_widths(&self) -> Vec<f64> {
        self.panels.iter().map(Panel::half_width).collect()
    }

    pub fn tangents(&self) -> Vec<na::Vector2<f64>> {
        self.panels.iter().map(Panel::tangent).collect()
    }

    /// Center strength of every panel.
    pub fn gammas(&self) -> Vec<f64> {
        self.panels.iter().map(Panel::gamma).collect()
    }

    /// Arc length from the start of the sequence to each panel center.
    ///
    /// `s[0] = S[0]`, `s[1] = 2 S[0] + S[1]`, and so on.
    pub fn distance(&self) -> Vec<f64> {
        let mut total = 0.0;
        self.panels
            .iter()
            .map(|p| {
                let s = total + p.half_width();
                total += p.width();
                s
            })
            .collect()
    }

    /// Split into two boundary-layer runs by the sign of the center strength.
    ///
    /// The first array holds panels with `gamma <= 0` in order; the second
    /// holds panels with `gamma >= 0` in reverse order, so both run away
    /// from the stagnation point. Panels with zero strength land in both.
    pub fn split(&self) -> (PanelArray, PanelArray) {
        let top: Vec<Panel> = self.panels.iter().filter(|p| p.gamma() <= 0.0).cloned().collect();
        let bottom: Vec<Panel> = self
            .panels
            .iter()
            .rev()
            .filter(|p| p.gamma() >= 0.0)
            .cloned()
            .collect();
        (PanelArray::new(top), PanelArray::new(bottom))
    }

    /// Panels of `self` followed by those of `other`, keeping each body's
    /// ring closed on itself.
    pub fn concat(&self, other: &PanelArray) -> PanelArray {
        let mut panels = self.panels.clone();
        panels.extend(other.panels.iter().cloned());
        PanelArray {
            panels,
            alpha: self.alpha,
            topology: self.topology.concat(&other.topology),
        }
    }

    /// Free stream plus induced velocity at each of `points`.
    pub fn flow_velocity(&self, points: &[na::Point2<f64>]) -> Vec<na::Vector2<f64>> {
        let freestream = na::Vector2::new(self.alpha.cos(), self.alpha.sin());
        points
            .par_iter()
            .map(|q| {
                self.panels
                    .iter()
                    .fold(freestream, |v, p| v + p.velocity(q))
            })
            .collect()
    }

    /// March a boundary layer along this run of panels.
    ///
    /// Uses the arc length to each center and the surface speed `|gamma|`.
    pub fn march<B: BoundaryLayer + ?Sized>(
        &self,
        layer: &B,
        nu: f64,
        thwaites: bool,
    ) -> Result<BoundaryLayerProfile> {
        let s = self.distance();
        let u_e: Vec<f64> = self.panels.iter().map(|p| p.gamma().abs()).collect();
        layer.march(&s, &u_e, nu, thwaites)
    }

    /// [`PanelArray::march`] with the viscosity and method from `config`.
    pub fn march_with<B: BoundaryLayer + ?Sized>(
        &self,
        layer: &B,
        config: &FlowConfig,
    ) -> Result<BoundaryLayerProfile> {
        config.validate()?;
        self.march(layer, config.viscosity, config.thwaites)
    }

    /// Location of laminar separation along this run of panels.
    pub fn sep_point<B: BoundaryLayer + ?Sized>(&self, layer: &B) -> Result<na::Point2<f64>> {
        // the separation index does not depend on viscosity
        let profile = self.march(layer, 1.0, false)?;
        Ok(self.separation_location(layer, profile.i_sep))
    }

    /// Point between the centers of panels `i_sep` and `i_sep + 1`, as
    /// placed by `layer`.
    pub fn separation_location<B: BoundaryLayer + ?Sized>(
        &self,
        layer: &B,
        i_sep: usize,
    ) -> na::Point2<f64> {
        let centers = self.centers();
        let x: Vec<f64> = centers.iter().map(|c| c.x).collect();
        let y: Vec<f64> = centers.iter().map(|c| c.y).collect();
        na::Point2::new(layer.sep(&x, i_sep), layer.sep(&y, i_sep))
    }
}

/// Concatenate bodies left to right.
pub fn concatenate(arrays: &[&PanelArray]) -> Result<PanelArray> {
    let (first, rest) = arrays.split_first().ok_or(PanelError::EmptyInput)?;
    Ok(rest.iter().fold((*first).clone(), |acc, a| acc.concat(a)))
}
