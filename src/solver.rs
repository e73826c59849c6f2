//! Dense solve for panel strengths.
//!
//! Each entry point assembles the system, applies its auxiliary
//! conditions, solves, and only then writes strengths back. Any error
//! before the scatter leaves the array as it was.

use crate::assembly::{assemble_constant, assemble_linear, LinearSystem};
use crate::config::{FlowConfig, Formulation};
use crate::constraints::{
    apply_body_closure, apply_kutta_constant, apply_kutta_linear, KuttaPair, NodeKutta,
};
use crate::error::{PanelError, Result};
use crate::panel::Strength;
use crate::panel_array::PanelArray;
use nalgebra as na;

/// Smallest pivot accepted by [`solve_dense`], relative to the largest.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Solve `A x = b` by LU decomposition with partial pivoting.
///
/// Fails with [`PanelError::SingularSystem`] when the smallest pivot falls
/// below [`PIVOT_TOLERANCE`] times the largest, or the solution is not
/// finite. A missing or repeated constraint row lands here.
pub fn solve_dense(system: LinearSystem) -> Result<na::DVector<f64>> {
    let n = system.size();
    if n == 0 {
        return Ok(na::DVector::zeros(0));
    }
    let lu = system.matrix.lu();

    let pivots = lu.u().diagonal().map(f64::abs);
    let (min_pivot, max_pivot) = (pivots.min(), pivots.max());
    if !(min_pivot > PIVOT_TOLERANCE * max_pivot) {
        log::debug!(
            "rejecting {}x{} system: pivot ratio {:e}",
            n,
            n,
            min_pivot / max_pivot
        );
        return Err(PanelError::SingularSystem { size: n });
    }

    let gamma = lu
        .solve(&system.rhs)
        .ok_or(PanelError::SingularSystem { size: n })?;
    if gamma.iter().any(|g| !g.is_finite()) {
        return Err(PanelError::SingularSystem { size: n });
    }
    Ok(gamma)
}

fn check_alpha(alpha: f64) -> Result<f64> {
    if alpha.is_finite() {
        Ok(alpha)
    } else {
        Err(PanelError::NonFiniteAlpha(alpha))
    }
}

impl PanelArray {
    /// Set constant panel strengths enforcing no-slip at every center, plus
    /// the kutta condition on each trailing-edge pair.
    ///
    /// Strengths are normalized by a unit free stream at angle `alpha`.
    pub fn solve_gamma(&mut self, alpha: f64, kutta: &[KuttaPair]) -> Result<()> {
        let alpha = check_alpha(alpha)?;
        if self.panels.is_empty() {
            self.alpha = alpha;
            return Ok(());
        }
        let mut system = assemble_constant(&self.panels, alpha);
        apply_kutta_constant(&mut system, kutta)?;
        let gamma = solve_dense(system)?;

        self.alpha = alpha;
        for (p, &g) in self.panels.iter_mut().zip(gamma.iter()) {
            p.set_strength(Strength::Uniform(g));
        }
        log::debug!("solved constant strengths on {} panels", gamma.len());
        Ok(())
    }

    /// [`PanelArray::solve_gamma`] with the kutta pair `(0, -1)`.
    pub fn solve_gamma_kutta(&mut self, alpha: f64) -> Result<()> {
        self.solve_gamma(alpha, &[KuttaPair { first: 0, last: -1 }])
    }

    /// Set linearly varying strengths enforcing no-penetration at every
    /// center.
    ///
    /// With an empty `kutta` list each body's first row becomes a closure
    /// condition; otherwise each listed node is pinned to zero strength.
    pub fn solve_gamma_o2(&mut self, alpha: f64, kutta: &[NodeKutta]) -> Result<()> {
        let alpha = check_alpha(alpha)?;
        if self.panels.is_empty() {
            self.alpha = alpha;
            return Ok(());
        }
        let mut system = assemble_linear(&self.panels, &self.topology, alpha);
        if kutta.is_empty() {
            apply_body_closure(&mut system, &self.panels, &self.topology);
        } else {
            apply_kutta_linear(&mut system, &self.topology, kutta)?;
        }
        let gamma = solve_dense(system)?;

        self.alpha = alpha;
        let left = self.topology.left_indices();
        for (i, p) in self.panels.iter_mut().enumerate() {
            p.set_strength(Strength::from_ends(gamma[left[i]], gamma[i]));
        }
        log::debug!(
            "solved linear strengths on {} panels, {} bodies",
            gamma.len(),
            self.topology.num_bodies()
        );
        Ok(())
    }

    /// Solve with the formulation, angle and kutta list from `config`.
    pub fn solve(&mut self, config: &FlowConfig) -> Result<()> {
        let alpha = config.alpha.scalar()?;
        match config.formulation {
            Formulation::Constant => {
                let kutta: Vec<KuttaPair> = config.kutta.iter().map(|&k| k.into()).collect();
                self.solve_gamma(alpha, &kutta)
            }
            Formulation::Linear => {
                let kutta = config.node_kutta(self.topology.num_bodies())?;
                self.solve_gamma_o2(alpha, &kutta)
            }
        }
    }
}
