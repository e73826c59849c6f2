//! Influence-matrix assembly.
//!
//! Row `i` of the system is the boundary condition at the center of panel
//! `i`; column `j` holds the influence of unknown `j` on every center.
//! Columns are computed independently (in parallel) and then written into
//! the matrix in index order, so the result does not depend on scheduling.

use crate::panel::Panel;
use crate::topology::Topology;
use nalgebra as na;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Tangential velocity at a constant-strength panel's own center per unit
/// strength, taken on the flow side of the sheet.
pub const CONSTANT_SELF_INFLUENCE: f64 = 0.5;

/// Normal velocity at a linear panel's own center from its unit start
/// hat. The end hat gives the negative, so a uniform strength induces no
/// normal velocity on itself.
pub const LINEAR_SELF_INFLUENCE: f64 = 0.5 / PI;

/// Dense square system `A x = b`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    pub matrix: na::DMatrix<f64>,
    pub rhs: na::DVector<f64>,
}

impl LinearSystem {
    pub fn zeros(n: usize) -> Self {
        LinearSystem {
            matrix: na::DMatrix::zeros(n, n),
            rhs: na::DVector::zeros(n),
        }
    }

    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    /// Replace row `i` with `coeffs . x = value`.
    pub fn replace_row(&mut self, i: usize, coeffs: &[(usize, f64)], value: f64) {
        self.matrix.row_mut(i).fill(0.0);
        for &(j, c) in coeffs {
            self.matrix[(i, j)] += c;
        }
        self.rhs[i] = value;
    }

    /// `A x - b`.
    pub fn residual(&self, x: &na::DVector<f64>) -> na::DVector<f64> {
        &self.matrix * x - &self.rhs
    }
}

/// No-slip system for constant-strength panels.
///
/// Entry `(i, j)` is the tangential velocity at center `i` from unit
/// strength on panel `j`; the diagonal is [`CONSTANT_SELF_INFLUENCE`].
/// Row `i` of the right-hand side cancels the free-stream tangential
/// component, so the solution has zero net tangential velocity at every
/// center.
pub fn assemble_constant(panels: &[Panel], alpha: f64) -> LinearSystem {
    let n = panels.len();
    let centers: Vec<na::Point2<f64>> = panels.iter().map(Panel::center).collect();

    let columns: Vec<Vec<f64>> = panels
        .par_iter()
        .enumerate()
        .map(|(j, p_j)| {
            panels
                .iter()
                .zip(&centers)
                .enumerate()
                .map(|(i, (p_i, c_i))| {
                    if i == j {
                        CONSTANT_SELF_INFLUENCE
                    } else {
                        p_i.tangential_component(&p_j.constant_kernel(c_i))
                    }
                })
                .collect()
        })
        .collect();

    let mut system = LinearSystem::zeros(n);
    for (j, column) in columns.iter().enumerate() {
        system.matrix.column_mut(j).copy_from_slice(column);
    }

    let freestream = na::Vector2::new(alpha.cos(), alpha.sin());
    for (i, p_i) in panels.iter().enumerate() {
        system.rhs[i] = -p_i.tangential_component(&freestream);
    }

    log::debug!("assembled constant-strength system: {} panels, alpha = {}", n, alpha);
    system
}

/// No-penetration system for linearly varying panels.
///
/// Unknown `k` is the strength at the end point of panel `k`, which is
/// also the start point of panel `left⁻¹(k)`. Each panel's start hat goes
/// into column `left[j]` and its end hat into column `j`.
pub fn assemble_linear(panels: &[Panel], topology: &Topology, alpha: f64) -> LinearSystem {
    let n = panels.len();
    let centers: Vec<na::Point2<f64>> = panels.iter().map(Panel::center).collect();

    let columns: Vec<(Vec<f64>, Vec<f64>)> = panels
        .par_iter()
        .enumerate()
        .map(|(j, p_j)| {
            panels
                .iter()
                .zip(&centers)
                .enumerate()
                .map(|(i, (p_i, c_i))| {
                    if i == j {
                        (LINEAR_SELF_INFLUENCE, -LINEAR_SELF_INFLUENCE)
                    } else {
                        let (v0, v1) = p_j.linear_kernel(c_i);
                        (p_i.normal_component(&v0), p_i.normal_component(&v1))
                    }
                })
                .unzip::<f64, f64, Vec<f64>, Vec<f64>>()
        })
        .collect();

    let left = topology.left_indices();
    let mut system = LinearSystem::zeros(n);
    for (j, (start_hat, end_hat)) in columns.iter().enumerate() {
        let l = left[j];
        for i in 0..n {
            system.matrix[(i, l)] += start_hat[i];
            system.matrix[(i, j)] += end_hat[i];
        }
    }

    let freestream = na::Vector2::new(alpha.cos(), alpha.sin());
    for (i, p_i) in panels.iter().enumerate() {
        system.rhs[i] = -p_i.normal_component(&freestream);
    }

    log::debug!(
        "assembled linear-strength system: {} panels, {} bodies, alpha = {}",
        n,
        topology.num_bodies(),
        alpha
    );
    system
}
