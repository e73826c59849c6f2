//! Auxiliary conditions patched onto an assembled system.
//!
//! Assembly and constraint enforcement are separate steps: the functions
//! here take an owned [`LinearSystem`] and rewrite rows in place. All
//! indices are validated before the first row is touched, so a rejected
//! call leaves the system unchanged.

use crate::assembly::LinearSystem;
use crate::error::{PanelError, Result};
use crate::panel::Panel;
use crate::topology::Topology;

/// Resolve a possibly negative index against `len` entries.
///
/// Negative values count back from the end, so `-1` is the last entry.
pub fn resolve_index(index: isize, len: usize) -> Result<usize> {
    let resolved = if index < 0 {
        len as isize + index
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(PanelError::IndexOutOfRange { index, len });
    }
    Ok(resolved as usize)
}

/// Trailing-edge panel pair `(first, last)` for the constant formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KuttaPair {
    pub first: isize,
    pub last: isize,
}

impl From<(isize, isize)> for KuttaPair {
    fn from((first, last): (isize, isize)) -> Self {
        KuttaPair { first, last }
    }
}

/// Node pinned to zero strength in the linear formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKutta {
    pub body: usize,
    /// Global node index; negative counts from the end of the array.
    pub node: isize,
}

impl From<(usize, isize)> for NodeKutta {
    fn from((body, node): (usize, isize)) -> Self {
        NodeKutta { body, node }
    }
}

/// Couple the trailing-edge strengths into the no-slip rows.
///
/// For each pair `(i, j)`, one is added to columns `i` and `j` of every row
/// in `i..j`. A pair with `i >= j` after resolution touches no rows.
pub fn apply_kutta_constant(system: &mut LinearSystem, pairs: &[KuttaPair]) -> Result<()> {
    let n = system.size();
    let resolved = pairs
        .iter()
        .map(|p| Ok((resolve_index(p.first, n)?, resolve_index(p.last, n)?)))
        .collect::<Result<Vec<_>>>()?;

    for (i, j) in resolved {
        for row in i..j {
            system.matrix[(row, i)] += 1.0;
            if j != i {
                system.matrix[(row, j)] += 1.0;
            }
        }
        log::debug!("kutta condition on panels {} and {} over rows {}..{}", i, j, i, j);
    }
    Ok(())
}

/// Replace each pinned node's row with `gamma[node] = 0`.
pub fn apply_kutta_linear(
    system: &mut LinearSystem,
    topology: &Topology,
    pairs: &[NodeKutta],
) -> Result<()> {
    let n = system.size();
    let nodes = pairs
        .iter()
        .map(|p| {
            let body = topology
                .bodies()
                .get(p.body)
                .ok_or(PanelError::UnknownBody {
                    body: p.body,
                    bodies: topology.num_bodies(),
                })?;
            let node = resolve_index(p.node, n)?;
            if !body.contains(&node) {
                return Err(PanelError::NodeOutsideBody { node, body: p.body });
            }
            Ok(node)
        })
        .collect::<Result<Vec<_>>>()?;

    for node in nodes {
        system.replace_row(node, &[(node, 1.0)], 0.0);
        log::debug!("node {} pinned to zero strength", node);
    }
    Ok(())
}

/// Replace the first row of every body with a closure condition: the
/// half-width weighted sum of both end strengths over the body vanishes.
///
/// This removes the free circulation mode that each closed body leaves in
/// the no-penetration rows.
pub fn apply_body_closure(system: &mut LinearSystem, panels: &[Panel], topology: &Topology) {
    let left = topology.left_indices();
    for body in topology.bodies() {
        let coeffs: Vec<(usize, f64)> = body
            .clone()
            .flat_map(|k| {
                let s = panels[k].half_width();
                [(k, s), (left[k], s)]
            })
            .collect();
        system.replace_row(body.start, &coeffs, 0.0);
        log::trace!("closure row {} for body {:?}", body.start, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra as na;

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 5).unwrap(), 0);
        assert_eq!(resolve_index(-1, 5).unwrap(), 4);
        assert_eq!(resolve_index(-5, 5).unwrap(), 0);
        assert!(resolve_index(5, 5).is_err());
        assert!(resolve_index(-6, 5).unwrap_err().is_parameter_error());
    }

    #[test]
    fn test_kutta_constant_rows_and_columns() {
        let mut system = LinearSystem::zeros(4);
        apply_kutta_constant(&mut system, &[(0, -1).into()]).unwrap();
        for row in 0..3 {
            assert_eq!(system.matrix[(row, 0)], 1.0);
            assert_eq!(system.matrix[(row, 3)], 1.0);
            assert_eq!(system.matrix[(row, 1)], 0.0);
        }
        assert_eq!(system.matrix[(3, 0)], 0.0);
        assert_eq!(system.matrix[(3, 3)], 0.0);
    }

    #[test]
    fn test_kutta_constant_rejects_bad_index_untouched() {
        let mut system = LinearSystem::zeros(3);
        let err = apply_kutta_constant(&mut system, &[(0, 2).into(), (1, 7).into()]).unwrap_err();
        assert!(err.is_parameter_error());
        assert_eq!(system, LinearSystem::zeros(3));
    }

    #[test]
    fn test_kutta_linear_pins_node() {
        let mut system = LinearSystem::zeros(4);
        system.matrix.fill(3.0);
        system.rhs.fill(1.0);
        let topology = Topology::single(4);
        apply_kutta_linear(&mut system, &topology, &[(0, -1).into()]).unwrap();
        assert_eq!(system.matrix[(3, 3)], 1.0);
        assert_eq!(system.matrix[(3, 0)], 0.0);
        assert_eq!(system.rhs[3], 0.0);
        assert_eq!(system.matrix[(2, 3)], 3.0);
    }

    #[test]
    fn test_kutta_linear_validates_body() {
        let mut system = LinearSystem::zeros(4);
        let topology = Topology::from_bodies(vec![0..2, 2..4], 4).unwrap();
        let unknown = apply_kutta_linear(&mut system, &topology, &[(2, 0).into()]);
        assert!(matches!(unknown, Err(PanelError::UnknownBody { .. })));
        let outside = apply_kutta_linear(&mut system, &topology, &[(0, 3).into()]);
        assert!(matches!(outside, Err(PanelError::NodeOutsideBody { node: 3, body: 0 })));
    }

    #[test]
    fn test_body_closure_weights() {
        let pts = [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 0.0)];
        let panels: Vec<Panel> = pts
            .windows(2)
            .map(|w| {
                let start = na::Point2::new(w[0].0, w[0].1);
                let end = na::Point2::new(w[1].0, w[1].1);
                Panel::new(start, end).unwrap()
            })
            .collect();
        let mut system = LinearSystem::zeros(3);
        system.matrix.fill(9.0);
        system.rhs.fill(9.0);
        let topology = Topology::single(3);
        apply_body_closure(&mut system, &panels, &topology);

        // node k is shared by panel k (end) and panel k+1 (start)
        let s: Vec<f64> = panels.iter().map(Panel::half_width).collect();
        assert_eq!(system.matrix[(0, 0)], s[0] + s[1]);
        assert_eq!(system.matrix[(0, 1)], s[1] + s[2]);
        assert_eq!(system.matrix[(0, 2)], s[2] + s[0]);
        assert_eq!(system.rhs[0], 0.0);
        assert_eq!(system.matrix[(1, 0)], 9.0);
    }
}
