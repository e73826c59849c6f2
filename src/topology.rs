//! Body bookkeeping for multi-body panel arrays.
//!
//! A panel array is partitioned into bodies, each a contiguous range of
//! panel indices. Within a body the panels form a ring: the panel to the
//! left of a body's first panel is that body's last panel. The ring is not
//! stored; [`Topology::left`] derives it from the body ranges.

use crate::error::{PanelError, Result};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    bodies: Vec<Range<usize>>,
}

impl Topology {
    /// One body spanning `n` panels (no bodies when `n == 0`).
    pub fn single(n: usize) -> Self {
        let bodies = if n == 0 { Vec::new() } else { vec![0..n] };
        Topology { bodies }
    }

    /// Topology from explicit body ranges.
    ///
    /// The ranges must be non-empty, ordered and together cover `0..n`
    /// without gaps or overlap.
    pub fn from_bodies(bodies: Vec<Range<usize>>, n: usize) -> Result<Self> {
        let mut next = 0;
        for (k, body) in bodies.iter().enumerate() {
            if body.start != next {
                return Err(PanelError::InvalidTopology(format!(
                    "body {} starts at {} but previous body ends at {}",
                    k, body.start, next
                )));
            }
            if body.end <= body.start {
                return Err(PanelError::InvalidTopology(format!(
                    "body {} is empty ({}..{})",
                    k, body.start, body.end
                )));
            }
            next = body.end;
        }
        if next != n {
            return Err(PanelError::InvalidTopology(format!(
                "bodies cover {} panels, array has {}",
                next, n
            )));
        }
        Ok(Topology { bodies })
    }

    pub fn bodies(&self) -> &[Range<usize>] {
        &self.bodies
    }

    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Total number of panels covered.
    pub fn len(&self) -> usize {
        self.bodies.last().map_or(0, |b| b.end)
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Index of the body containing panel `i`.
    pub fn body_of(&self, i: usize) -> Option<usize> {
        self.bodies.iter().position(|b| b.contains(&i))
    }

    /// Index of the panel preceding `i` within its body, wrapping from the
    /// body's first panel to its last. `None` if `i` is outside the array.
    pub fn left(&self, i: usize) -> Option<usize> {
        let body = self.bodies.iter().find(|b| b.contains(&i))?;
        Some(if i == body.start { body.end - 1 } else { i - 1 })
    }

    /// The full `left` map, one entry per panel.
    pub fn left_indices(&self) -> Vec<usize> {
        let mut left = Vec::with_capacity(self.len());
        for body in &self.bodies {
            left.push(body.end - 1);
            left.extend(body.start..body.end - 1);
        }
        left
    }

    /// Bodies of `self` followed by those of `other` shifted by `self.len()`.
    ///
    /// No ring links are created across the join.
    pub fn concat(&self, other: &Topology) -> Topology {
        let shift = self.len();
        let mut bodies = self.bodies.clone();
        bodies.extend(other.bodies.iter().map(|b| b.start + shift..b.end + shift));
        Topology { bodies }
    }
}
