//! Straight vortex panels and the velocity they induce.
//!
//! Each panel is evaluated in its own frame: the field point is shifted by
//! the panel center and rotated onto the tangent, so the panel lies on the
//! local x-axis between `-S` and `S`. The closed-form kernels below are
//! written in that frame and rotated back to global coordinates.

use crate::error::{PanelError, Result};
use nalgebra as na;
use std::f64::consts::PI;

/// Vortex strength carried by a panel.
///
/// A panel either has one value over its whole width or varies linearly
/// between its two ends. The kernel used by [`Panel::velocity`] follows
/// directly from the variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strength {
    /// Constant strength over the panel
    Uniform(f64),
    /// Linearly varying strength, given at the start and end points
    Linear { left: f64, right: f64 },
}

impl Strength {
    /// Build from end values, collapsing to `Uniform` when they are equal.
    pub fn from_ends(left: f64, right: f64) -> Self {
        if left == right {
            Strength::Uniform(left)
        } else {
            Strength::Linear { left, right }
        }
    }

    /// Strength at the panel center.
    pub fn center(&self) -> f64 {
        match *self {
            Strength::Uniform(gamma) => gamma,
            Strength::Linear { left, right } => 0.5 * (left + right),
        }
    }

    /// Strength at the (start, end) points.
    pub fn ends(&self) -> (f64, f64) {
        match *self {
            Strength::Uniform(gamma) => (gamma, gamma),
            Strength::Linear { left, right } => (left, right),
        }
    }
}

impl Default for Strength {
    fn default() -> Self {
        Strength::Uniform(0.0)
    }
}

/// Field point expressed in a panel's frame.
#[derive(Debug, Clone, Copy)]
struct LocalPoint {
    xp: f64,
    yp: f64,
    /// half the log of the squared distance ratio to the two ends
    lr: f64,
    /// angle subtended by the panel
    dt: f64,
}

/// Straight vortex panel between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    start: na::Point2<f64>,
    end: na::Point2<f64>,
    control_point: na::Point2<f64>,
    tangent: na::Vector2<f64>,
    half_width: f64,
    strength: Strength,
}

impl Panel {
    /// Panel from `start` to `end` with zero strength.
    ///
    /// Fails with [`PanelError::DegeneratePanel`] when the points coincide.
    pub fn new(start: na::Point2<f64>, end: na::Point2<f64>) -> Result<Self> {
        Self::with_strength(start, end, Strength::default())
    }

    /// Panel from `start` to `end` carrying `strength`.
    pub fn with_strength(
        start: na::Point2<f64>,
        end: na::Point2<f64>,
        strength: Strength,
    ) -> Result<Self> {
        let control_point = na::Point2::new((start.x + end.x) * 0.5, (start.y + end.y) * 0.5);

        let d = end - control_point;
        let half_width = d.norm();
        if !(half_width > 0.0 && half_width.is_finite()) {
            return Err(PanelError::DegeneratePanel {
                x: start.x,
                y: start.y,
            });
        }

        Ok(Panel {
            start,
            end,
            control_point,
            tangent: d / half_width,
            half_width,
            strength,
        })
    }

    pub fn start(&self) -> na::Point2<f64> {
        self.start
    }

    pub fn end(&self) -> na::Point2<f64> {
        self.end
    }

    /// Panel center, where boundary conditions are enforced.
    pub fn center(&self) -> na::Point2<f64> {
        self.control_point
    }

    /// Unit tangent pointing from start to end.
    pub fn tangent(&self) -> na::Vector2<f64> {
        self.tangent
    }

    /// Unit normal, the tangent rotated a quarter turn counter-clockwise.
    pub fn normal(&self) -> na::Vector2<f64> {
        na::Vector2::new(-self.tangent.y, self.tangent.x)
    }

    /// Distance from the center to either end.
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn width(&self) -> f64 {
        2.0 * self.half_width
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Strength at the panel center.
    pub fn gamma(&self) -> f64 {
        self.strength.center()
    }

    pub fn set_strength(&mut self, strength: Strength) {
        self.strength = strength;
    }

    /// Tangential component of a global vector at this panel.
    pub fn tangential_component(&self, v: &na::Vector2<f64>) -> f64 {
        v.x * self.tangent.x + v.y * self.tangent.y
    }

    /// Normal component of a global vector at this panel.
    pub fn normal_component(&self, v: &na::Vector2<f64>) -> f64 {
        -v.x * self.tangent.y + v.y * self.tangent.x
    }

    /// Velocity induced at `point` by this panel's current strength.
    pub fn velocity(&self, point: &na::Point2<f64>) -> na::Vector2<f64> {
        match self.strength {
            Strength::Uniform(gamma) => self.constant_kernel(point) * gamma,
            Strength::Linear { left, right } => {
                let (v0, v1) = self.linear_kernel(point);
                v0 * left + v1 * right
            }
        }
    }

    /// Induced velocity at each of `points`.
    pub fn velocities(&self, points: &[na::Point2<f64>]) -> Vec<na::Vector2<f64>> {
        points.iter().map(|p| self.velocity(p)).collect()
    }

    /// Velocity induced at `point` by unit constant strength.
    pub fn constant_kernel(&self, point: &na::Point2<f64>) -> na::Vector2<f64> {
        let local = self.to_local(point);
        self.rotate_to_global(-local.dt * 0.5 / PI, -local.lr * 0.5 / PI)
    }

    /// Velocities induced at `point` by the two unit hat distributions.
    ///
    /// The first hat is one at the start point and zero at the end, the
    /// second is its mirror. Their sum equals [`Panel::constant_kernel`].
    pub fn linear_kernel(&self, point: &na::Point2<f64>) -> (na::Vector2<f64>, na::Vector2<f64>) {
        let LocalPoint { xp, yp, lr, dt } = self.to_local(point);
        let s = self.half_width;
        let g = (yp * lr + xp * dt) / s;
        let h = (xp * lr - yp * dt) / s + 2.0;
        let c = 0.25 / PI;
        (
            self.rotate_to_global(c * (g - dt), c * (h - lr)),
            self.rotate_to_global(c * (-g - dt), c * (-h - lr)),
        )
    }

    fn to_local(&self, point: &na::Point2<f64>) -> LocalPoint {
        let t = point - self.control_point;
        let (sx, sy) = (self.tangent.x, self.tangent.y);
        let xp = t.x * sx + t.y * sy;
        let yp = t.y * sx - t.x * sy;

        let s = self.half_width;
        let lr = 0.5 * (((xp - s).powi(2) + yp * yp) / ((xp + s).powi(2) + yp * yp)).ln();
        let dt = f64::atan2(yp, xp - s) - f64::atan2(yp, xp + s);
        LocalPoint { xp, yp, lr, dt }
    }

    fn rotate_to_global(&self, up: f64, vp: f64) -> na::Vector2<f64> {
        let (sx, sy) = (self.tangent.x, self.tangent.y);
        na::Vector2::new(up * sx - vp * sy, vp * sx + up * sy)
    }
}
