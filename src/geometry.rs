//! Panel arrays from point sequences and simple closed shapes.
//!
//! The shape generators sample `n + 1` points clockwise from θ = 0 to
//! θ = -2π, so the last point closes the contour onto the first.

use crate::error::{PanelError, Result};
use crate::panel::Panel;
use crate::panel_array::PanelArray;
use nalgebra as na;
use std::f64::consts::PI;

/// Panels between consecutive points `(x[i], y[i])`.
pub fn panelize(x: &[f64], y: &[f64]) -> Result<PanelArray> {
    if x.len() < 2 {
        return Err(PanelError::TooFewPoints { len: x.len() });
    }
    if x.len() != y.len() {
        return Err(PanelError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    let points: Vec<na::Point2<f64>> = x
        .iter()
        .zip(y)
        .map(|(&x, &y)| na::Point2::new(x, y))
        .collect();
    let panels = points
        .windows(2)
        .map(|pts| Panel::new(pts[0], pts[1]))
        .collect::<Result<Vec<_>>>()?;
    Ok(PanelArray::new(panels))
}

fn clockwise_angles(n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![0.0];
    }
    (0..=n).map(|i| -2.0 * PI * i as f64 / n as f64).collect()
}

/// Regular polygon with `sides` sides inscribed in the unit circle,
/// discretized with `n` panels.
pub fn make_polygon(n: usize, sides: usize) -> Result<PanelArray> {
    let sector = 2.0 * PI / sides as f64;
    let (x, y): (Vec<f64>, Vec<f64>) = clockwise_angles(n)
        .into_iter()
        .map(|theta| {
            let half = PI / sides as f64;
            let r = half.cos() / (theta.rem_euclid(sector) - half).cos();
            (r * theta.cos(), r * theta.sin())
        })
        .unzip();
    panelize(&x, &y)
}

/// Ellipse of unit semi-major axis and thickness ratio `t_c`, centered at
/// `(xcen, ycen)`.
pub fn make_ellipse(n: usize, t_c: f64, xcen: f64, ycen: f64) -> Result<PanelArray> {
    let (x, y): (Vec<f64>, Vec<f64>) = clockwise_angles(n)
        .into_iter()
        .map(|theta| (theta.cos() + xcen, theta.sin() * t_c + ycen))
        .unzip();
    panelize(&x, &y)
}

/// Unit circle centered at `(xcen, ycen)`.
pub fn make_circle(n: usize, xcen: f64, ycen: f64) -> Result<PanelArray> {
    make_ellipse(n, 1.0, xcen, ycen)
}

/// Foil from the Jukowski map of an offset circle.
///
/// `dx` moves the circle's leading edge past x = -1 (thickness), `dtheta`
/// rotates it about (1, 0) (camber) and `dr` grows the radius past the
/// trailing-edge point (rounded trailing edge).
pub fn make_jukowski(n: usize, dx: f64, dtheta: f64, dr: f64) -> Result<PanelArray> {
    let r = (1.0 + dx) / dtheta.cos() + dr;
    let (ds, dc) = dtheta.sin_cos();

    let (x, y): (Vec<f64>, Vec<f64>) = clockwise_angles(n)
        .into_iter()
        .map(|theta| {
            let x = r * theta.cos() - (r - 1.0 - dr);
            let y = r * theta.sin();

            // rotate around (1, 0)
            let x2 = dc * (x - 1.0) + ds * y + 1.0;
            let y2 = -ds * (x - 1.0) + dc * y;
            let r2 = x2 * x2 + y2 * y2;

            (x2 * (1.0 + 1.0 / r2) / 2.0, y2 * (1.0 - 1.0 / r2) / 2.0)
        })
        .unzip();
    panelize(&x, &y)
}
