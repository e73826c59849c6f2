//! Laminar boundary-layer marching along a surface speed distribution.
//!
//! The panel solver hands a run of panels over as arc length `s` and edge
//! speed `u_e`. [`BoundaryLayer`] is that hand-off; [`LaminarMarch`] is the
//! default implementation, marching either Pohlhausen's quartic profile or
//! Thwaites' integral from a stagnation point.

use crate::error::{PanelError, Result};

/// Shape parameter below which a Pohlhausen profile has separated.
pub const POHLHAUSEN_SEPARATION: f64 = -12.0;

/// Shape parameter below which Thwaites' method predicts separation.
pub const THWAITES_SEPARATION: f64 = -0.09;

/// Momentum thickness and shape parameter along a run of panels.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLayerProfile {
    /// Momentum thickness at each point
    pub delta2: Vec<f64>,
    /// Pressure-gradient shape parameter at each point
    pub lam: Vec<f64>,
    /// Last attached index; `len - 1` when the layer never separates.
    ///
    /// Thwaites' method also reports `0` when the first point is already
    /// past separation; `lam[0]` below [`THWAITES_SEPARATION`] tells the two
    /// apart. Pohlhausen marches always start attached.
    pub i_sep: usize,
}

/// Boundary-layer collaborator used by [`crate::PanelArray::march`].
pub trait BoundaryLayer {
    /// March along `s` with edge speed `u_e` and kinematic viscosity `nu`.
    fn march(
        &self,
        s: &[f64],
        u_e: &[f64],
        nu: f64,
        thwaites: bool,
    ) -> Result<BoundaryLayerProfile>;

    /// Value of `values` at the separation point following index `i_sep`.
    ///
    /// Separation lies between `i_sep` and the next point; the default takes
    /// the midpoint.
    fn sep(&self, values: &[f64], i_sep: usize) -> f64 {
        match (values.get(i_sep), values.get(i_sep + 1)) {
            (Some(a), Some(b)) => 0.5 * (a + b),
            (Some(a), None) => *a,
            _ => f64::NAN,
        }
    }
}

/// Laminar marching with Pohlhausen (default) or Thwaites closure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaminarMarch;

impl BoundaryLayer for LaminarMarch {
    fn march(
        &self,
        s: &[f64],
        u_e: &[f64],
        nu: f64,
        thwaites: bool,
    ) -> Result<BoundaryLayerProfile> {
        if s.len() != u_e.len() {
            return Err(PanelError::LengthMismatch {
                x_len: s.len(),
                y_len: u_e.len(),
            });
        }
        if s.len() < 2 {
            return Err(PanelError::TooFewPoints { len: s.len() });
        }
        if !(nu > 0.0 && nu.is_finite()) {
            return Err(PanelError::InvalidViscosity(nu));
        }

        let profile = if thwaites {
            march_thwaites(s, u_e, nu)
        } else {
            march_pohlhausen(s, u_e, nu)
        };
        log::debug!(
            "{} march over {} points, separation index {}",
            if thwaites { "thwaites" } else { "pohlhausen" },
            s.len(),
            profile.i_sep
        );
        Ok(profile)
    }
}

// Pohlhausen quartic profile ratios as functions of the shape parameter.

fn disp_ratio(lam: f64) -> f64 {
    3.0 / 10.0 - lam / 120.0
}

fn mom_ratio(lam: f64) -> f64 {
    37.0 / 315.0 - lam / 945.0 - lam * lam / 9072.0
}

fn df_0(lam: f64) -> f64 {
    2.0 + lam / 6.0
}

fn g_1(lam: f64) -> f64 {
    df_0(lam) - lam * (disp_ratio(lam) + 2.0 * mom_ratio(lam))
}

/// Stagnation-point shape parameter, the root of `g_1` in [-12, 12].
pub fn stagnation_lambda() -> f64 {
    let (mut a, mut b) = (POHLHAUSEN_SEPARATION, -POHLHAUSEN_SEPARATION);
    let fa = g_1(a);
    for _ in 0..100 {
        let m = 0.5 * (a + b);
        if fa * g_1(m) <= 0.0 {
            b = m;
        } else {
            a = m;
        }
    }
    0.5 * (a + b)
}

/// Growth rate of the Pohlhausen thickness.
fn ddx_delta(delta: f64, u_e: f64, du_e: f64, nu: f64) -> f64 {
    let re_d = delta * u_e / nu;
    if re_d == 0.0 {
        return 0.0;
    }
    let lam = delta * delta * du_e / nu;
    g_1(lam) / mom_ratio(lam) / re_d
}

/// Derivative of `y` with respect to `x`: second-order central differences
/// inside, one-sided at the ends.
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len();
    let mut dy = vec![0.0; n];
    if n < 2 {
        return dy;
    }
    dy[0] = (y[1] - y[0]) / (x[1] - x[0]);
    dy[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);
    for i in 1..n - 1 {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        dy[i] = (hs * hs * y[i + 1] + (hd * hd - hs * hs) * y[i] - hd * hd * y[i - 1])
            / (hs * hd * (hd + hs));
    }
    dy
}

fn march_pohlhausen(s: &[f64], u_e: &[f64], nu: f64) -> BoundaryLayerProfile {
    let n = s.len();
    let du_e = gradient(u_e, s);
    let lam0 = stagnation_lambda();

    let mut delta = vec![0.0; n];
    let mut lam = vec![lam0; n];
    if du_e[0] > 0.0 {
        delta[0] = (lam0 * nu / du_e[0]).sqrt();
    }

    let mut i_sep = n - 1;
    for i in 0..n - 1 {
        // Heun's predictor-corrector step
        let dx = s[i + 1] - s[i];
        let g_i = ddx_delta(delta[i], u_e[i], du_e[i], nu);
        let guess = delta[i] + g_i * dx;
        let g_next = ddx_delta(guess, u_e[i + 1], du_e[i + 1], nu);
        delta[i + 1] = delta[i] + 0.5 * (g_i + g_next) * dx;
        lam[i + 1] = delta[i + 1] * delta[i + 1] * du_e[i + 1] / nu;
        if lam[i + 1] < POHLHAUSEN_SEPARATION {
            i_sep = i;
            break;
        }
    }

    let delta2 = delta.iter().zip(&lam).map(|(d, l)| d * mom_ratio(*l)).collect();
    BoundaryLayerProfile { delta2, lam, i_sep }
}

fn march_thwaites(s: &[f64], u_e: &[f64], nu: f64) -> BoundaryLayerProfile {
    let n = s.len();
    let du_e = gradient(u_e, s);

    // the first leg starts from a stagnation point at s = 0
    let mut integral = vec![0.0; n];
    integral[0] = u_e[0].powi(5) * s[0] / 6.0;
    for i in 1..n {
        let leg = 0.5 * (u_e[i].powi(5) + u_e[i - 1].powi(5)) * (s[i] - s[i - 1]);
        integral[i] = integral[i - 1] + leg;
    }

    let mut delta2 = vec![0.0; n];
    let mut lam = vec![0.0; n];
    for i in 0..n {
        if u_e[i] > 0.0 {
            let d2 = 0.45 * nu * integral[i] / u_e[i].powi(6);
            delta2[i] = d2.sqrt();
            lam[i] = d2 * du_e[i] / nu;
        }
    }

    let i_sep = lam
        .iter()
        .position(|&l| l < THWAITES_SEPARATION)
        .map_or(n - 1, |i| i.saturating_sub(1));
    BoundaryLayerProfile { delta2, lam, i_sep }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| a + (b - a) * i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn test_stagnation_lambda() {
        let lam0 = stagnation_lambda();
        assert_relative_eq!(lam0, 7.0523, epsilon = 1e-3);
        assert!(g_1(lam0).abs() < 1e-10);
    }

    #[test]
    fn test_gradient_exact_for_quadratic() {
        let x = vec![0.0, 0.5, 1.5, 2.0, 3.5];
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let dy = gradient(&y, &x);
        for i in 1..4 {
            assert_relative_eq!(dy[i], 2.0 * x[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_stagnation_flow_stays_attached() {
        // u_e = s: Hiemenz flow, constant thickness, never separates
        let s = linspace(0.01, 1.0, 50);
        let profile = LaminarMarch.march(&s, &s, 1e-5, false).unwrap();
        assert_eq!(profile.i_sep, 49);
        let lam0 = stagnation_lambda();
        for l in &profile.lam {
            assert_relative_eq!(*l, lam0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_thwaites_stagnation_value() {
        let s = linspace(0.01, 1.0, 50);
        let profile = LaminarMarch.march(&s, &s, 1e-5, true).unwrap();
        assert_eq!(profile.i_sep, 49);
        assert_relative_eq!(profile.lam[0], 0.075, epsilon = 1e-12);
        // trapezoid error decays away from the start
        for l in &profile.lam[25..] {
            assert_relative_eq!(*l, 0.075, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_cylinder_separates() {
        // surface speed 2 sin(s) on a unit cylinder separates past the top
        let s = linspace(0.01, std::f64::consts::PI - 0.01, 200);
        let u_e: Vec<f64> = s.iter().map(|v| 2.0 * v.sin()).collect();
        for thwaites in [false, true] {
            let profile = LaminarMarch.march(&s, &u_e, 1e-5, thwaites).unwrap();
            let theta_sep = s[profile.i_sep];
            assert!(theta_sep > 1.6 && theta_sep < 2.0, "separation at {}", theta_sep);
        }
    }

    #[test]
    fn test_thwaites_separated_at_first_point() {
        // decelerating from the first point: lam[0] = -0.45 s0 / (6 u0) = -0.225
        let s = linspace(1.5, 1.9, 5);
        let u_e: Vec<f64> = s.iter().map(|v| 2.0 - v).collect();
        let profile = LaminarMarch.march(&s, &u_e, 1e-5, true).unwrap();
        assert_eq!(profile.i_sep, 0);
        assert_relative_eq!(profile.lam[0], -0.225, epsilon = 1e-12);
        assert!(profile.lam[0] < THWAITES_SEPARATION);
    }

    #[test]
    fn test_sep_interpolates() {
        let values = [0.0, 1.0, 3.0];
        assert_relative_eq!(LaminarMarch.sep(&values, 1), 2.0);
        assert_relative_eq!(LaminarMarch.sep(&values, 2), 3.0);
    }

    #[test]
    fn test_input_validation() {
        assert!(LaminarMarch.march(&[0.0, 1.0], &[1.0], 1e-5, false).is_err());
        assert!(LaminarMarch.march(&[0.0], &[1.0], 1e-5, false).is_err());
        let err = LaminarMarch.march(&[0.0, 1.0], &[1.0, 2.0], -1.0, true).unwrap_err();
        assert!(matches!(err, PanelError::InvalidViscosity(_)));
    }
}
