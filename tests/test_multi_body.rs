//! Several bodies sharing one system of unknowns.

use approx::assert_relative_eq;
use vortex_panel::{
    concatenate, make_circle, make_ellipse, panelize, NodeKutta, PanelArray, PanelError,
};

fn body_circulation(array: &PanelArray, body: usize) -> f64 {
    array.panels()[array.bodies()[body].clone()]
        .iter()
        .map(|p| p.gamma() * p.width())
        .sum()
}

#[test]
fn test_concatenate_preserves_bodies() {
    let a = make_circle(12, 0.0, 0.0).unwrap();
    let b = make_ellipse(8, 0.5, 3.0, 0.0).unwrap();
    let c = concatenate(&[&a, &b]).unwrap();

    assert_eq!(c.len(), 20);
    assert_eq!(c.bodies(), &[0..12, 12..20]);
    assert_eq!(&c.panels()[..12], a.panels());
    assert_eq!(&c.panels()[12..], b.panels());

    let left = c.left_indices();
    assert_eq!(left[0], 11);
    assert_eq!(left[12], 19);
    assert_eq!(left[13], 12);
    for (i, l) in b.left_indices().iter().enumerate() {
        assert_eq!(left[i + 12], l + 12);
    }
}

#[test]
fn test_concatenate_three_is_left_associative() {
    let a = make_circle(6, 0.0, 0.0).unwrap();
    let b = make_circle(5, 3.0, 0.0).unwrap();
    let c = make_circle(4, 0.0, 3.0).unwrap();
    let abc = concatenate(&[&a, &b, &c]).unwrap();
    let nested = concatenate(&[&concatenate(&[&a, &b]).unwrap(), &c]).unwrap();
    assert_eq!(abc, nested);
    assert_eq!(abc.bodies(), &[0..6, 6..11, 11..15]);
    assert_eq!(abc.left_indices()[11], 14);
}

#[test]
fn test_two_cylinders_linear() {
    let a = make_circle(16, 0.0, 0.0).unwrap();
    let b = make_circle(16, 3.0, 0.0).unwrap();
    let mut pair = concatenate(&[&a, &b]).unwrap();
    pair.solve_gamma_o2(0.0, &[]).unwrap();

    // one closure condition per body
    assert!(body_circulation(&pair, 0).abs() < 1e-10);
    assert!(body_circulation(&pair, 1).abs() < 1e-10);

    // no-penetration holds away from the closure rows
    let velocities = pair.flow_velocity(&pair.centers());
    for (i, (p, v)) in pair.panels().iter().zip(&velocities).enumerate() {
        if i == 0 || i == 16 {
            continue;
        }
        assert!(p.normal_component(v).abs() < 1e-10, "panel {}", i);
    }
}

#[test]
fn test_unclosed_body_is_singular() {
    let a = make_circle(16, 0.0, 0.0).unwrap();
    let b = make_circle(16, 3.0, 0.0).unwrap();
    let mut pair = concatenate(&[&a, &b]).unwrap();
    pair.solve_gamma_o2(0.0, &[]).unwrap();
    let before = pair.clone();

    // pinning a node of the first body twice leaves the second body's
    // circulation undetermined
    let pinned = [NodeKutta { body: 0, node: 0 }, NodeKutta { body: 0, node: 0 }];
    let err = pair.solve_gamma_o2(0.1, &pinned).unwrap_err();
    assert!(err.is_singular());
    assert_eq!(pair, before);
    assert_eq!(pair.alpha(), 0.0);
}

#[test]
fn test_two_cylinders_constant() {
    let a = make_circle(16, 0.0, 0.0).unwrap();
    let b = make_circle(16, 3.0, 0.0).unwrap();
    let mut pair = concatenate(&[&a, &b]).unwrap();
    pair.solve_gamma(0.0, &[]).unwrap();
    assert!(body_circulation(&pair, 0).abs() < 1e-10);
    // the neighbour speeds the flow up slightly
    let max = pair.gammas().iter().fold(0.0_f64, |m, g| m.max(g.abs()));
    assert!(max > 1.5 && max < 2.2);
}

#[test]
fn test_distance_along_sequence() {
    let array = panelize(&[0.0, 1.0, 1.0, 4.0, 4.0], &[0.0, 0.0, 2.0, 2.0, 0.0]).unwrap();
    let s = array.distance();
    for w in s.windows(2) {
        assert!(w[1] > w[0]);
    }
    let widths: Vec<f64> = array.panels().iter().map(|p| p.width()).collect();
    let expected: f64 = widths[..3].iter().sum::<f64>() + 0.5 * widths[3];
    assert_relative_eq!(s[3], expected);
    assert_relative_eq!(s[3], 7.0);
}

#[test]
fn test_invalid_geometry_before_solve() {
    let err = panelize(&[0.0, 1.0], &[0.0]).unwrap_err();
    assert!(err.is_geometry_error());
    let err = make_circle(0, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, PanelError::TooFewPoints { len: 1 }));
}
