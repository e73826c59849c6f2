//! Jukowski foils with trailing-edge conditions.

use approx::assert_relative_eq;
use std::f64::consts::PI;
use vortex_panel::{make_jukowski, FlowConfig, Formulation, NodeKutta, PanelArray};

fn circulation(array: &PanelArray) -> f64 {
    array.panels().iter().map(|p| p.gamma() * p.width()).sum()
}

#[test]
fn test_symmetric_foil_no_lift_at_zero_incidence() {
    let mut foil = make_jukowski(64, 0.18, 0.0, 0.0).unwrap();
    foil.solve_gamma_kutta(0.0).unwrap();
    let gamma = foil.gammas();

    assert!(circulation(&foil).abs() < 1e-10);
    for i in 0..64 {
        assert!((gamma[i] + gamma[63 - i]).abs() < 1e-10);
    }
}

#[test]
fn test_kutta_pair_balances_trailing_edge() {
    let mut foil = make_jukowski(64, 0.18, 0.0, 0.0).unwrap();
    foil.solve_gamma_kutta(0.1).unwrap();
    let gamma = foil.gammas();
    assert!((gamma[0] + gamma[63]).abs() < 1e-2);
    // positive incidence gives clockwise (negative) circulation
    assert!(circulation(&foil) < -0.4);
}

#[test]
fn test_linear_kutta_matches_jukowski_lift() {
    let alpha = 0.1;
    let mut foil = make_jukowski(64, 0.18, 0.0, 0.0).unwrap();
    foil.solve_gamma_o2(alpha, &[NodeKutta { body: 0, node: -1 }]).unwrap();

    // the trailing-edge node carries no strength
    assert_eq!(foil.panels()[63].strength().ends().1, 0.0);
    assert_eq!(foil.panels()[0].strength().ends().0, 0.0);

    // circle of radius 1.18 in a half-speed stream maps onto the foil
    let exact = 2.0 * PI * 1.18 * alpha.sin();
    assert_relative_eq!(-circulation(&foil), exact, max_relative = 0.03);
}

#[test]
fn test_config_driven_solve() {
    let json = r#"{"alpha": 0.1, "formulation": "linear", "kutta": [[0, -1]]}"#;
    let config = FlowConfig::from_json(json).unwrap();
    assert_eq!(config.formulation, Formulation::Linear);

    let mut from_config = make_jukowski(48, 0.18, 0.0, 0.0).unwrap();
    from_config.solve(&config).unwrap();

    let mut direct = make_jukowski(48, 0.18, 0.0, 0.0).unwrap();
    direct.solve_gamma_o2(0.1, &[NodeKutta { body: 0, node: -1 }]).unwrap();
    assert_eq!(from_config, direct);
    assert_eq!(from_config.alpha(), 0.1);
}

#[test]
fn test_cambered_foil_lifts_at_zero_incidence() {
    let mut foil = make_jukowski(64, 0.1, 0.1, 0.0).unwrap();
    foil.solve_gamma_o2(0.0, &[NodeKutta { body: 0, node: -1 }]).unwrap();
    assert!(circulation(&foil) < 0.0);
}
