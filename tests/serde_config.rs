//! Serialization of configuration and results (requires the `serde` feature):
//!   cargo test --features serde

#![cfg(feature = "serde")]

use odestep::{integrate, Method, Settings, State, Trajectory};

#[test]
fn test_method_names() {
    assert_eq!(serde_json::to_string(&Method::Rk2).unwrap(), "\"rk2\"");
    let method: Method = serde_json::from_str("\"euler\"").unwrap();
    assert_eq!(method, Method::Euler);
    assert!(serde_json::from_str::<Method>("\"rk45\"").is_err());
}

#[test]
fn test_settings_defaults_fill_missing_fields() {
    let settings: Settings = serde_json::from_str(r#"{ "max_steps": 500 }"#).unwrap();
    assert_eq!(settings.max_steps, 500);
    assert_eq!(settings.snap_tolerance, Settings::default().snap_tolerance);
}

#[test]
fn test_state_is_a_plain_array() {
    let x = State::from([1.0, -2.5]);
    assert_eq!(serde_json::to_string(&x).unwrap(), "[1.0,-2.5]");
    let y: State = serde_json::from_str("[3.0]").unwrap();
    assert_eq!(y, State::scalar(3.0));
}

#[test]
fn test_trajectory_survives_json() {
    let f = |x: &State, _t: f64| State::from([-x[0]]);
    let traj = integrate(&State::scalar(1.0), 0.0, 1.0, 0.25, &f, Method::Rk4).unwrap();

    let json = serde_json::to_string(&traj).unwrap();
    let back: Trajectory = serde_json::from_str(&json).unwrap();
    assert_eq!(back, traj);
}

#[test]
fn test_inconsistent_trajectory_rejected() {
    // times out of order, a state of the wrong dimension, one state short
    let broken = r#"{"dim":1,"times":[1.0,0.0,5.0],"states":[[1.0],[1.0,2.0,3.0]]}"#;
    assert!(serde_json::from_str::<Trajectory>(broken).is_err());

    let wrong_dim = r#"{"dim":1,"times":[0.0,1.0],"states":[[1.0],[1.0,2.0]]}"#;
    let err = serde_json::from_str::<Trajectory>(wrong_dim).unwrap_err();
    assert!(err.to_string().contains("dimension"), "{}", err);

    let unordered = r#"{"dim":1,"times":[0.0,1.0,0.5],"states":[[1.0],[2.0],[3.0]]}"#;
    assert!(serde_json::from_str::<Trajectory>(unordered).is_err());

    let traj: Trajectory =
        serde_json::from_str(r#"{"dim":2,"times":[2.0,1.0],"states":[[1.0,0.0],[0.5,0.5]]}"#)
            .unwrap();
    assert_eq!(traj.direction(), Some(-1.0));
    assert_eq!(traj.last().map(|(t, _)| t), Some(1.0));
}
