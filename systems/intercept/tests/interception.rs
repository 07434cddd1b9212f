use std::time::Duration;

use glam::Vec3;
use path_defence_core::SPEED_TIME_BASE;
use path_defence_system_intercept::{time_to_interception, InterceptError};

#[test]
fn stationary_target_takes_straight_line_flight_time() {
    let time = time_to_interception(
        Vec3::new(100.0, 100.0, 0.0),
        Vec3::ZERO,
        Vec3::ZERO,
        50.0,
    )
    .expect("stationary target is reachable");

    let millis = time.as_secs_f64() * 1_000.0;
    approx::assert_abs_diff_eq!(millis, 2_828.427, epsilon = 0.05);
}

#[test]
fn target_fleeing_faster_than_projectile_is_unreachable() {
    let error = time_to_interception(
        Vec3::new(100.0, 0.0, 0.0),
        Vec3::new(60.0, 0.0, 0.0),
        Vec3::ZERO,
        50.0,
    )
    .expect_err("fleeing target");

    assert_eq!(error, InterceptError::InPast);
    assert!(error.is_unreachable());
}

#[test]
fn faster_projectiles_approach_instant_travel() {
    let target = Vec3::new(60.0, -25.0, 0.0);
    let velocity = Vec3::new(0.0, 30.0, 0.0);
    let shooter = Vec3::new(0.0, 0.0, 12.0);
    let distance = (target - shooter).length();

    let mut previous_error = f32::INFINITY;
    for speed in [100.0_f32, 1_000.0, 10_000.0, 100_000.0] {
        let time = time_to_interception(target, velocity, shooter, speed).expect("reachable");
        let direct = distance / speed * SPEED_TIME_BASE.as_secs_f32();
        let relative_error = (time.as_secs_f32() - direct).abs() / direct;

        assert!(
            relative_error <= previous_error,
            "error grew at speed {speed}: {relative_error} > {previous_error}"
        );
        previous_error = relative_error;
    }

    assert!(previous_error < 1e-3, "limit not approached: {previous_error}");
}

#[test]
fn reachable_solutions_satisfy_the_interception_equation() {
    let shooter = Vec3::new(7.5, 7.5, 11.25);
    let cases = [
        (Vec3::new(45.0, 0.0, 0.0), Vec3::new(0.0, 30.0, 0.0), 80.0),
        (Vec3::new(0.0, 90.0, 0.0), Vec3::new(30.0, 0.0, 0.0), 45.0),
        (Vec3::new(-30.0, 15.0, 0.0), Vec3::new(-30.0, -30.0, 0.0), 60.0),
        (Vec3::new(120.0, 120.0, 0.0), Vec3::new(-30.0, 0.0, 0.0), 31.0),
    ];

    for (target, velocity, speed) in cases {
        let time = time_to_interception(target, velocity, shooter, speed).expect("reachable");
        let t = time.as_secs_f32() / SPEED_TIME_BASE.as_secs_f32();
        let meeting = target + velocity * t;
        let projectile_travel = speed * t;

        approx::assert_relative_eq!(
            (meeting - shooter).length(),
            projectile_travel,
            max_relative = 1e-3
        );
    }
}

#[test]
fn unreachable_geometry_never_yields_a_time() {
    let crossing = time_to_interception(
        Vec3::new(0.0, 50.0, 0.0),
        Vec3::new(500.0, 0.0, 0.0),
        Vec3::ZERO,
        20.0,
    );
    assert_eq!(crossing, Err(InterceptError::NoRealRoot));

    let receding = time_to_interception(
        Vec3::new(10.0, 10.0, 0.0),
        Vec3::new(40.0, 40.0, 0.0),
        Vec3::ZERO,
        20.0,
    );
    assert_eq!(receding, Err(InterceptError::InPast));
}

#[test]
fn zero_offset_returns_zero_time() {
    let time = time_to_interception(Vec3::splat(4.0), Vec3::ZERO, Vec3::splat(4.0), 1.0);
    assert_eq!(time, Ok(Duration::ZERO));
}
