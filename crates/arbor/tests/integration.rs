//! Integration tests for the arbor dynamics stack.

use approx::assert_relative_eq;
use arbor::{
    GRAVITY, Model, ModelBuilder, SpatialInertia, SpatialTransform, Vec3, aba,
    arbor_math::{DVec, Mat3},
    integrate, rnea, step, total_energy,
};

/// Single pendulum: revolute about Z, gravity along -Y, rod mass 1 kg
/// length 1 m with the pivot at its end.
fn make_pendulum() -> Model {
    let mass = 1.0;
    let length = 1.0;
    ModelBuilder::new()
        .gravity(Vec3::new(0.0, -GRAVITY, 0.0))
        .add_revolute(
            "pendulum",
            0,
            nalgebra::Vector3::z_axis(),
            SpatialTransform::identity(),
            SpatialInertia::new(
                mass,
                Vec3::new(0.0, -length / 2.0, 0.0),
                Mat3::from_diagonal(&Vec3::new(
                    mass * length * length / 12.0,
                    0.0,
                    mass * length * length / 12.0,
                )),
            ),
        )
        .build()
        .unwrap()
}

/// Double pendulum with two identical links.
fn make_double_pendulum() -> Model {
    let mass = 1.0;
    let length = 1.0;
    let inertia = SpatialInertia::new(
        mass,
        Vec3::new(0.0, -length / 2.0, 0.0),
        Mat3::from_diagonal(&Vec3::new(
            mass * length * length / 12.0,
            0.0,
            mass * length * length / 12.0,
        )),
    );
    ModelBuilder::new()
        .gravity(Vec3::new(0.0, -GRAVITY, 0.0))
        .add_revolute(
            "link1",
            0,
            nalgebra::Vector3::z_axis(),
            SpatialTransform::identity(),
            inertia,
        )
        .add_revolute(
            "link2",
            1,
            nalgebra::Vector3::z_axis(),
            SpatialTransform::translation(Vec3::new(0.0, -length, 0.0)),
            inertia,
        )
        .build()
        .unwrap()
}

/// Floating-base tree exercising every joint variant: a free-flyer base
/// carrying a revolute trunk (spherical arm on one side, prismatic slider
/// with a revolute tip on the other) and a translation carriage with a
/// fixed sensor mass.
fn make_branched_tree() -> Model {
    ModelBuilder::new()
        .add_free_flyer(
            "base",
            0,
            SpatialTransform::identity(),
            SpatialInertia::cuboid(2.0, 0.2, 0.6, 0.2),
        )
        .add_revolute(
            "trunk",
            1,
            nalgebra::Vector3::y_axis(),
            SpatialTransform::translation(Vec3::new(0.0, 0.1, 0.0)),
            SpatialInertia::cuboid(1.2, 0.2, 0.4, 0.2),
        )
        .add_spherical(
            "arm",
            2,
            SpatialTransform::translation(Vec3::new(0.15, 0.3, 0.0)),
            SpatialInertia::rod(0.8, 0.5),
        )
        .add_prismatic(
            "slider",
            2,
            nalgebra::Vector3::x_axis(),
            SpatialTransform::translation(Vec3::new(-0.15, 0.3, 0.0)),
            SpatialInertia::cuboid(0.5, 0.3, 0.1, 0.1),
        )
        .add_translation(
            "carriage",
            1,
            SpatialTransform::translation(Vec3::new(0.0, -0.1, 0.2)),
            SpatialInertia::sphere(0.4, 0.08),
        )
        .add_revolute(
            "tip",
            4,
            nalgebra::Vector3::z_axis(),
            SpatialTransform::translation(Vec3::new(-0.2, 0.0, 0.0)),
            SpatialInertia::sphere(0.3, 0.05),
        )
        .add_fixed(
            "sensor",
            5,
            SpatialTransform::translation(Vec3::new(0.0, 0.0, 0.05)),
            SpatialInertia::point_mass(0.05, Vec3::zeros()),
        )
        .build()
        .unwrap()
}

#[test]
fn single_pendulum_period() {
    let dt = 0.0001;
    let model = make_pendulum();
    let mut data = model.create_data();
    let mut q = DVec::zeros(model.nq);
    let mut v = DVec::zeros(model.nv);
    let tau = DVec::zeros(model.nv);
    q[0] = 0.1; // small angle

    // Compound pendulum: T = 2π·sqrt(I_pivot / (m·g·d)) with
    // I_pivot = m·L²/3 and d = L/2.
    let i_pivot = 1.0 / 3.0;
    let expected_period = 2.0 * std::f64::consts::PI * (i_pivot / (GRAVITY * 0.5)).sqrt();

    let total_steps = (10.0 / dt) as usize;
    let mut prev_q = q[0];
    let mut zero_crossings: Vec<f64> = Vec::new();
    for n in 0..total_steps {
        step(&model, &mut data, &mut q, &mut v, &tau, dt).unwrap();
        if prev_q > 0.0 && q[0] <= 0.0 {
            let frac = prev_q / (prev_q - q[0]);
            zero_crossings.push((n as f64 + frac) * dt);
        }
        prev_q = q[0];
    }

    assert!(
        zero_crossings.len() >= 2,
        "need at least 2 zero crossings, got {}",
        zero_crossings.len()
    );
    let mut periods = Vec::new();
    for i in 0..zero_crossings.len() - 1 {
        periods.push(zero_crossings[i + 1] - zero_crossings[i]);
    }
    let avg_period: f64 = periods.iter().sum::<f64>() / periods.len() as f64;
    let relative_error = ((avg_period - expected_period) / expected_period).abs();
    assert!(
        relative_error < 0.02,
        "period error {:.4}% exceeds 2% (measured={:.6}, expected={:.6})",
        relative_error * 100.0,
        avg_period,
        expected_period,
    );
}

#[test]
fn double_pendulum_energy_stays_bounded() {
    let dt = 0.0001;
    let model = make_double_pendulum();
    let mut data = model.create_data();
    let mut q = DVec::zeros(model.nq);
    let mut v = DVec::zeros(model.nv);
    let tau = DVec::zeros(model.nv);
    q[0] = 0.5;
    q[1] = 0.3;

    let e0 = total_energy(&model, &mut data, &q, &v).unwrap();
    let total_steps = (2.0 / dt) as usize;
    for _ in 0..total_steps {
        step(&model, &mut data, &mut q, &mut v, &tau, dt).unwrap();
    }
    let e_final = total_energy(&model, &mut data, &q, &v).unwrap();

    // The semi-implicit Euler stepper keeps the drift small at this dt; the
    // scale reference is the initial height offset of the two links.
    let scale = 2.0 * GRAVITY;
    let drift = ((e_final - e0) / scale).abs();
    assert!(
        drift < 0.01,
        "energy drift {:.3e} exceeds 1% of m·g·L scale (e0={:.6}, e_final={:.6})",
        drift,
        e0,
        e_final,
    );
}

#[test]
fn free_body_freefall_trajectory() {
    let dt = 0.001;
    let model = ModelBuilder::new()
        .add_free_flyer(
            "ball",
            0,
            SpatialTransform::identity(),
            SpatialInertia::sphere(1.0, 0.1),
        )
        .build()
        .unwrap();
    let mut data = model.create_data();
    let mut q = model.neutral_config();
    let mut v = DVec::zeros(model.nv);
    let tau = DVec::zeros(model.nv);

    for _ in 0..100 {
        step(&model, &mut data, &mut q, &mut v, &tau, dt).unwrap();
    }

    // After t = 0.1 s: vz = −g·t, and z ≈ −g·t²/2 lands in q[2] because the
    // free-flyer configuration leads with the translation.
    let t = 0.1;
    assert_relative_eq!(v[5], -GRAVITY * t, epsilon = 1e-9);
    assert_relative_eq!(q[2], -0.5 * GRAVITY * t * t, epsilon = 1e-3);
    // Orientation must not drift.
    assert_relative_eq!(q[6], 1.0, epsilon = 1e-12);
}

#[test]
fn torque_free_body_conserves_angular_momentum() {
    let dt = 0.0001;
    let inertia_diag = Vec3::new(1.0, 2.0, 3.0);
    let model = ModelBuilder::new()
        .gravity(Vec3::zeros())
        .add_free_flyer(
            "box",
            0,
            SpatialTransform::identity(),
            SpatialInertia::new(2.0, Vec3::zeros(), Mat3::from_diagonal(&inertia_diag)),
        )
        .build()
        .unwrap();
    let mut data = model.create_data();
    let mut q = model.neutral_config();
    let mut v = DVec::zeros(model.nv);
    let tau = DVec::zeros(model.nv);
    v[0] = 0.3;
    v[1] = -1.1;
    v[2] = 0.7;

    let i_com = Mat3::from_diagonal(&inertia_diag);
    let l0 = i_com * Vec3::new(v[0], v[1], v[2]);

    for _ in 0..5000 {
        step(&model, &mut data, &mut q, &mut v, &tau, dt).unwrap();
    }

    // World-frame angular momentum L = R·(I·w) is a constant of motion.
    let quat = nalgebra::UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(
        q[6], q[3], q[4], q[5],
    ));
    let w = Vec3::new(v[0], v[1], v[2]);
    let l_world = quat.to_rotation_matrix() * (i_com * w);
    for k in 0..3 {
        assert_relative_eq!(l_world[k], l0[k], epsilon = 1e-3 * l0.norm());
    }
}

#[test]
fn branched_tree_forward_inverse_roundtrip() {
    let model = make_branched_tree();

    let neutral = model.neutral_config();
    let mut dq = DVec::zeros(model.nv);
    for (k, x) in dq.iter_mut().enumerate() {
        *x = 0.4 * ((k as f64) * 1.7 + 0.3).sin();
    }
    let q = integrate(&model, &neutral, &dq).unwrap();
    let mut v = DVec::zeros(model.nv);
    let mut tau = DVec::zeros(model.nv);
    for k in 0..model.nv {
        v[k] = 0.6 * ((k as f64) * 0.9 - 1.2).cos();
        tau[k] = 0.5 * (k as f64) - 1.0;
    }

    let mut data = model.create_data();
    let ddq = aba(&model, &mut data, &q, &v, &tau).unwrap().clone();
    let mut data2 = model.create_data();
    let tau_rec = rnea(&model, &mut data2, &q, &v, &ddq).unwrap();
    for k in 0..model.nv {
        assert_relative_eq!(tau_rec[k], tau[k], epsilon = 1e-9);
    }
}

#[test]
fn vertical_slider_accelerates_at_gravity() {
    // A frictionless prismatic joint along Z: ddq = −g regardless of mass.
    let model = ModelBuilder::new()
        .add_prismatic(
            "slider",
            0,
            nalgebra::Vector3::z_axis(),
            SpatialTransform::identity(),
            SpatialInertia::cuboid(7.3, 0.1, 0.2, 0.3),
        )
        .build()
        .unwrap();
    let mut data = model.create_data();
    let q = DVec::zeros(1);
    let v = DVec::zeros(1);
    let tau = DVec::zeros(1);
    let ddq = aba(&model, &mut data, &q, &v, &tau).unwrap();
    assert_relative_eq!(ddq[0], -GRAVITY, epsilon = 1e-12);
}
