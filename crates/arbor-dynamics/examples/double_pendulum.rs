//! Double pendulum forward dynamics.
//!
//! Builds a two-link pendulum released from a horizontal pose, integrates
//! it with semi-implicit Euler, and tracks the total energy over the run.

use arbor_dynamics::{aba, integrate, total_energy};
use arbor_math::{DVec, GRAVITY, Mat3, SpatialInertia, SpatialTransform, Vec3};
use arbor_model::ModelBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Double Pendulum ===\n");

    let mass = 1.0;
    let length = 1.0;
    let link = SpatialInertia::new(
        mass,
        Vec3::new(0.0, -length / 2.0, 0.0),
        Mat3::from_diagonal(&Vec3::new(
            mass * length * length / 12.0,
            0.0,
            mass * length * length / 12.0,
        )),
    );

    let model = ModelBuilder::new()
        .gravity(Vec3::new(0.0, -GRAVITY, 0.0))
        .add_revolute(
            "link1",
            0,
            nalgebra::Vector3::z_axis(),
            SpatialTransform::identity(),
            link,
        )
        .add_revolute(
            "link2",
            1,
            nalgebra::Vector3::z_axis(),
            SpatialTransform::translation(Vec3::new(0.0, -length, 0.0)),
            link,
        )
        .build()?;

    let mut data = model.create_data();
    let mut q = model.neutral_config();
    let mut v = DVec::zeros(model.nv);
    let tau = DVec::zeros(model.nv);

    // Release with the upper link horizontal and the lower link folded along it.
    q[0] = std::f64::consts::FRAC_PI_2;

    let dt = 1e-4;
    let total_steps = 50_000; // 5 seconds
    let print_every = 5_000;

    let e0 = total_energy(&model, &mut data, &q, &v)?;

    println!("time(s)    q1(rad)    q2(rad)    energy(J)");
    println!("────────────────────────────────────────────");

    for step in 0..total_steps {
        if step % print_every == 0 {
            let e = total_energy(&model, &mut data, &q, &v)?;
            println!(
                "{:7.3}   {:+8.4}   {:+8.4}   {:10.6}",
                step as f64 * dt,
                q[0],
                q[1],
                e
            );
        }

        aba(&model, &mut data, &q, &v, &tau)?;
        v += &(&data.ddq * dt);
        let dq = &v * dt;
        q = integrate(&model, &q, &dq)?;
    }

    let e1 = total_energy(&model, &mut data, &q, &v)?;

    println!("\n=== Summary ===");
    println!("steps: {}  dt: {} s", total_steps, dt);
    println!("initial energy: {:+.6} J", e0);
    println!("final energy:   {:+.6} J", e1);
    println!("drift:          {:+.2e} J", e1 - e0);

    Ok(())
}
