//! Energy of two rods as one of them is rotated about the z-axis.
//!
//! Run with: `cargo run --example orientation --features serde`

use gayberne::twobody::GayBerne;
use gayberne::{Ellipsoid, ForceDefinition, GayBerneForce, Info, Vector3};

fn main() {
    let rod = Ellipsoid::new(1.0, 0.3)
        .with_radii(0.45, 0.15, 0.15)
        .with_scales(1.0, 0.5, 0.5);

    // each rod is oriented by a massless tip particle along its x-axis
    let mut definition = ForceDefinition::default();
    let first = definition.add_particle(rod.clone());
    let second = definition.add_particle(rod);
    let first_tip = definition.add_particle(Ellipsoid::new(0.0, 0.3));
    let second_tip = definition.add_particle(Ellipsoid::new(0.0, 0.3));
    definition.particles[first].x_particle = Some(first_tip);
    definition.particles[second].x_particle = Some(second_tip);

    println!("{}", serde_json::to_string_pretty(&definition).unwrap());
    let force = GayBerneForce::new(definition).unwrap();

    let separation = Vector3::new(0.0, 0.6, 0.0);
    println!("# angle/deg  energy");
    for degrees in (0..=90).step_by(10) {
        let angle = (degrees as f64).to_radians();
        let axis = Vector3::new(angle.cos(), angle.sin(), 0.0);
        let positions = [
            Vector3::zeros(),
            separation,
            -Vector3::x() * 0.1,
            separation - axis * 0.1,
        ];
        let energy = force.energy(&positions, None).unwrap();
        println!("{:>10} {:>10.5}", degrees, energy);
    }
    println!("{}", GayBerne::new(1.0, 0.3).url().unwrap());
}
