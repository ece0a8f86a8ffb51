use approx::assert_relative_eq;
use gayberne::twobody::{IsotropicTwobodyEnergy, LennardJones};
use gayberne::{
    Ellipsoid, Error, Exception, ForceDefinition, GayBerneForce, NonbondedMethod, PeriodicBox,
    Vector3,
};

/// Two biaxial ellipsoids oriented by two point particles
///
/// Particle 0 takes its frame from particles 2 and 3, particle 1 from particle 0,
/// and from particle 3 as well if `full_frames` is set.
fn ellipsoids(full_frames: bool) -> (ForceDefinition, Vec<Vector3>) {
    let mut definition = ForceDefinition::default();
    definition.add_particle(
        Ellipsoid::new(1.0, 0.3)
            .with_frame(Some(2), Some(3))
            .with_radii(0.3, 0.2, 0.1)
            .with_scales(1.0, 0.8, 0.6),
    );
    definition.add_particle(
        Ellipsoid::new(0.8, 0.35)
            .with_frame(Some(0), full_frames.then_some(3))
            .with_radii(0.25, 0.2, 0.15)
            .with_scales(0.9, 1.1, 0.7),
    );
    definition.add_particle(Ellipsoid::new(0.5, 0.3));
    definition.add_particle(Ellipsoid::new(0.6, 0.4));
    let positions = vec![
        Vector3::zeros(),
        Vector3::new(0.6, 0.2, 0.1),
        Vector3::new(-1.0, 0.1, 0.05),
        Vector3::new(0.2, -1.1, 0.3),
    ];
    (definition, positions)
}

/// Compare forces with central differences of the energy
fn assert_forces_match_energy(
    force: &GayBerneForce,
    positions: &[Vector3],
    periodic_box: Option<&PeriodicBox>,
) {
    const EPS: f64 = 1e-6;
    let mut forces = vec![Vector3::zeros(); positions.len()];
    force.calculate(positions, periodic_box, &mut forces).unwrap();
    assert!(forces.iter().any(|f| f.norm() > 1e-3));

    let mut displaced = positions.to_vec();
    for particle in 0..positions.len() {
        for k in 0..3 {
            displaced[particle][k] = positions[particle][k] + EPS;
            let forward = force.energy(&displaced, periodic_box).unwrap();
            displaced[particle][k] = positions[particle][k] - EPS;
            let backward = force.energy(&displaced, periodic_box).unwrap();
            displaced[particle][k] = positions[particle][k];
            let numeric = -(forward - backward) / (2.0 * EPS);
            assert_relative_eq!(
                forces[particle][k],
                numeric,
                epsilon = 1e-6,
                max_relative = 1e-4
            );
        }
    }
}

#[test]
fn lennard_jones_minimum() {
    let mut definition = ForceDefinition::default();
    definition.add_particle(Ellipsoid::new(1.0, 0.3));
    definition.add_particle(Ellipsoid::new(1.0, 0.3));
    let force = GayBerneForce::new(definition).unwrap();
    let r_min = 0.3 * f64::powf(2.0, 1.0 / 6.0);
    let positions = [Vector3::new(0.1, 0.2, 0.3), Vector3::new(0.1 + r_min, 0.2, 0.3)];
    let mut forces = vec![Vector3::zeros(); 2];
    let energy = force.calculate(&positions, None, &mut forces).unwrap();
    assert_relative_eq!(energy, -1.0, epsilon = 1e-12);
    assert_relative_eq!(forces[0], Vector3::zeros(), epsilon = 1e-10);
    assert_relative_eq!(forces[1], Vector3::zeros(), epsilon = 1e-10);
}

#[test]
fn beyond_cutoff() {
    let mut definition = ForceDefinition::default()
        .with_nonbonded_method(NonbondedMethod::CutoffNonPeriodic)
        .with_cutoff(1.0);
    for _ in 0..2 {
        definition.add_particle(Ellipsoid::new(1.0, 0.3).with_scales(1.0, 0.5, 0.2));
    }
    let force = GayBerneForce::new(definition).unwrap();
    let mut forces = vec![Vector3::zeros(); 2];
    let far = [Vector3::zeros(), Vector3::new(3.0, 1.0, 0.0)];
    assert_eq!(force.calculate(&far, None, &mut forces), Ok(0.0));
    assert!(forces.iter().all(|f| *f == Vector3::zeros()));

    // exactly at the cutoff
    let boundary = [Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0)];
    assert_eq!(force.energy(&boundary, None), Ok(0.0));
    let inside = [Vector3::zeros(), Vector3::new(0.99, 0.0, 0.0)];
    assert!(force.energy(&inside, None).unwrap() != 0.0);
}

#[test]
fn box_too_small() {
    let mut definition = ForceDefinition::default()
        .with_nonbonded_method(NonbondedMethod::CutoffPeriodic)
        .with_cutoff(1.0);
    definition.add_particle(Ellipsoid::new(1.0, 0.3));
    definition.add_particle(Ellipsoid::new(1.0, 0.3));
    let force = GayBerneForce::new(definition).unwrap();
    assert!(force.uses_periodic_boundary_conditions());
    let positions = [Vector3::zeros(), Vector3::new(0.5, 0.0, 0.0)];
    let mut forces = vec![Vector3::zeros(); 2];

    let small = PeriodicBox::cuboid(Vector3::new(3.0, 1.9, 3.0));
    assert_eq!(
        force.calculate(&positions, Some(&small), &mut forces),
        Err(Error::BoxTooSmall {
            size: 1.9,
            cutoff: 1.0
        })
    );
    assert!(force.contributions(&positions, Some(&small)).is_err());
    assert!(forces.iter().all(|f| *f == Vector3::zeros()));

    let large = PeriodicBox::cuboid(Vector3::repeat(2.0));
    assert!(force.calculate(&positions, Some(&large), &mut forces).is_ok());
}

#[test]
fn excluded_pair() {
    let (mut definition, mut positions) = ellipsoids(true);
    // overlapping ellipsoids
    positions[1] = Vector3::new(0.05, 0.02, 0.0);
    definition.add_exclusion(0, 1).unwrap();
    let force = GayBerneForce::new(definition).unwrap();
    let contributions = force.contributions(&positions, None).unwrap();
    assert!(contributions
        .iter()
        .all(|c| (c.particle1, c.particle2) != (0, 1)));
    let total: f64 = contributions.iter().map(|c| c.energy).sum();
    assert_relative_eq!(force.energy(&positions, None).unwrap(), total, epsilon = 1e-12);
    assert_eq!(force.pair_parameters(1, 0), None);
}

#[test]
fn isotropic_limit() {
    let mut definition = ForceDefinition::default()
        .with_nonbonded_method(NonbondedMethod::CutoffNonPeriodic)
        .with_cutoff(2.0);
    let parameters = [(1.0, 0.3), (0.5, 0.4), (2.0, 0.25), (0.8, 0.35), (1.2, 0.3)];
    for (epsilon, sigma) in parameters {
        definition.add_particle(Ellipsoid::new(epsilon, sigma));
    }
    let positions = [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.45, 0.1, -0.1),
        Vector3::new(-0.2, 0.4, 0.3),
        Vector3::new(0.3, -0.5, 0.2),
        Vector3::new(0.6, 0.5, 0.4),
    ];
    let force = GayBerneForce::new(definition).unwrap();
    let mut expected = 0.0;
    let mut forces = vec![Vector3::zeros(); positions.len()];
    for i in 0..positions.len() {
        for j in 0..i {
            let lj = LennardJones::from_combination_rule(
                gayberne::CombinationRule::LorentzBerthelot,
                (parameters[i].0, parameters[j].0),
                (parameters[i].1, parameters[j].1),
            );
            let dr = positions[i] - positions[j];
            expected += lj.isotropic_twobody_energy(dr.norm_squared());
            forces[i] -= lj.isotropic_twobody_force_vector(&dr);
            forces[j] += lj.isotropic_twobody_force_vector(&dr);
        }
    }
    // `calculate` adds to the existing forces
    let energy = force.calculate(&positions, None, &mut forces).unwrap();
    assert_relative_eq!(energy, expected, epsilon = 1e-12, max_relative = 1e-12);
    for f in forces {
        assert_relative_eq!(f, Vector3::zeros(), epsilon = 1e-9);
    }
}

#[test]
fn exception_parameters() {
    let (mut definition, positions) = ellipsoids(true);
    definition.add_exception(Exception::new(1, 0, 0.28, 1.7)).unwrap();
    definition.add_exception(Exception::new(3, 2, 0.5, 0.0)).unwrap();
    let force = GayBerneForce::new(definition).unwrap();
    let contributions = force.contributions(&positions, None).unwrap();

    let overridden: Vec<_> = contributions
        .iter()
        .filter(|c| (c.particle1, c.particle2) == (1, 0))
        .collect();
    assert_eq!(overridden.len(), 1);
    assert_eq!((overridden[0].sigma, overridden[0].epsilon), (0.28, 1.7));
    assert!(overridden[0].energy != 0.0);

    // ε = 0 exceptions are never evaluated, and neither are their default pairs
    assert!(contributions
        .iter()
        .all(|c| (c.particle1.min(c.particle2), c.particle1.max(c.particle2)) != (2, 3)));
    assert_eq!(force.pair_parameters(2, 3), Some((0.5, 0.0)));
}

#[test]
fn forces_match_energy() {
    for full_frames in [false, true] {
        let (definition, positions) = ellipsoids(full_frames);
        let force = GayBerneForce::new(definition).unwrap();
        assert_forces_match_energy(&force, &positions, None);
    }
}

#[test]
fn switched_forces_match_energy() {
    let (definition, positions) = ellipsoids(false);
    let definition = definition
        .with_nonbonded_method(NonbondedMethod::CutoffNonPeriodic)
        .with_cutoff(0.8)
        .with_switching_distance(Some(0.5));
    let force = GayBerneForce::new(definition).unwrap();
    let distance = (positions[1] - positions[0]).norm();
    assert!(distance > 0.5 && distance < 0.8);
    assert_forces_match_energy(&force, &positions, None);
}

#[test]
fn conservation_laws() {
    let (definition, positions) = ellipsoids(true);
    let force = GayBerneForce::new(definition).unwrap();
    let mut forces = vec![Vector3::zeros(); positions.len()];
    force.calculate(&positions, None, &mut forces).unwrap();
    let net_force: Vector3 = forces.iter().sum();
    let net_torque: Vector3 = positions.iter().zip(&forces).map(|(r, f)| r.cross(f)).sum();
    assert_relative_eq!(net_force, Vector3::zeros(), epsilon = 1e-10);
    assert_relative_eq!(net_torque, Vector3::zeros(), epsilon = 1e-10);
}

/// Two rods, each oriented by point particles that move along with it
fn molecules() -> (ForceDefinition, Vec<Vector3>) {
    let mut definition = ForceDefinition::default()
        .with_nonbonded_method(NonbondedMethod::CutoffPeriodic)
        .with_cutoff(1.5)
        .with_switching_distance(Some(0.6));
    let rod = Ellipsoid::new(1.0, 0.3)
        .with_radii(0.3, 0.15, 0.12)
        .with_scales(1.0, 0.7, 0.5);
    definition.add_particle(rod.clone().with_frame(Some(1), Some(2)));
    definition.add_particle(Ellipsoid::new(0.0, 0.3));
    definition.add_particle(Ellipsoid::new(0.0, 0.3));
    definition.add_particle(rod.with_frame(Some(4), None));
    definition.add_particle(Ellipsoid::new(0.0, 0.3));
    let positions = vec![
        Vector3::zeros(),
        Vector3::new(-0.2, 0.02, 0.01),
        Vector3::new(0.03, -0.2, 0.05),
        Vector3::new(0.55, 0.3, 0.1),
        Vector3::new(0.75, 0.35, 0.05),
    ];
    (definition, positions)
}

#[test]
fn periodic_images() {
    let (definition, positions) = molecules();
    let force = GayBerneForce::new(definition.clone()).unwrap();
    let open = GayBerneForce::new(
        definition.with_nonbonded_method(NonbondedMethod::CutoffNonPeriodic),
    )
    .unwrap();
    let triclinic = PeriodicBox::new(
        Vector3::new(3.5, 0.0, 0.0),
        Vector3::new(0.8, 3.4, 0.0),
        Vector3::new(-0.6, 0.5, 3.3),
    );
    let [a, b, c] = *triclinic.vectors();
    let mut wrapped = positions.clone();
    for position in &mut wrapped[3..] {
        *position += a - b * 2.0 + c;
    }

    let mut forces = vec![Vector3::zeros(); positions.len()];
    let mut open_forces = forces.clone();
    let energy = force.calculate(&wrapped, Some(&triclinic), &mut forces).unwrap();
    let open_energy = open.calculate(&positions, None, &mut open_forces).unwrap();
    assert!(open_energy != 0.0);
    assert_relative_eq!(energy, open_energy, epsilon = 1e-12, max_relative = 1e-10);
    for (f, open_f) in forces.iter().zip(&open_forces) {
        assert_relative_eq!(*f, *open_f, epsilon = 1e-10, max_relative = 1e-8);
    }
    // the unwrapped pair is far apart without periodic images
    assert_eq!(open.energy(&wrapped, None), Ok(0.0));
    assert_forces_match_energy(&force, &wrapped, Some(&triclinic));
}
