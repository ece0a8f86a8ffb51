use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gayberne::ellipsoid::Oriented;
use gayberne::twobody::{GayBerne, IsotropicTwobodyEnergy, LennardJones};
use gayberne::{
    Ellipsoid, ForceDefinition, Frame, GayBerneForce, NonbondedMethod, PeriodicBox, Vector3,
};

/// Single-pair benchmarks
fn bench_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("pair");

    let sigma: f64 = 0.3;
    let epsilon: f64 = 1.0;
    let dr = Vector3::new(0.6, 0.2, 0.1);

    let lj = LennardJones::new(epsilon, sigma);
    group.bench_function("LennardJones", |b| {
        b.iter(|| lj.isotropic_twobody_energy(black_box(dr.norm_squared())))
    });

    let ellipsoid = Ellipsoid::new(epsilon, sigma)
        .with_frame(Some(1), Some(2))
        .with_radii(0.3, 0.2, 0.1)
        .with_scales(1.0, 0.8, 0.6);
    let positions = [
        Vector3::zeros(),
        Vector3::new(-0.7, 0.4, 0.3),
        Vector3::new(0.2, -0.9, 0.5),
    ];
    let frame = Frame::new(0, &ellipsoid, &positions).unwrap();
    let oriented = |index| Oriented {
        index,
        ellipsoid: &ellipsoid,
        frame: &frame,
        shape_factor: ellipsoid.shape_factor(),
    };
    let (first, second) = (oriented(0), oriented(1));
    let gay_berne = GayBerne::new(epsilon, sigma);
    group.bench_function("GayBerne_energy", |b| {
        b.iter(|| gay_berne.energy(&first, &second, black_box(&dr)))
    });
    group.bench_function("GayBerne_gradient", |b| {
        b.iter(|| gay_berne.energy_and_gradient(&first, &second, black_box(&dr)))
    });

    group.finish();
}

/// Rods on a cubic lattice, each oriented by a point particle next to it
fn lattice(n: usize, spacing: f64) -> (ForceDefinition, Vec<Vector3>) {
    let mut definition = ForceDefinition::default()
        .with_nonbonded_method(NonbondedMethod::CutoffPeriodic)
        .with_cutoff(1.2)
        .with_switching_distance(Some(1.0));
    let mut positions = Vec::new();
    for i in 0..n * n * n {
        let site = Vector3::new((i % n) as f64, ((i / n) % n) as f64, (i / (n * n)) as f64);
        let rod = definition.add_particle(
            Ellipsoid::new(1.0, 0.3)
                .with_radii(0.4, 0.15, 0.15)
                .with_scales(1.0, 0.6, 0.6),
        );
        let tip = definition.add_particle(Ellipsoid::new(0.0, 0.3));
        definition.particles[rod].x_particle = Some(tip);
        definition.add_exclusion(rod, tip).unwrap();
        positions.push(site * spacing);
        positions.push(site * spacing + Vector3::new(-0.1, 0.02 * (i % 3) as f64, 0.01));
    }
    (definition, positions)
}

/// Full evaluations of energies and forces
fn bench_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("force");
    let spacing = 0.8;
    for n in [4, 6] {
        let (definition, positions) = lattice(n, spacing);
        let force = GayBerneForce::new(definition).unwrap();
        let cube = PeriodicBox::cuboid(Vector3::repeat(n as f64 * spacing));
        let mut forces = vec![Vector3::zeros(); positions.len()];
        group.bench_with_input(
            BenchmarkId::new("calculate", positions.len()),
            &positions,
            |b, positions| b.iter(|| force.calculate(positions, Some(&cube), &mut forces)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pair, bench_force);
criterion_main!(benches);
