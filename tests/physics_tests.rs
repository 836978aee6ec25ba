// tests/physics_tests.rs

use autoqubit::{
    ChargeConfiguration, Coupling, DeviceParameters, PhysicsEngine, QdotError, RandomizedPhysics, ScanConfig,
    TripleDotPhysics, simulate_sensor_scan,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Helper: the zero-coupling double dot used by several scenarios.
fn decoupled_double_dot() -> Result<RandomizedPhysics, QdotError> {
    let params = DeviceParameters::new(vec![1.0, 1.0], vec![Coupling::new(0, 1, 0.0)], vec![0.05, 0.05])?;
    RandomizedPhysics::with_parameters(params)
}

// Helper: asserts that `ground` has the lowest energy among all enumerated configurations.
fn assert_is_energy_minimum(physics: &RandomizedPhysics, voltages: &[f64], ground: &ChargeConfiguration) -> Result<(), QdotError> {
    let device = physics.device();
    let ground_energy = device.energy(ground, voltages)?;
    for config in device.states() {
        let energy = device.energy(config, voltages)?;
        assert!(
            ground_energy <= energy,
            "Ground state {} (E={}) beaten by {} (E={}) at {:?}",
            ground, ground_energy, config, energy, voltages
        );
    }
    Ok(())
}

#[test]
fn test_decoupled_double_dot_at_origin() -> Result<(), QdotError> {
    let physics = decoupled_double_dot()?;
    assert_eq!(physics.ground_state(&[0.0, 0.0])?.occupations(), &[0, 0]);
    Ok(())
}

#[test]
fn test_triple_dot_scenarios() -> Result<(), QdotError> {
    let physics = TripleDotPhysics::new();
    assert_eq!(physics.ground_state(&[0.0, 0.0, 0.0])?.occupations(), &[0, 0, 0]);
    // Dot 0 saturates at the enumerated maximum however hard it is driven.
    assert_eq!(physics.ground_state(&[100.0, 0.0, 0.0])?.occupation(0), Some(2));
    assert_eq!(physics.ground_state(&[1.0e6, 0.0, 0.0])?.occupation(0), Some(2));
    Ok(())
}

#[test]
fn test_ground_state_is_idempotent() -> Result<(), QdotError> {
    let mut rng = StdRng::seed_from_u64(2024);
    let physics = RandomizedPhysics::new(&mut rng);
    for _ in 0..100 {
        let v = [rng.random_range(-40.0..40.0), rng.random_range(-40.0..40.0)];
        let first = physics.ground_state(&v)?;
        let second = physics.ground_state(&v)?;
        assert_eq!(first, second);
    }
    Ok(())
}

#[test]
fn test_ground_state_is_exhaustive_minimum() -> Result<(), QdotError> {
    let mut rng = StdRng::seed_from_u64(99);
    let mut physics = RandomizedPhysics::new(&mut rng);
    for _ in 0..20 {
        physics.randomize_device(&mut rng);
        for _ in 0..25 {
            let v = [rng.random_range(-60.0..60.0), rng.random_range(-60.0..60.0)];
            let ground = physics.ground_state(&v)?;
            assert_is_energy_minimum(&physics, &v, &ground)?;
        }
    }
    Ok(())
}

#[test]
fn test_triple_dot_is_exhaustive_minimum() -> Result<(), QdotError> {
    let physics = TripleDotPhysics::new();
    let device = physics.device();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..50 {
        let v: Vec<f64> = (0..3).map(|_| rng.random_range(-40.0..40.0)).collect();
        let ground = physics.ground_state(&v)?;
        let ground_energy = device.energy(&ground, &v)?;
        for config in device.states() {
            assert!(ground_energy <= device.energy(config, &v)?);
        }
    }
    Ok(())
}

#[test]
fn test_wrong_voltage_count_is_rejected() {
    let physics = TripleDotPhysics::new();
    assert_eq!(
        physics.ground_state(&[0.0, 0.0]),
        Err(QdotError::DimensionMismatch { expected: 3, found: 2 })
    );
}

#[test]
fn test_noise_free_scan_is_bit_identical() -> Result<(), QdotError> {
    let mut rng = StdRng::seed_from_u64(1);
    let physics = RandomizedPhysics::new(&mut rng);
    let a = physics.simulate_sensor_scan(8.0, 8.0, 0.0, &mut rng)?;
    let b = physics.simulate_sensor_scan(8.0, 8.0, 0.0, &mut rng)?;
    assert_eq!(a.pixels(), b.pixels());
    assert_eq!(a.resolution(), 16);
    Ok(())
}

#[test]
fn test_noisy_scans_differ_but_reproduce_under_seed() -> Result<(), QdotError> {
    let physics = decoupled_double_dot()?;
    let mut rng = StdRng::seed_from_u64(17);
    let a = physics.simulate_sensor_scan(10.0, 10.0, 0.25, &mut rng)?;
    let b = physics.simulate_sensor_scan(10.0, 10.0, 0.25, &mut rng)?;
    assert_ne!(a.pixels(), b.pixels());

    let c = physics.simulate_sensor_scan(10.0, 10.0, 0.25, &mut StdRng::seed_from_u64(17))?;
    assert_eq!(a.pixels(), c.pixels());
    Ok(())
}

#[test]
fn test_scan_shows_transition_lines() -> Result<(), QdotError> {
    // Centre on the (0,0)-(1,1) corner of the decoupled device: both loading
    // lines cross the window, so the image is not dark.
    let physics = decoupled_double_dot()?;
    let image = physics.simulate_sensor_scan(10.0, 10.0, 0.0, &mut StdRng::seed_from_u64(0))?;
    assert!(image.pixels().iter().any(|&p| p > 0.0));
    assert!(image.pixels().iter().all(|&p| p >= 0.0));
    Ok(())
}

#[test]
fn test_custom_scan_geometry() -> Result<(), QdotError> {
    let physics = decoupled_double_dot()?;
    let config = ScanConfig::new(20.0, 32);
    let image = simulate_sensor_scan(&physics, 0.0, 0.0, 0.1, &config, &mut StdRng::seed_from_u64(4))?;
    assert_eq!(image.resolution(), 32);
    assert_eq!(image.rows().count(), 32);
    assert!(image.get(31, 31).is_some());
    assert!(image.get(32, 0).is_none());
    assert_eq!(image.clone().into_pixels().len(), 32 * 32);

    let bad = ScanConfig::new(10.0, 0);
    assert!(matches!(
        simulate_sensor_scan(&physics, 0.0, 0.0, 0.1, &bad, &mut StdRng::seed_from_u64(4)),
        Err(QdotError::InvalidArgument { .. })
    ));
    Ok(())
}
