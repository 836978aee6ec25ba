//! Example: charge-sensor images of a randomized double dot at several
//! integration times.

use autoqubit::{QdotError, RandomizedPhysics, SensorNoiseModel};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), QdotError> {
    env_logger::init();
    println!("--- autoqubit Example: Simulated Charge-Sensor Scans ---");

    let mut rng = StdRng::seed_from_u64(2024);
    let mut physics = RandomizedPhysics::new(&mut rng);
    physics.randomize_device(&mut rng);
    println!("Device: {}", physics.parameters());

    let noise_model = SensorNoiseModel::default();
    for integration_time in [0.0, 0.5, 1.0] {
        let noise = noise_model.noise_level(integration_time);
        let image = physics.simulate_sensor_scan(10.0, 10.0, noise, &mut rng)?;
        println!("\nIntegration time {:.1} (noise sigma {:.3}):", integration_time, noise);
        // Coarse rendering: '#' marks pixels above half a transition step.
        for row in image.rows() {
            let line: String = row.iter().map(|&p| if p > 0.25 { '#' } else { '.' }).collect();
            println!("  {}", line);
        }
    }
    Ok(())
}
