//! Example: automated cross-talk calibration of the fixed triple dot, then a
//! walk along virtual gates to the (1, 1, 1) charge state.
//!
//! Run with `RUST_LOG=debug` to see every raw sensitivity.

use autoqubit::{CrossTalkCalibrator, CrossTalkMatrix, PhysicsEngine, QdotError, TripleDotPhysics};

fn main() -> Result<(), QdotError> {
    env_logger::init();
    println!("--- autoqubit Example: Triple-Dot Virtual Gate Calibration ---");

    let physics = TripleDotPhysics::new();

    // --- Calibrate ---
    let matrix = CrossTalkCalibrator::new(&physics).discover_matrix()?;
    println!("\nDiscovered cross-talk matrix:\n{}", matrix);
    println!("Nominal reference matrix:\n{}", CrossTalkMatrix::reference_triple_dot());

    // --- Navigate with virtual gates ---
    // Start deep in (0,0,0) and step each virtual axis by +2 V until every
    // dot holds one electron.
    let gates = matrix.virtual_gates()?;
    let mut voltages = vec![-15.0, -15.0, -15.0];
    let target = [1, 1, 1];

    for step in 1..=100 {
        let state = physics.ground_state(&voltages)?;
        if state.occupations() == target {
            println!("Reached {} after {} steps at V = {:.2?}", state, step - 1, voltages);
            return Ok(());
        }
        // Push only the dots that are still empty.
        let virtual_step: Vec<f64> = state.occupations().iter().map(|&n| if n == 0 { 2.0 } else { 0.0 }).collect();
        for (v, dv) in voltages.iter_mut().zip(gates.to_physical(&virtual_step)?) {
            *v += dv;
        }
    }

    println!("Did not reach {:?} within 100 steps; final V = {:.2?}", target, voltages);
    Ok(())
}
