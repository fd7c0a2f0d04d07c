mod self_motion_sim;

use nalgebra::SVector;
use self_motion_sim::SelfMotionSim;
use srs_arm_kinematics::Kine7;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let kine = Kine7::default();

    // Target: the pose of a bent-elbow configuration, so every branch has a
    // healthy feasible arc to sweep.
    let q = SVector::<f64, 7>::from_column_slice(&[0.3, 0.4, -0.2, 1.1, 0.1, 0.5, -0.3]);
    let target = kine.forward(&q);

    match SelfMotionSim::new(kine, &target) {
        Ok(mut sim) => sim.run(),
        Err(e) => eprintln!("cannot start explorer: {}", e),
    }
}
