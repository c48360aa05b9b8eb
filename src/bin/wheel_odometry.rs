// Wheel odometry localization demo
//
// Runs the simulator to completion, prints the error summary, and saves a
// trajectory plot comparing ground truth, dead reckoning, and the EKF.

use gnuplot::{AxesCommon, Caption, Color, Figure, PointSize, PointSymbol};
use itertools::Itertools;
use wheel_odometry_sim::{SimulationConfig, Simulator, StepOutcome};

fn main() {
    println!("Wheel odometry localization start!");

    let config = SimulationConfig::default();
    let mut sim = Simulator::new(config).expect("default configuration is valid");

    loop {
        match sim.step() {
            StepOutcome::Stepped(snapshot) => {
                if snapshot.step % 50 == 0 {
                    if let Some(errors) = snapshot.last_errors {
                        println!(
                            "Time: {:.1}s, odometry error: {:.3} m, EKF error: {:.3} m",
                            snapshot.time, errors.baseline.position, errors.ekf.position
                        );
                    }
                }
            }
            StepOutcome::Finished => break,
        }
    }

    if let Some(last) = sim.error_history().last() {
        println!("\nFinal position error:");
        println!("  Dead reckoning: {:.3} m", last.baseline.position);
        println!("  EKF:            {:.3} m", last.ekf.position);
        println!("Final heading error:");
        println!("  Dead reckoning: {:.1} deg", last.baseline.heading_deg);
        println!("  EKF:            {:.1} deg", last.ekf.heading_deg);
    }

    let true_x: Vec<f64> = sim.true_trajectory().iter().map(|p| p.x).collect();
    let true_y: Vec<f64> = sim.true_trajectory().iter().map(|p| p.y).collect();
    let dr_x: Vec<f64> = sim.baseline_trajectory().iter().map(|p| p.x).collect();
    let dr_y: Vec<f64> = sim.baseline_trajectory().iter().map(|p| p.y).collect();
    let est_x: Vec<f64> = sim.ekf_trajectory().iter().map(|p| p.x).collect();
    let est_y: Vec<f64> = sim.ekf_trajectory().iter().map(|p| p.y).collect();
    let lm_x: Vec<f64> = sim.landmarks().iter().map(|lm| lm.x).collect();
    let lm_y: Vec<f64> = sim.landmarks().iter().map(|lm| lm.y).collect();

    let (x_min, x_max) = true_x
        .iter()
        .chain(&dr_x)
        .chain(&est_x)
        .cloned()
        .minmax()
        .into_option()
        .unwrap();
    let (y_min, y_max) = true_y
        .iter()
        .chain(&dr_y)
        .chain(&est_y)
        .cloned()
        .minmax()
        .into_option()
        .unwrap();

    let mut fig = Figure::new();
    fig.axes2d()
        .set_title("Wheel Odometry vs EKF", &[])
        .set_x_label("x [m]", &[])
        .set_y_label("y [m]", &[])
        .set_x_range(
            gnuplot::AutoOption::Fix(x_min - 1.0),
            gnuplot::AutoOption::Fix(x_max + 1.0),
        )
        .set_y_range(
            gnuplot::AutoOption::Fix(y_min - 1.0),
            gnuplot::AutoOption::Fix(y_max + 1.0),
        )
        .points(
            &lm_x,
            &lm_y,
            &[
                Caption("Landmarks"),
                Color("black"),
                PointSymbol('*'),
                PointSize(2.0),
            ],
        )
        .lines(&true_x, &true_y, &[Caption("True"), Color("blue")])
        .lines(&dr_x, &dr_y, &[Caption("Dead Reckoning"), Color("red")])
        .lines(&est_x, &est_y, &[Caption("EKF"), Color("green")]);

    match fig.save_to_svg("./img/wheel_odometry.svg", 640, 480) {
        Ok(_) => println!("Plot saved to ./img/wheel_odometry.svg"),
        Err(e) => eprintln!("Failed to save SVG: {:?}", e),
    }
}
