//! Main drawing executable entry point.
//!
//! # Architecture
//!
//! The executable takes a circle drawing description from the command line
//! and performs the calculations and commands needed to draw that circle
//! with the Crustcrawler arm:
//!
//!     - Validate the request against the arm's limits
//!     - Generate the circular path in the board's plane
//!     - Solve the inverse kinematics of every path point and assemble the
//!       time-stamped joint trajectory
//!     - Submit the trajectory to the arm server and wait for the result

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use draw_lib::{
    arm_ik::{self, IkSolver},
    path_gen,
    request::{self, DrawRequest},
    traj_client::{TrajClient, TrajClientError},
    traj_gen::{self, TrajBuilder},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{error, info, warn};
use nalgebra::Vector3;
use structopt::StructOpt;

// Internal
use comms_if::net::NetParams;
use util::{
    logger::{logger_init, LevelFilter},
    maths,
    session::Session,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Circle drawing description.
#[derive(Debug, StructOpt)]
#[structopt(name = "draw_exec", about = "Crustcrawler circle drawer")]
struct Opt {
    /// Origin of the board in centimeters
    #[structopt(
        short,
        long,
        required = true,
        number_of_values = 3,
        allow_hyphen_values = true,
        value_names = &["x", "y", "z"]
    )]
    origin: Vec<f64>,

    /// The radius of the circle to draw in centimeters
    #[structopt(short, long, default_value = "5.0")]
    radius: f64,

    /// Number of points to use when drawing the circle
    #[structopt(short, long, default_value = "4")]
    num_points: usize,

    /// Orientation of the board about the y axis in degrees
    #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
    orientation: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Parse the command line arguments
    let opt = Opt::from_args();

    // Initialise session
    let session = Session::new("draw_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Crustcrawler Circle Drawing Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- REQUEST VALIDATION ----

    let req = DrawRequest {
        origin_cm: Vector3::new(opt.origin[0], opt.origin[1], opt.origin[2]),
        radius_cm: opt.radius,
        num_points: opt.num_points,
        orientation_deg: opt.orientation,
    };

    // Ensure that the request is within the arm's limits before doing any
    // planning work
    req.validate().wrap_err("Invalid drawing request")?;

    info!(
        "Drawing a {:.1} cm radius circle with {} points at {:?} cm, board at {:.1} deg",
        req.radius_cm, req.num_points, req.origin_cm, req.orientation_deg
    );

    // ---- LOAD PARAMETERS ----

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;
    let ik_params: arm_ik::Params =
        util::params::load("arm_ik.toml").wrap_err("Could not load arm IK params")?;
    let traj_params: traj_gen::Params = util::params::load("traj_gen.toml")
        .wrap_err("Could not load trajectory generation params")?;

    info!("Exec parameters loaded");

    // ---- PLANNING ----

    // Generate the circle path
    let path = path_gen::generate(
        &req.origin_cm,
        req.radius_cm,
        req.num_points,
        req.orientation_deg.to_radians(),
        &request::orientation_axis(),
    );

    info!(
        "Generated path: {} points, {:.2} cm long",
        path.len(),
        maths::path_length(&path)
    );

    session.save("path.json", path.clone());

    // Build the arm movement
    let builder = TrajBuilder::new(traj_params, IkSolver::new(ik_params));
    let trajectory = builder
        .build(&path)
        .wrap_err("Failed to build the joint trajectory")?;

    info!(
        "Built trajectory: {} points over {:.2} s",
        trajectory.points.len(),
        trajectory.duration_s()
    );

    session.save("trajectory.json", trajectory.clone());

    // ---- EXECUTION ----

    // The client blocks until the arm server responds
    info!("Waiting for the arm server...");

    let zmq_ctx = comms_if::net::zmq::Context::new();
    let mut traj_client = TrajClient::new(&zmq_ctx, &net_params)
        .wrap_err("Failed to initialise the TrajClient")?;

    info!("Arm server connected, submitting trajectory");

    // Send the goal and wait for the arm to perform the movement
    let result = match traj_client.execute_trajectory(&trajectory) {
        Ok(r) => r,
        Err(TrajClientError::Interrupted) => {
            warn!("Program aborted during circle drawing");
            session.exit();
            return Err(eyre!("Program aborted during circle drawing"));
        }
        Err(e) => {
            session.exit();
            return Err(e).wrap_err("Could not execute the trajectory");
        }
    };

    // ---- SHUTDOWN ----

    session.exit();

    // Finally report the status of the arm, did it work or not?
    if result.is_success() {
        info!("Crustcrawler done!");
        Ok(())
    } else {
        error!(
            "Crustcrawler failed due to: '{}' ({})",
            result.error_string, result.error_code
        );
        std::process::exit(result.error_code.abs());
    }
}
