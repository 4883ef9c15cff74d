//! # Arm Control Executable
//!
//! This executable is the arm side of the drawing system. It accepts joint
//! trajectory goals from the drawing executable, servos the arm's three
//! joints through each goal with the configured control law, and reports the
//! result of every execution back to the client.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Trajectory executor, drives the joint controllers through a goal.
mod executor;

/// Joint feedback control laws.
mod joint_ctrl;

/// Parameters for the arm executable.
mod params;

/// Trajectory server abstraction.
mod traj_server;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Result};
use log::{info, warn};

// Internal
use comms_if::net::NetParams;
use executor::Executor;
use joint_ctrl::JointCtrl;
use params::ArmExecParams;
use traj_server::TrajServer;
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("arm_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Crustcrawler Arm Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;
    let exec_params: ArmExecParams =
        util::params::load("arm_exec.toml").wrap_err("Could not load exec params")?;

    info!("Parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut joint_ctrl = JointCtrl::default();
    joint_ctrl
        .init("joint_ctrl.toml", &session)
        .wrap_err("Failed to initialise JointCtrl")?;

    info!(
        "JointCtrl init complete, active control law: {:?}",
        joint_ctrl.params.law
    );

    let mut executor = Executor::new(joint_ctrl, exec_params);

    // ---- SERVER INITIALISATION ----

    let zmq_ctx = comms_if::net::zmq::Context::new();
    let mut server =
        TrajServer::new(&zmq_ctx, &net_params).wrap_err("Failed to initialise server")?;

    info!("Server initialised");

    // ---- MAIN LOOP ----

    info!("Initialisation complete, waiting for trajectory goals");

    loop {
        // Get the next goal from the client, if there is one
        let goal = match server.get_goal() {
            Some(g) => g,
            None => continue,
        };

        info!(
            "Received a {} point trajectory goal, executing...",
            goal.points.len()
        );

        // Execute the goal. Validation failures come back as results too, so
        // the client always learns what happened.
        let result = executor.execute(&goal);

        if result.is_success() {
            info!("Goal complete, arm at {:?} rad", executor.positions_rad());
        } else {
            warn!(
                "Goal failed: '{}' ({})",
                result.error_string, result.error_code
            );
        }

        // Send the result to the client
        match server.send_result(&result) {
            Ok(_) => (),
            Err(e) => warn!("Couldn't send the result to the client: {}", e),
        }
    }
}
