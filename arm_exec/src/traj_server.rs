//! # Trajectory Server Module
//!
//! This module abstracts over the networking side of the arm executable. The
//! server accepts connections from the client in the drawing executable,
//! allowing trajectory goals to be received and their results to be sent
//! back once execution has finished.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
    traj::{JointTrajectory, TrajectoryResult},
};
use log::warn;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An abstraction over the networking part of the arm executable.
///
/// The server accepts one goal at a time. The client's request stays pending
/// while the goal executes, so the result can be sent as the reply of the
/// same request/reply round.
pub struct TrajServer {
    /// REP socket which accepts trajectory goals from the client
    goal_socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur in the [`TrajServer`]
#[derive(thiserror::Error, Debug)]
pub enum TrajServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the result to the client: {0}")]
    SendError(zmq::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajServer {
    /// Create a new instance of the trajectory server.
    ///
    /// This function will not wait for a connection from the client before
    /// returning.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, TrajServerError> {
        // Create the socket options
        let goal_socket_options = SocketOptions {
            bind: true,
            block_on_first_connect: false,
            recv_timeout: 200,
            send_timeout: 10,
            ..Default::default()
        };

        // Create the socket
        let goal_socket = MonitoredSocket::new(
            ctx,
            zmq::REP,
            goal_socket_options,
            &params.traj_endpoint,
        )
        .map_err(TrajServerError::SocketError)?;

        // Create self
        Ok(Self { goal_socket })
    }

    /// Retrieve a trajectory goal from the client.
    ///
    /// The user MUST call [`TrajServer::send_result`] once the goal has been
    /// executed in order to notify the client.
    ///
    /// `None` is returned if no valid goal was received within the socket's
    /// receive timeout.
    pub fn get_goal(&mut self) -> Option<JointTrajectory> {
        // Read from the socket
        let msg = self.goal_socket.recv_msg(0);

        match msg {
            Ok(m) => match serde_json::from_str(m.as_str().unwrap_or("")) {
                Ok(goal) => Some(goal),
                Err(e) => {
                    warn!("Could not deserialize the trajectory goal: {}", e);

                    // Complete the request/reply round so the socket is ready
                    // for the next goal
                    let reject = TrajectoryResult::failure(
                        comms_if::traj::error_code::INVALID_GOAL,
                        format!("Could not parse the trajectory goal: {}", e),
                    );
                    if let Err(e) = self.send_result(&reject) {
                        warn!("Could not reject the malformed goal: {}", e);
                    }

                    None
                }
            },
            Err(_) => None,
        }
    }

    /// Send the result of the executed goal to the client.
    pub fn send_result(&mut self, result: &TrajectoryResult) -> Result<(), TrajServerError> {
        // Serialize result
        let result_str = serde_json::to_string(result)
            .expect("Result serialization failed. This should not happen");

        // Send result
        match self.goal_socket.send(&result_str, 0) {
            Ok(_) => Ok(()),
            Err(e) => Err(TrajServerError::SendError(e)),
        }
    }
}
