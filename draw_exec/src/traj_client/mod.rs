//! # Trajectory Client
//!
//! This module provides networking abstractions to connect to the arm server.
//! One request/reply round executes one drawing: the client submits a
//! trajectory goal, the server executes it, and the reply carries the result.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
    traj::{JointTrajectory, TrajectoryResult},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct TrajClient {
    goal_socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum TrajClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("The client is not connected to the server")]
    NotConnected,

    #[error("Could not send the trajectory goal to the server: {0}")]
    SendError(zmq::Error),

    #[error("Could not receive the result from the server: {0}")]
    RecvError(zmq::Error),

    #[error("Could not serialize the trajectory goal: {0}")]
    SerializationError(serde_json::Error),

    #[error("Could not deserialize the result from the server: {0}")]
    DeserializeError(serde_json::Error),

    #[error("Execution was interrupted while waiting for the result")]
    Interrupted,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajClient {
    /// Create a new instance of the trajectory client.
    ///
    /// Blocks until the arm server is reachable or the connect timeout
    /// elapses.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, TrajClientError> {
        // Create the socket options.
        //
        // The receive timeout is unbounded since waiting for the result of a
        // drawing takes as long as the drawing takes, cancellation is the
        // caller's responsibility.
        let goal_socket_options = SocketOptions {
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_timeout: 1000,
            linger: 1,
            recv_timeout: -1,
            send_timeout: 1000,
            req_correlate: true,
            req_relaxed: true,
            ..Default::default()
        };

        // Create the socket
        let goal_socket = MonitoredSocket::new(
            ctx,
            zmq::REQ,
            goal_socket_options,
            &params.traj_endpoint,
        )
        .map_err(TrajClientError::SocketError)?;

        // Create self
        Ok(Self { goal_socket })
    }

    /// Submit a trajectory goal to the server and block until it has been
    /// executed.
    ///
    /// On success the server's result is returned, whatever its error code.
    /// An interrupted wait maps to [`TrajClientError::Interrupted`] so the
    /// caller can abort cleanly.
    pub fn execute_trajectory(
        &mut self,
        trajectory: &JointTrajectory,
    ) -> Result<TrajectoryResult, TrajClientError> {
        // If not connected return now
        if !self.goal_socket.connected() {
            return Err(TrajClientError::NotConnected);
        }

        // Serialize the goal
        let goal_str = serde_json::to_string(trajectory)
            .map_err(TrajClientError::SerializationError)?;

        // Send the goal to the server
        self.goal_socket
            .send(&goal_str, 0)
            .map_err(TrajClientError::SendError)?;

        // Wait for the arm to perform the movement
        let msg = self.goal_socket.recv_msg(0);

        match msg {
            Ok(m) => serde_json::from_str(m.as_str().unwrap_or(""))
                .map_err(TrajClientError::DeserializeError),
            Err(zmq::Error::EINTR) => Err(TrajClientError::Interrupted),
            Err(e) => Err(TrajClientError::RecvError(e)),
        }
    }
}
