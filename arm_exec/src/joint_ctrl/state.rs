//! Implementations for the JointCtrl state structures

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{ControlLaw, JointCtrlError, Params};
use comms_if::traj::NUM_JOINTS;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Feedback controller for a single joint.
///
/// The controller is stateful across steps (integral accumulator and last
/// error) and is reset only by explicit reinitialisation. It is not
/// reentrant-safe, callers must serialise access.
#[derive(Debug, Clone)]
pub struct JointController {
    params: Params,

    /// Integral accumulation variable.
    ///
    /// The shipped laws read this each step but do not update it, so it
    /// stays at the seed value. The field is real state so an integrating
    /// law variant only has to mutate it in `step`.
    integral: f64,

    /// Position error of the last step.
    ///
    /// Units: radians
    error_rad: f64,
}

/// Joint control module state: one controller per joint.
#[derive(Debug, Default)]
pub struct JointCtrl {
    pub(crate) params: Params,

    controllers: Vec<JointController>,
}

/// Input data to Joint Control, one element per joint.
#[derive(Clone, Copy, Debug)]
pub struct InputData {
    /// Desired set-point of each joint.
    ///
    /// Units: radians
    pub desired_rad: [f64; NUM_JOINTS],

    /// Current angle of each joint.
    ///
    /// Units: radians
    pub current_rad: [f64; NUM_JOINTS],

    /// Current angular velocity of each joint.
    ///
    /// Units: radians/second
    pub velocity_rads: [f64; NUM_JOINTS],

    /// Time since the last step.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Output efforts from JointCtrl that the actuators must execute.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct OutputData {
    /// Effort demand for each joint.
    pub effort: [f64; NUM_JOINTS],
}

/// Status report for JointCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Position error of each joint at the last step.
    ///
    /// Units: radians
    pub error_rad: [f64; NUM_JOINTS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointController {
    /// Create a new controller with the given parameters.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            integral: params.integral_seed,
            error_rad: 0.0,
        }
    }

    /// Perform one control step, returning the effort for the joint.
    ///
    /// `dt_s` is informational only: the shipped laws do not scale the
    /// integral or derivative terms by it. The derivative term damps the
    /// measured velocity towards zero rather than differentiating the error.
    pub fn step(
        &mut self,
        desired_rad: f64,
        current_rad: f64,
        velocity_rads: f64,
        _dt_s: f64,
    ) -> f64 {
        let error = desired_rad - current_rad;
        let p = &self.params;

        let effort = match p.law {
            ControlLaw::Proportional => p.p * error,

            ControlLaw::ProportionalDerivative => {
                p.p * error + p.d * (0.0 - velocity_rads)
            }

            ControlLaw::Pid => {
                p.p * error + p.i * self.integral * error + p.d * (0.0 - velocity_rads)
            }

            ControlLaw::NonlinearPid => {
                p.p * error
                    + p.i * self.integral * error
                    + p.d * (0.0 - velocity_rads)
                    - p.c * current_rad.sin()
            }
        };

        self.error_rad = error;

        effort
    }

    /// Reset the controller state back to its initial values.
    pub fn reset(&mut self) {
        self.integral = self.params.integral_seed;
        self.error_rad = 0.0;
    }

    /// The position error recorded by the last step.
    pub fn error_rad(&self) -> f64 {
        self.error_rad
    }
}

impl State for JointCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = JointCtrlError;

    /// Initialise the JointCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        // Load the parameters
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };

        self.controllers = (0..NUM_JOINTS)
            .map(|_| JointController::new(self.params))
            .collect();

        Ok(())
    }

    /// Perform one control tick for all joints.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if self.controllers.len() != NUM_JOINTS {
            return Err(JointCtrlError::NotInitialised);
        }

        let mut output = OutputData {
            effort: [0.0; NUM_JOINTS],
        };
        let mut report = StatusReport::default();

        for i in 0..NUM_JOINTS {
            let (desired, current, velocity) = (
                input_data.desired_rad[i],
                input_data.current_rad[i],
                input_data.velocity_rads[i],
            );

            if !desired.is_finite() || !current.is_finite() || !velocity.is_finite() {
                return Err(JointCtrlError::NonFiniteInput {
                    index: i,
                    desired_rad: desired,
                    current_rad: current,
                    velocity_rads: velocity,
                });
            }

            output.effort[i] =
                self.controllers[i].step(desired, current, velocity, input_data.dt_s);
            report.error_rad[i] = self.controllers[i].error_rad();
        }

        Ok((output, report))
    }
}

impl JointCtrl {
    /// Create a JointCtrl directly from parameters, without a parameter file.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            controllers: (0..NUM_JOINTS)
                .map(|_| JointController::new(params))
                .collect(),
        }
    }

    /// Reset every joint controller, for example at the start of a new
    /// trajectory goal.
    pub fn reset(&mut self) {
        for controller in self.controllers.iter_mut() {
            controller.reset();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params_with_law(law: ControlLaw) -> Params {
        Params {
            law,
            ..Params::default()
        }
    }

    #[test]
    fn test_nonlinear_pid_zero_error_zero_effort() {
        // With everything at zero the only candidate term is the gravity
        // compensation, and sin(0) = 0
        let mut ctrl = JointController::new(params_with_law(ControlLaw::NonlinearPid));

        let effort = ctrl.step(0.0, 0.0, 0.0, 0.01);

        assert_eq!(effort, 0.0);
    }

    #[test]
    fn test_nonlinear_pid_unit_error() {
        // u = 15*1.0 + 7*1*1.0 + 0 - 5*sin(0) = 22.0
        let mut ctrl = JointController::new(params_with_law(ControlLaw::NonlinearPid));

        let effort = ctrl.step(1.0, 0.0, 0.0, 0.01);

        assert!((effort - 22.0).abs() < 1e-12);
    }

    #[test]
    fn test_proportional_law() {
        let mut ctrl = JointController::new(params_with_law(ControlLaw::Proportional));

        // u = 15 * (0.5 - 0.1), velocity ignored
        let effort = ctrl.step(0.5, 0.1, 2.0, 0.01);

        assert!((effort - 15.0 * 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_proportional_derivative_law() {
        let mut ctrl =
            JointController::new(params_with_law(ControlLaw::ProportionalDerivative));

        // u = 15 * 0.4 + 5 * (0 - 2.0)
        let effort = ctrl.step(0.5, 0.1, 2.0, 0.01);

        assert!((effort - (15.0 * 0.4 - 10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_integral_accumulator_constant_across_steps() {
        // The shipped laws read the accumulator but never update it, so
        // repeated steps with the same inputs give identical efforts
        let mut ctrl = JointController::new(params_with_law(ControlLaw::Pid));

        let first = ctrl.step(1.0, 0.0, 0.0, 0.01);
        let second = ctrl.step(1.0, 0.0, 0.0, 0.01);

        assert_eq!(first, second);
        // u = 15*1 + 7*1*1 + 0
        assert!((first - 22.0).abs() < 1e-12);
    }

    #[test]
    fn test_dt_does_not_scale_terms() {
        let mut a = JointController::new(params_with_law(ControlLaw::NonlinearPid));
        let mut b = JointController::new(params_with_law(ControlLaw::NonlinearPid));

        assert_eq!(a.step(1.0, 0.2, 0.5, 0.001), b.step(1.0, 0.2, 0.5, 1.0));
    }

    #[test]
    fn test_reset_restores_seed_and_error() {
        let mut ctrl = JointController::new(params_with_law(ControlLaw::NonlinearPid));

        ctrl.step(1.0, 0.0, 0.0, 0.01);
        assert!(ctrl.error_rad() != 0.0);

        ctrl.reset();
        assert_eq!(ctrl.error_rad(), 0.0);
    }

    #[test]
    fn test_joint_ctrl_proc_runs_all_joints() {
        let mut joint_ctrl = JointCtrl::with_params(Params::default());

        let input = InputData {
            desired_rad: [1.0, 0.0, 0.5],
            current_rad: [0.0, 0.0, 0.5],
            velocity_rads: [0.0, 0.0, 0.0],
            dt_s: 0.01,
        };

        let (output, report) = joint_ctrl.proc(&input).unwrap();

        assert!((output.effort[0] - 22.0).abs() < 1e-12);
        assert_eq!(output.effort[1], 0.0);
        // Zero error on joint 3, only the gravity term remains
        assert!((output.effort[2] - (-5.0 * 0.5f64.sin())).abs() < 1e-12);
        assert!((report.error_rad[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_joint_ctrl_rejects_non_finite_input() {
        let mut joint_ctrl = JointCtrl::with_params(Params::default());

        let input = InputData {
            desired_rad: [f64::NAN, 0.0, 0.0],
            current_rad: [0.0; 3],
            velocity_rads: [0.0; 3],
            dt_s: 0.01,
        };

        assert!(matches!(
            joint_ctrl.proc(&input),
            Err(JointCtrlError::NonFiniteInput { index: 0, .. })
        ));
    }
}
