use crate::platform::{PermissionOracle, SensorProvider};
use log::info;

/// Stages of the OS permission handshake. Transitions only move forward;
/// once `Ready` the machine is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Unrequested,
    AwaitingWindowAccess,
    AwaitingContentAccess,
    Ready,
}

/// Polling state machine that walks both OS permissions to granted.
///
/// Each OS-level request is issued exactly once: the window-access request
/// in `start`, the content-access request on the tick that first observes
/// window access. Denial is indistinguishable from not-yet-granted, so the
/// machine polls forever when a grant never arrives; permission dialogs are
/// user-paced and there is no timeout to apply. Known limitation: a
/// permanently denied permission means indefinite silent polling.
pub struct PermissionNegotiator {
    state: PermissionState,
}

impl PermissionNegotiator {
    pub fn new() -> Self {
        Self {
            state: PermissionState::Unrequested,
        }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    /// Issues the window-access request and begins waiting. Called once
    /// before the poll loop starts; the underlying request is asynchronous
    /// and re-issuing it every tick would re-prompt the user.
    pub fn start<O>(&mut self, oracle: &O)
    where
        O: PermissionOracle + ?Sized,
    {
        if self.state == PermissionState::Unrequested {
            oracle.request_window_access();
            self.state = PermissionState::AwaitingWindowAccess;
        }
    }

    /// One poll of the permission oracle. Advances at most one stage per
    /// call and returns the state after the tick.
    pub fn tick<O, S>(&mut self, oracle: &O, sensor: &S) -> PermissionState
    where
        O: PermissionOracle + ?Sized,
        S: SensorProvider + ?Sized,
    {
        match self.state {
            // start() has not run; nothing to poll yet.
            PermissionState::Unrequested => {}
            PermissionState::AwaitingWindowAccess => {
                if oracle.has_window_access() {
                    info!("window access granted, requesting content access");
                    oracle.request_content_access();
                    self.state = PermissionState::AwaitingContentAccess;
                }
            }
            PermissionState::AwaitingContentAccess => {
                // No boolean oracle exists for content access; the only
                // observable signal is that a real window title resolves.
                let title_readable = sensor
                    .current_window()
                    .map(|w| !w.window_title.is_empty())
                    .unwrap_or(false);
                if title_readable {
                    info!("content access confirmed, sensor is ready");
                    self.state = PermissionState::Ready;
                }
            }
            PermissionState::Ready => {}
        }
        self.state
    }
}
