use crate::error::FrameFault;

/// What the gate did with one frame's result.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Committed,
    /// Frame rejected; the previously held pose (if any) stays.
    Held(FrameFault),
}

#[derive(Debug, Clone, PartialEq)]
enum GateState<T> {
    NoPose,
    HasPose(T),
}

/// Keeps the last good pose so a failed frame re-emits it unchanged instead of
/// dropping the avatar.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseHoldGate<T> {
    state: GateState<T>,
}

impl<T> Default for PoseHoldGate<T> {
    fn default() -> Self {
        Self {
            state: GateState::NoPose,
        }
    }
}

impl<T> PoseHoldGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a successful frame, or keep the current state on a fault.
    pub fn offer(&mut self, result: Result<T, FrameFault>) -> GateDecision {
        match result {
            Ok(pose) => {
                self.state = GateState::HasPose(pose);
                GateDecision::Committed
            }
            Err(fault) => GateDecision::Held(fault),
        }
    }

    /// The pose to emit this frame, `None` until the first commit.
    pub fn held(&self) -> Option<&T> {
        match &self.state {
            GateState::NoPose => None,
            GateState::HasPose(pose) => Some(pose),
        }
    }

    pub fn has_pose(&self) -> bool {
        matches!(self.state, GateState::HasPose(_))
    }

    /// Drop the held pose, back to the initial state.
    pub fn clear(&mut self) {
        self.state = GateState::NoPose;
    }
}
