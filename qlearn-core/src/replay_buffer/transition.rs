//! A single environment transition.

/// One step's `(o_t, a_t, o_t+1, r_t)` tuple used as a training sample.
///
/// `next_state` is `None` when the episode terminated at this step. A
/// truncated step keeps its next observation so that the value target still
/// bootstraps from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<O, A> {
    state: O,
    action: A,
    next_state: Option<O>,
    reward: f32,
}

impl<O, A> Transition<O, A> {
    /// Constructs a transition.
    pub fn new(state: O, action: A, next_state: Option<O>, reward: f32) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
        }
    }

    /// Observation before the action.
    pub fn state(&self) -> &O {
        &self.state
    }

    /// The action taken.
    pub fn action(&self) -> &A {
        &self.action
    }

    /// Observation after the action, `None` on termination.
    pub fn next_state(&self) -> Option<&O> {
        self.next_state.as_ref()
    }

    /// Reward received for the action.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// Returns `true` if the episode terminated at this transition.
    pub fn is_terminal(&self) -> bool {
        self.next_state.is_none()
    }
}
