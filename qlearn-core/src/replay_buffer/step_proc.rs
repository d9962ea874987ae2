//! Converts [`Step`]s into [`Transition`]s.
use super::Transition;
use crate::{Env, Step, StepProcessor};
use serde::{Deserialize, Serialize};
use std::{default::Default, marker::PhantomData};

/// Configuration of [`TransitionProcessor`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TransitionProcessorConfig {}

/// Produces 1-step transitions for a non-vectorized environment.
///
/// It keeps the previous observation so that the observation `o_t` can be
/// paired with `(a_t, o_t+1, r_t)` in the next [`Step`].
pub struct TransitionProcessor<E: Env> {
    prev_obs: Option<E::Obs>,
    phantom: PhantomData<E>,
}

impl<E: Env> StepProcessor<E> for TransitionProcessor<E> {
    type Config = TransitionProcessorConfig;
    type Output = Transition<E::Obs, E::Act>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs);
    }

    /// Panics if [`StepProcessor::reset`] has not been called for the episode.
    fn process(&mut self, step: Step<E>) -> Self::Output {
        let state = self
            .prev_obs
            .replace(step.obs.clone())
            .expect("prev_obs is not set. Forgot to call reset()?");
        let next_state = match step.is_terminated {
            true => None,
            false => Some(step.obs),
        };

        Transition::new(state, step.act, next_state, step.reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{CounterAct, CounterEnv, CounterObs};

    fn step(t: usize, is_terminated: bool, is_truncated: bool) -> Step<CounterEnv> {
        Step::new(
            CounterObs(t as f32),
            CounterAct(t % 2),
            1.0,
            is_terminated,
            is_truncated,
            (),
        )
    }

    fn processor() -> TransitionProcessor<CounterEnv> {
        let mut p = TransitionProcessor::build(&TransitionProcessorConfig::default());
        p.reset(CounterObs(0.0));
        p
    }

    #[test]
    fn test_terminated_step_has_no_next_state() {
        let tr = processor().process(step(1, true, false));
        assert!(tr.is_terminal());
        assert_eq!(tr.next_state(), None);
        assert_eq!(tr.state(), &CounterObs(0.0));
    }

    #[test]
    fn test_truncated_step_keeps_next_state() {
        let tr = processor().process(step(1, false, true));
        assert!(!tr.is_terminal());
        assert_eq!(tr.next_state(), Some(&CounterObs(1.0)));
    }

    #[test]
    fn test_state_is_previous_observation() {
        let mut p = processor();
        let trs = (1..=3)
            .map(|t| p.process(step(t, t == 3, false)))
            .collect::<Vec<_>>();

        for (t, tr) in trs.iter().enumerate() {
            assert_eq!(tr.state(), &CounterObs(t as f32));
            assert_eq!(tr.action(), &CounterAct((t + 1) % 2));
            assert_eq!(tr.reward(), 1.0);
        }
        assert_eq!(trs[0].next_state(), Some(&CounterObs(1.0)));
        assert_eq!(trs[1].next_state(), Some(&CounterObs(2.0)));
        assert_eq!(trs[2].next_state(), None);

        // a new episode pairs with its own initial observation
        p.reset(CounterObs(10.0));
        let tr = p.process(step(11, false, false));
        assert_eq!(tr.state(), &CounterObs(10.0));
    }
}
