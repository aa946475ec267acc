//! Experience sampling.
use crate::{
    error::BitFlipError, replay_buffer::Transition, Env, ExperienceBufferBase, GoalObs, Policy,
    Step,
};
use anyhow::Result;

/// Drives an environment with a policy and pushes the resulting transitions
/// into a replay buffer.
pub struct Sampler<E: Env> {
    env: E,

    /// Observation before the next action, `None` between episodes.
    prev_obs: Option<GoalObs>,
}

impl<E: Env> Sampler<E> {
    /// Creates a new sampler.
    pub fn new(env: E) -> Self {
        Self {
            env,
            prev_obs: None,
        }
    }

    /// Starts a new episode and returns its first observation.
    pub fn reset(&mut self) -> Result<GoalObs> {
        let obs = self.env.reset()?;
        self.prev_obs = Some(obs.clone());
        Ok(obs)
    }

    /// Samples an action, applies it to the environment and pushes the
    /// transition to `buffer`.
    ///
    /// Fails with [`BitFlipError::InvalidState`] if no episode is in progress,
    /// i.e. before [`Sampler::reset`] or after the last step of an episode.
    pub fn sample_and_push<P, R>(&mut self, policy: &mut P, buffer: &mut R) -> Result<Step<E>>
    where
        P: Policy,
        R: ExperienceBufferBase<Item = Transition>,
    {
        let obs = self.prev_obs.take().ok_or(BitFlipError::InvalidState)?;

        let act = policy.sample(&obs)?;
        let step = self.env.step(act)?;

        let GoalObs { state, goal } = obs;
        if !step.is_done() {
            self.prev_obs = Some(GoalObs::new(step.next_state.clone(), goal.clone()));
        }
        buffer.push(Transition::new(
            state,
            act,
            step.reward,
            step.next_state.clone(),
            step.is_done(),
            goal,
        ))?;

        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig},
        ReplayBufferBase,
    };

    /// One-bit environment whose episodes are truncated after two steps.
    struct TwoStepEnv {
        n_steps: usize,
    }

    impl Env for TwoStepEnv {
        type Config = ();
        type Info = ();

        fn build(_config: &Self::Config, _seed: u64) -> Result<Self> {
            Ok(Self { n_steps: 0 })
        }

        fn reset(&mut self) -> Result<GoalObs> {
            self.n_steps = 0;
            Ok(GoalObs::new(vec![0], vec![1]))
        }

        fn step(&mut self, act: usize) -> Result<Step<Self>> {
            self.n_steps += 1;
            let next_state = vec![(self.n_steps % 2) as u8];
            Ok(Step::new(act, next_state, -1.0, false, self.n_steps == 2, ()))
        }

        fn n_actions(&self) -> usize {
            1
        }
    }

    struct FirstAction;

    impl Policy for FirstAction {
        fn sample(&mut self, _obs: &GoalObs) -> Result<usize> {
            Ok(0)
        }
    }

    fn error_of<T>(r: Result<T>) -> BitFlipError {
        match r {
            Ok(_) => panic!("expected an error"),
            Err(e) => e.downcast::<BitFlipError>().unwrap(),
        }
    }

    #[test]
    fn test_sample_before_reset_fails() {
        let mut sampler = Sampler::new(TwoStepEnv::build(&(), 0).unwrap());
        let mut buffer = SimpleReplayBuffer::build(&SimpleReplayBufferConfig::default()).unwrap();

        let err = error_of(sampler.sample_and_push(&mut FirstAction, &mut buffer));
        assert_eq!(err, BitFlipError::InvalidState);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_episode_must_be_reset_after_its_end() {
        let mut sampler = Sampler::new(TwoStepEnv::build(&(), 0).unwrap());
        let mut buffer = SimpleReplayBuffer::build(&SimpleReplayBufferConfig::default()).unwrap();

        sampler.reset().unwrap();
        let step = sampler.sample_and_push(&mut FirstAction, &mut buffer).unwrap();
        assert!(!step.is_done());
        let step = sampler.sample_and_push(&mut FirstAction, &mut buffer).unwrap();
        assert!(step.is_done());

        let err = error_of(sampler.sample_and_push(&mut FirstAction, &mut buffer));
        assert_eq!(err, BitFlipError::InvalidState);

        let transitions: Vec<_> = buffer.iter().collect();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].next_state, transitions[1].state);
        assert!(!transitions[0].is_done);
        assert!(transitions[1].is_done);
        assert!(transitions.iter().all(|tr| tr.goal == vec![1]));

        sampler.reset().unwrap();
        assert!(sampler.sample_and_push(&mut FirstAction, &mut buffer).is_ok());
        assert_eq!(buffer.len(), 3);
    }
}
