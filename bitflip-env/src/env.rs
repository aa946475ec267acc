use super::BitFlipEnvConfig;
use anyhow::Result;
use bitflip_core::{error::BitFlipError, Bits, Env, GoalObs, Info, Step};
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Empty struct.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BitFlipInfo;

impl Info for BitFlipInfo {}

/// Bit-flipping environment.
///
/// The environment has no episode before the first call of [`Env::reset`];
/// stepping it then fails with [`BitFlipError::InvalidState`].
pub struct BitFlipEnv {
    num_bits: usize,

    // Current state
    state: Bits,

    // Goal of the current episode
    goal: Bits,

    // The number of actions taken in the current episode
    num_steps: usize,

    // No step is allowed until the next reset
    done: bool,

    rng: StdRng,
}

impl BitFlipEnv {
    /// Length of the state and the goal.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// The number of actions taken in the current episode.
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Returns `true` if the current episode has ended or none was started.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Current state.
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    /// Goal of the current episode.
    pub fn goal(&self) -> &[u8] {
        &self.goal
    }

    /// Maximum number of actions in an episode.
    pub fn max_episode_steps(&self) -> usize {
        self.num_bits + 2
    }

    fn random_bits(&mut self) -> Bits {
        (0..self.num_bits).map(|_| self.rng.gen_range(0..2u8)).collect()
    }

    fn check_bits(&self, bits: &[u8]) -> Result<(), BitFlipError> {
        if bits.len() != self.num_bits || bits.iter().any(|&b| b > 1) {
            return Err(BitFlipError::InvalidConfig(format!(
                "expected {} bits of 0 or 1, got {:?}",
                self.num_bits, bits
            )));
        }
        Ok(())
    }

    /// Starts a new episode from the given state and goal instead of random ones.
    pub fn reset_with(&mut self, state: Bits, goal: Bits) -> Result<GoalObs> {
        self.check_bits(&state)?;
        self.check_bits(&goal)?;
        self.state = state;
        self.goal = goal;
        self.num_steps = 0;
        self.done = false;
        Ok(GoalObs::new(self.state.clone(), self.goal.clone()))
    }
}

impl Env for BitFlipEnv {
    type Config = BitFlipEnvConfig;
    type Info = BitFlipInfo;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            num_bits: config.num_bits,
            state: vec![0; config.num_bits],
            goal: vec![0; config.num_bits],
            num_steps: 0,
            done: true,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn reset(&mut self) -> Result<GoalObs> {
        let state = self.random_bits();
        let goal = self.random_bits();
        trace!("reset: state = {:?}, goal = {:?}", state, goal);
        self.reset_with(state, goal)
    }

    fn step(&mut self, act: usize) -> Result<Step<Self>> {
        if self.done {
            return Err(BitFlipError::InvalidState.into());
        }
        if act >= self.num_bits {
            return Err(BitFlipError::InvalidAction {
                action: act,
                num_actions: self.num_bits,
            }
            .into());
        }

        self.state[act] ^= 1;
        self.num_steps += 1;

        let is_terminated = self.state == self.goal;
        let is_truncated = !is_terminated && self.num_steps > self.num_bits + 1;
        let reward = if is_terminated { 0.0 } else { -1.0 };
        self.done = is_terminated || is_truncated;

        Ok(Step::new(
            act,
            self.state.clone(),
            reward,
            is_terminated,
            is_truncated,
            BitFlipInfo,
        ))
    }

    fn n_actions(&self) -> usize {
        self.num_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(num_bits: usize, seed: u64) -> BitFlipEnv {
        BitFlipEnv::build(&BitFlipEnvConfig::default().num_bits(num_bits), seed).unwrap()
    }

    fn error_of<T>(r: Result<T>) -> BitFlipError {
        match r {
            Ok(_) => panic!("expected an error"),
            Err(e) => e.downcast::<BitFlipError>().unwrap(),
        }
    }

    #[test]
    fn test_build_rejects_zero_bits() {
        let config = BitFlipEnvConfig::default().num_bits(0);
        assert!(BitFlipEnv::build(&config, 0).is_err());
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut env = env(4, 0);
        assert_eq!(error_of(env.step(0)), BitFlipError::InvalidState);
    }

    #[test]
    fn test_reset_draws_bits() {
        let mut env = env(11, 42);
        for _ in 0..100 {
            let obs = env.reset().unwrap();
            assert_eq!(obs.state.len(), 11);
            assert_eq!(obs.goal.len(), 11);
            assert!(obs.state.iter().chain(obs.goal.iter()).all(|&b| b <= 1));
            assert_eq!(env.num_steps(), 0);
            assert!(!env.is_done());
        }
    }

    #[test]
    fn test_reset_state_and_goal_vary() {
        let mut env = env(8, 7);
        let obs: Vec<_> = (0..50).map(|_| env.reset().unwrap()).collect();
        assert!(obs.iter().any(|o| o.state != o.goal));
        assert!(obs.iter().any(|o| o.state != obs[0].state));
        assert!(obs.iter().any(|o| o.goal != obs[0].goal));
    }

    #[test]
    fn test_same_seed_same_episodes() {
        let mut env1 = env(6, 3);
        let mut env2 = env(6, 3);
        for _ in 0..10 {
            assert_eq!(env1.reset().unwrap(), env2.reset().unwrap());
        }
    }

    #[test]
    fn test_step_flips_exactly_one_bit() {
        let mut env = env(5, 1);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let mut obs = env.reset().unwrap();
            while !env.is_done() {
                let act = rng.gen_range(0..5);
                let step = env.step(act).unwrap();
                for i in 0..5 {
                    if i == act {
                        assert_eq!(step.next_state[i], 1 - obs.state[i]);
                    } else {
                        assert_eq!(step.next_state[i], obs.state[i]);
                    }
                }
                obs.state = step.next_state;
            }
        }
    }

    #[test]
    fn test_reward_is_zero_iff_goal_reached() {
        let mut env = env(4, 2);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let obs = env.reset().unwrap();
            while !env.is_done() {
                let step = env.step(rng.gen_range(0..4)).unwrap();
                let solved = step.next_state == obs.goal;
                assert_eq!(step.reward == 0.0, solved);
                assert_eq!(step.reward == -1.0, !solved);
                assert_eq!(step.is_terminated, solved);
            }
        }
    }

    #[test]
    fn test_episode_ends_within_cap() {
        let mut env = env(6, 4);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            env.reset().unwrap();
            let mut n = 0;
            loop {
                let step = env.step(rng.gen_range(0..6)).unwrap();
                n += 1;
                if step.is_done() {
                    break;
                }
            }
            assert!(n <= env.max_episode_steps());
            assert_eq!(n, env.num_steps());
        }
    }

    #[test]
    fn test_unreachable_goal_truncates_at_cap() {
        let mut env = env(4, 0);
        env.reset_with(vec![0, 0, 0, 0], vec![1, 1, 1, 1]).unwrap();

        // Flipping the same bit back and forth never reaches the goal
        for k in 1..=6 {
            let step = env.step(0).unwrap();
            assert_eq!(step.reward, -1.0);
            assert!(!step.is_terminated);
            assert_eq!(step.is_truncated, k == 6);
        }
        assert!(env.is_done());
        assert_eq!(error_of(env.step(0)), BitFlipError::InvalidState);
    }

    #[test]
    fn test_reaching_goal_terminates() {
        let mut env = env(4, 0);
        env.reset_with(vec![0, 0, 0, 0], vec![0, 0, 0, 1]).unwrap();
        let step = env.step(3).unwrap();
        assert_eq!(step.reward, 0.0);
        assert!(step.is_terminated);
        assert!(!step.is_truncated);
        assert_eq!(step.next_state, vec![0, 0, 0, 1]);
        assert_eq!(error_of(env.step(0)), BitFlipError::InvalidState);
    }

    #[test]
    fn test_goal_on_last_allowed_step_is_success() {
        let mut env = env(2, 0);
        env.reset_with(vec![0, 0], vec![1, 1]).unwrap();
        for act in [0, 0, 0] {
            assert!(!env.step(act).unwrap().is_done());
        }
        let step = env.step(1).unwrap();
        assert!(step.is_terminated);
        assert!(!step.is_truncated);
    }

    #[test]
    fn test_invalid_action() {
        let mut env = env(3, 0);
        env.reset().unwrap();
        assert_eq!(
            error_of(env.step(3)),
            BitFlipError::InvalidAction {
                action: 3,
                num_actions: 3
            }
        );
        // The failed action does not count as a step
        assert_eq!(env.num_steps(), 0);
    }

    #[test]
    fn test_returned_state_is_a_copy() {
        let mut env = env(3, 0);
        let mut obs = env.reset_with(vec![0, 1, 0], vec![1, 1, 1]).unwrap();
        obs.state[0] = 1;
        let mut step = env.step(2).unwrap();
        assert_eq!(step.next_state, vec![0, 1, 1]);
        step.next_state[1] = 0;
        assert_eq!(env.state(), &[0, 1, 1]);
        assert_eq!(env.goal(), &[1, 1, 1]);
    }

    #[test]
    fn test_reset_with_rejects_bad_bits() {
        let mut env = env(3, 0);
        assert!(env.reset_with(vec![0, 1], vec![0, 0, 0]).is_err());
        assert!(env.reset_with(vec![0, 1, 2], vec![0, 0, 0]).is_err());
    }
}
