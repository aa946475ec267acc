//! Bootstrapped targets of the double DQN update.
use ndarray::{Array2, ArrayView1};

/// Index of the largest value.
///
/// Ties resolve to the first index achieving the maximum. NaN entries are
/// never selected unless every entry is NaN, in which case `0` is returned.
pub fn argmax(values: ArrayView1<f32>) -> usize {
    let mut best_ix = 0;
    let mut best = f32::NEG_INFINITY;
    let mut found = false;
    for (ix, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if !found || v > best {
            best_ix = ix;
            best = v;
            found = true;
        }
    }
    best_ix
}

/// `r + gamma * q_next * (1 - done)`.
///
/// Evaluated in `f64`. For terminal transitions the result is `reward`
/// whatever `next_q_value` is, NaN included.
pub fn expected_q_value(reward: f32, next_q_value: f32, is_done: bool, discount_factor: f64) -> f32 {
    if is_done {
        return reward;
    }
    (reward as f64 + discount_factor * next_q_value as f64) as f32
}

/// Double DQN targets for a batch.
///
/// The next action is selected with the online network,
/// `a* = argmax_a q_online(s_t+1, g, a)`, and evaluated with the target
/// network, `q_target(s_t+1, g, a*)`.
///
/// * `next_q_online` - online action values at the next states, `(n, n_actions)`.
/// * `next_q_target` - target action values at the next states, `(n, n_actions)`.
pub fn double_dqn_targets(
    reward: &[f32],
    is_done: &[i8],
    next_q_online: &Array2<f32>,
    next_q_target: &Array2<f32>,
    discount_factor: f64,
) -> Vec<f32> {
    debug_assert_eq!(reward.len(), is_done.len());
    debug_assert_eq!(next_q_online.dim(), next_q_target.dim());

    reward
        .iter()
        .zip(is_done.iter())
        .enumerate()
        .map(|(i, (&r, &d))| {
            let target_action = argmax(next_q_online.row(i));
            let next_q_value = next_q_target[[i, target_action]];
            expected_q_value(r, next_q_value, d != 0, discount_factor)
        })
        .collect()
}
