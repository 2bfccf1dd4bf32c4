use rand::prelude::*;

use super::job::JobSpec;
use crate::core::state::Ticks;

/// Each tick a job arrives with probability `p_arrival`; it is short with
/// probability `p_short`, long otherwise.
pub fn bernoulli_jobs(
    ticks: Ticks,
    p_arrival: f64,
    p_short: f64,
    short_ticks: Ticks,
    long_ticks: Ticks,
    seed: u64,
) -> Vec<JobSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            jobs.push(JobSpec {
                id: jobs.len() as u64,
                arrival_time: t,
                burst,
            });
        }
    }

    jobs
}
