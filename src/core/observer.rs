use super::state::{JobState, SimCtx};

#[derive(Debug)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn observe(&mut self, ctx: &SimCtx, scheduler_len: usize) {
        self.step += 1;

        if let Some(job_id) = ctx.running {
            let job = ctx.job(job_id);
            debug_assert_eq!(
                job.state,
                JobState::Running,
                "CPU job {} must be Running",
                job.label
            );
        }

        for job in ctx.jobs.values() {
            debug_assert_ne!(
                job.state,
                JobState::Finished,
                "Finished job {} still present in job table",
                job.label
            );
            if job.state == JobState::Running {
                debug_assert_eq!(
                    ctx.running,
                    Some(job.id),
                    "Job {} marked Running but not on the CPU",
                    job.label
                );
            }
        }

        let queued = ctx.queued_count();
        debug_assert_eq!(
            queued, scheduler_len,
            "Job table has {queued} queued jobs, scheduler holds {scheduler_len}"
        );
        debug_assert_eq!(
            queued as u64,
            ctx.stats.current(),
            "Queue-length statistic out of step with queued jobs"
        );
    }

    pub fn steps(&self) -> u64 {
        self.step
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}
