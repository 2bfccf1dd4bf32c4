use super::{DeviceState, JobId, Scheduler, SimCtx, jobs_string, print_jobs};
use crate::core::sink::DebugSink;

/// Shortest-remaining-time-first.
///
/// Two simplifications relative to textbook SRTF, both intentional:
/// `add` compares the newcomer against the jobs already waiting rather than
/// against the running job, and `reschedule` asks for a new pick on every
/// clock interrupt while anything is waiting. Callers that want a strict
/// comparison with the running job must make it themselves.
pub struct SrtfScheduler {
    // Insertion order matters: ties go to the earliest arrival
    queue: Vec<JobId>,
    sink: Box<dyn DebugSink>,
}

impl SrtfScheduler {
    // Index of the first job holding the smallest burst
    fn shortest(&self, ctx: &SimCtx) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (idx, &job) in self.queue.iter().enumerate() {
            let burst = ctx.job(job).burst;
            match best {
                Some((_, min)) if burst >= min => {}
                _ => best = Some((idx, burst)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

impl Scheduler for SrtfScheduler {
    fn init(sink: Box<dyn DebugSink>) -> Self {
        Self {
            queue: Vec::new(),
            sink,
        }
    }

    fn add(&mut self, ctx: &mut SimCtx, job: JobId, _device: DeviceState) -> bool {
        let min_burst = self.queue.iter().map(|&queued| ctx.job(queued).burst).min();

        self.queue.push(job);
        ctx.queue_changed(1);

        match min_burst {
            Some(min) => ctx.job(job).burst < min,
            None => false,
        }
    }

    fn remove(&mut self, ctx: &mut SimCtx) -> Option<JobId> {
        let idx = self.shortest(ctx)?;
        let job = self.queue.remove(idx);
        ctx.queue_changed(-1);
        Some(job)
    }

    fn reschedule(&self, _ctx: &SimCtx, _running: JobId) -> bool {
        !self.queue.is_empty()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn print_queue(&mut self, ctx: &SimCtx) {
        print_jobs(self.sink.as_mut(), ctx, self.queue.iter());
    }

    fn queue_string(&self, ctx: &SimCtx) -> String {
        jobs_string(ctx, self.queue.iter())
    }
}
