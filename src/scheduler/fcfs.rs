use std::collections::VecDeque;

use super::{DeviceState, JobId, Scheduler, SimCtx, jobs_string, print_jobs};
use crate::core::sink::DebugSink;

/// First-come-first-served. Fully non-preemptive.
pub struct FcfsScheduler {
    queue: VecDeque<JobId>,
    sink: Box<dyn DebugSink>,
}

impl Scheduler for FcfsScheduler {
    fn init(sink: Box<dyn DebugSink>) -> Self {
        Self {
            queue: VecDeque::new(),
            sink,
        }
    }

    fn add(&mut self, ctx: &mut SimCtx, job: JobId, _device: DeviceState) -> bool {
        self.queue.push_back(job);
        ctx.queue_changed(1);
        false
    }

    fn remove(&mut self, ctx: &mut SimCtx) -> Option<JobId> {
        let job = self.queue.pop_front()?;
        ctx.queue_changed(-1);
        Some(job)
    }

    fn reschedule(&self, _ctx: &SimCtx, _running: JobId) -> bool {
        false
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::sink::LogSink, scheduler::test_util::capture};

    fn fcfs() -> FcfsScheduler {
        FcfsScheduler::init(Box::new(LogSink))
    }

    #[test]
    fn scenario_in_arrival_order() {
        let mut ctx = SimCtx::new();
        let mut sched = fcfs();
        let j1 = ctx.create_job(1, 4);
        let j2 = ctx.create_job(2, 1);
        let j3 = ctx.create_job(3, 9);

        assert!(!sched.add(&mut ctx, j1, DeviceState::Idle));
        assert!(!sched.add(&mut ctx, j2, DeviceState::Idle));
        assert!(!sched.add(&mut ctx, j3, DeviceState::Idle));

        assert_eq!(sched.remove(&mut ctx), Some(j1));
        assert_eq!(sched.remove(&mut ctx), Some(j2));
        assert_eq!(sched.remove(&mut ctx), Some(j3));
        assert_eq!(sched.remove(&mut ctx), None);
    }

    #[test]
    fn ordering_ignores_burst() {
        let mut ctx = SimCtx::new();
        let mut sched = fcfs();
        let jobs: Vec<_> = [8, 1, 5, 1, 0, 3]
            .into_iter()
            .enumerate()
            .map(|(i, burst)| ctx.create_job(i as u64, burst))
            .collect();

        for &job in &jobs {
            sched.add(&mut ctx, job, DeviceState::Idle);
        }
        let drained: Vec<_> = std::iter::from_fn(|| sched.remove(&mut ctx)).collect();
        assert_eq!(drained, jobs);
    }

    #[test]
    fn never_preempts() {
        let mut ctx = SimCtx::new();
        let mut sched = fcfs();
        let running = ctx.create_job(0, 100);

        for (i, device) in [
            DeviceState::Idle,
            DeviceState::Busy { time_left: 0 },
            DeviceState::Busy { time_left: 1 },
            DeviceState::Busy { time_left: 1_000 },
        ]
        .into_iter()
        .enumerate()
        {
            let job = ctx.create_job(i as u64 + 1, 1);
            assert!(!sched.add(&mut ctx, job, device));
            assert!(!sched.reschedule(&ctx, running));
        }
    }

    #[test]
    fn queue_length_is_conserved() {
        let mut ctx = SimCtx::new();
        let mut sched = fcfs();
        assert_eq!(sched.remove(&mut ctx), None);
        assert_eq!(ctx.stats.current(), 0);
        assert_eq!(ctx.stats.changes(), 0);

        let a = ctx.create_job(1, 2);
        let b = ctx.create_job(2, 2);
        sched.add(&mut ctx, a, DeviceState::Idle);
        sched.add(&mut ctx, b, DeviceState::Idle);
        sched.remove(&mut ctx);
        assert_eq!(ctx.stats.current(), 1);
        assert_eq!(sched.len(), 1);

        sched.remove(&mut ctx);
        sched.remove(&mut ctx);
        assert_eq!(ctx.stats.current(), 0);
        assert_eq!(ctx.stats.changes(), 4);
        assert!(sched.is_empty());
    }

    #[test]
    fn debug_dump() {
        let mut ctx = SimCtx::new();
        let (sink, lines) = capture();
        let mut sched = FcfsScheduler::init(sink);

        sched.print_queue(&ctx);
        assert_eq!(sched.queue_string(&ctx), "[]");

        let a = ctx.create_job(1, 5);
        let b = ctx.create_job(2, 3);
        sched.add(&mut ctx, a, DeviceState::Idle);
        sched.add(&mut ctx, b, DeviceState::Idle);
        sched.print_queue(&ctx);

        assert_eq!(
            *lines.borrow(),
            vec![
                "| CPU queue: empty",
                "| CPU queue:",
                "|    J1(burst=5)",
                "|    J2(burst=3)",
            ]
        );
        assert_eq!(sched.queue_string(&ctx), "[ J1(burst=5) J2(burst=3)]");
    }
}
