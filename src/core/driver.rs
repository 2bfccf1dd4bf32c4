use super::{
    event::{PreemptReason, SimEvent},
    observer::Observer,
    sink::{DebugSink, LogSink},
    state::{DeviceState, JobId, SimCtx, Ticks},
};
use crate::scheduler::Scheduler;

#[derive(Debug, Clone)]
pub struct SimConfig {
    // Ticks between clock interrupts; 0 disables them
    pub clock_interval: Ticks,
    // Stop a run that has not drained by this time
    pub max_ticks: Option<Ticks>,
    // Dump the scheduler queue after every tick
    pub trace_queue: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            clock_interval: 2,
            max_ticks: None,
            trace_queue: false,
        }
    }
}

/// Single-CPU core: owns the job table and the scheduler, and turns
/// arrivals, idle CPUs and clock interrupts into scheduler calls.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    config: SimConfig,
    observer: Observer,
    // Events raised by arrive() since the last tick
    pending: Vec<SimEvent>,
    preemptions: u64,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(config: SimConfig) -> Self {
        Self::with_sink(config, Box::new(LogSink))
    }

    pub fn with_sink(config: SimConfig, sink: Box<dyn DebugSink>) -> Self {
        Self {
            ctx: SimCtx::new(),
            scheduler: S::init(sink),
            config,
            observer: Observer::new(),
            pending: Vec::new(),
            preemptions: 0,
        }
    }

    pub fn arrive(&mut self, job: JobId) {
        let device = self.ctx.device_state();
        self.ctx.mark_queued(job);
        self.pending.push(SimEvent::JobArrived {
            job,
            burst: self.ctx.job(job).burst,
        });

        let preempt = self.scheduler.add(&mut self.ctx, job, device);
        if preempt && self.ctx.running.is_some() {
            self.preempt(PreemptReason::Arrival);
        }
    }

    pub fn tick(&mut self) -> Vec<SimEvent> {
        let mut events = std::mem::take(&mut self.pending);

        if self.ctx.cpu_is_idle() {
            self.dispatch(&mut events);
        }

        self.ctx.advance_time(1);

        if let Some(job_id) = self.ctx.running {
            let job = self.ctx.job_mut(job_id);
            job.burst = job.burst.saturating_sub(1);

            if job.burst == 0 {
                self.ctx.clear_cpu();
                let job = self.ctx.mark_finished(job_id);
                log::trace!("t={} {} completed", self.ctx.now, job);
                events.push(SimEvent::JobCompleted { job: job_id });
            } else if self.clock_interrupt() && self.scheduler.reschedule(&self.ctx, job_id) {
                self.preempt(PreemptReason::ClockInterrupt);
                events.append(&mut self.pending);
            }
        }

        if self.config.trace_queue {
            self.scheduler.print_queue(&self.ctx);
        }
        self.observer.observe(&self.ctx, self.scheduler.len());
        events
    }

    fn clock_interrupt(&self) -> bool {
        self.config.clock_interval > 0 && self.ctx.now % self.config.clock_interval == 0
    }

    fn dispatch(&mut self, events: &mut Vec<SimEvent>) {
        match self.scheduler.remove(&mut self.ctx) {
            Some(job) => {
                let first_run = self.ctx.set_running(job);
                log::trace!("t={} dispatch {}", self.ctx.now, self.ctx.job(job));
                events.push(SimEvent::JobDispatched { job, first_run });
            }
            None => events.push(SimEvent::CpuIdle),
        }
    }

    // Put the running job back in the queue; the CPU refills on the next tick
    fn preempt(&mut self, reason: PreemptReason) {
        let Some(job) = self.ctx.clear_cpu() else {
            return;
        };
        let time_left = self.ctx.job(job).burst;
        log::trace!(
            "t={} preempt {} ({reason:?})",
            self.ctx.now,
            self.ctx.job(job)
        );

        self.ctx.mark_queued(job);
        // A re-queued job never preempts anything; the CPU is empty
        let _ = self.scheduler.add(&mut self.ctx, job, DeviceState::Idle);
        self.preemptions += 1;
        self.pending.push(SimEvent::JobPreempted {
            job,
            reason,
            time_left,
        });
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn preemptions(&self) -> u64 {
        self.preemptions
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
