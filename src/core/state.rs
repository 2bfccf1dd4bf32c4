use slotmap::{SlotMap, new_key_type};
use std::fmt;

use super::stats::QueueStats;

pub type Ticks = u64;
new_key_type! {
    pub struct JobId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Queued,
    Running,
    Finished,
}

/// What the CPU is doing when a job is admitted.
///
/// `Idle` is its own variant so that a running job with zero ticks left is
/// never mistaken for an idle device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Idle,
    Busy { time_left: Ticks },
}

#[derive(Debug)]
pub struct Job {
    pub id: JobId,
    // Workload-facing id, used for display
    pub label: u64,
    pub state: JobState,
    // Remaining service time. Only the core mutates this, and only while
    // the job is Running.
    pub burst: Ticks,
    pub start_time: Option<Ticks>,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}(burst={})", self.label, self.burst)
    }
}

#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub jobs: SlotMap<JobId, Job>,
    pub running: Option<JobId>,
    pub stats: QueueStats,
}

impl SimCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            jobs: SlotMap::with_key(),
            running: None,
            stats: QueueStats::new(),
        }
    }

    pub fn create_job(&mut self, label: u64, burst: Ticks) -> JobId {
        self.jobs.insert_with_key(|id| Job {
            id,
            label,
            state: JobState::Pending,
            burst,
            start_time: None,
        })
    }

    pub fn job(&self, job_id: JobId) -> &Job {
        self.jobs.get(job_id).expect("Unknown or finished job")
    }

    pub fn job_mut(&mut self, job_id: JobId) -> &mut Job {
        self.jobs.get_mut(job_id).expect("Unknown or finished job")
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn device_state(&self) -> DeviceState {
        match self.running {
            Some(job_id) => DeviceState::Busy {
                time_left: self.job(job_id).burst,
            },
            None => DeviceState::Idle,
        }
    }

    // Schedulers report every admit (+1) and every successful dispatch (-1)
    pub fn queue_changed(&mut self, delta: i64) {
        self.stats.queue_changed(delta, self.now);
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.running.is_none()
    }

    pub fn queued_count(&self) -> usize {
        self.jobs
            .values()
            .filter(|job| job.state == JobState::Queued)
            .count()
    }

    pub fn mark_queued(&mut self, job_id: JobId) {
        let job = self.job_mut(job_id);
        debug_assert!(
            job.state == JobState::Pending || job.state == JobState::Running,
            "Job {} queued twice",
            job.label
        );
        job.state = JobState::Queued;
    }

    // Return true if this is the job's first time on the CPU
    pub fn set_running(&mut self, job_id: JobId) -> bool {
        debug_assert!(self.running.is_none(), "CPU already running a job");

        let now = self.now;
        let job = self.job_mut(job_id);
        debug_assert_eq!(
            job.state,
            JobState::Queued,
            "Job {} dispatched without being queued",
            job.label
        );
        job.state = JobState::Running;
        let first_run = job.start_time.is_none();
        if first_run {
            job.start_time = Some(now);
        }
        self.running = Some(job_id);
        first_run
    }

    // Take the running job off the CPU, leaving its state for the caller to set
    pub fn clear_cpu(&mut self) -> Option<JobId> {
        self.running.take()
    }

    pub fn mark_finished(&mut self, job_id: JobId) -> Job {
        debug_assert_ne!(
            self.running,
            Some(job_id),
            "Finishing job must be off the CPU"
        );
        let mut job = self.jobs.remove(job_id).expect("Unknown or finished job");
        debug_assert_eq!(
            job.state,
            JobState::Running,
            "Job {} must have been running before marked finished",
            job.label
        );
        job.state = JobState::Finished;
        job
    }
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}
