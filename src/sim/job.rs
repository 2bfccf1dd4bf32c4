use crate::core::state::Ticks;

pub type JobLabel = u64;

/// A workload entry: one job and when it shows up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub id: JobLabel,
    pub arrival_time: Ticks,
    pub burst: Ticks,
}

#[derive(Debug, Clone)]
pub struct JobInstance {
    pub job: JobSpec,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

impl JobInstance {
    pub fn response_time(&self) -> Option<Ticks> {
        Some(self.start_time? - self.job.arrival_time)
    }

    pub fn turnaround_time(&self) -> Option<Ticks> {
        Some(self.completion_time? - self.job.arrival_time)
    }

    // Time spent in the queue rather than on the CPU
    pub fn waiting_time(&self) -> Option<Ticks> {
        Some(self.turnaround_time()? - self.job.burst)
    }
}
