pub mod fcfs;
pub mod srtf;

use std::{error::Error, fmt, str::FromStr};

use crate::core::{
    sink::DebugSink,
    state::{DeviceState, JobId, SimCtx},
};
pub use fcfs::FcfsScheduler;
pub use srtf::SrtfScheduler;

/// A CPU scheduling policy.
///
/// The scheduler holds `JobId` handles for waiting jobs only; the jobs
/// themselves live in `SimCtx`. Every `add` reports `+1` and every
/// successful `remove` reports `-1` through `SimCtx::queue_changed`.
pub trait Scheduler {
    fn init(sink: Box<dyn DebugSink>) -> Self
    where
        Self: Sized;

    /// Admit `job`. `device` describes whatever currently occupies the CPU.
    /// Returns true if the running job should be preempted now.
    fn add(&mut self, ctx: &mut SimCtx, job: JobId, device: DeviceState) -> bool;

    /// Take the next job to run, or `None` when nothing is waiting.
    fn remove(&mut self, ctx: &mut SimCtx) -> Option<JobId>;

    /// Called on every clock interrupt. True means stop `running` and pick
    /// again.
    fn reschedule(&self, ctx: &SimCtx, running: JobId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn print_queue(&mut self, ctx: &SimCtx);

    fn queue_string(&self, ctx: &SimCtx) -> String;
}

// Shared by both policies' debug hooks
fn print_jobs<'a>(
    sink: &mut dyn DebugSink,
    ctx: &SimCtx,
    jobs: impl ExactSizeIterator<Item = &'a JobId>,
) {
    if jobs.len() == 0 {
        sink.db("| CPU queue: empty");
        return;
    }

    sink.db("| CPU queue:");
    for &job in jobs {
        sink.db(&format!("|    {}", ctx.job(job)));
    }
}

fn jobs_string<'a>(ctx: &SimCtx, jobs: impl Iterator<Item = &'a JobId>) -> String {
    let mut res = String::from("[");
    for &job in jobs {
        res.push(' ');
        res.push_str(&ctx.job(job).to_string());
    }
    if res.len() == 1 {
        return "[]".to_string();
    }
    res.push(']');
    res
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fcfs,
    Srtf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError {
    name: String,
}

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown scheduling policy `{}` (expected fcfs or srtf)",
            self.name
        )
    }
}

impl Error for ParsePolicyError {}

impl FromStr for Policy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs" => Ok(Policy::Fcfs),
            "srtf" => Ok(Policy::Srtf),
            _ => Err(ParsePolicyError {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fcfs => write!(f, "FCFS"),
            Policy::Srtf => write!(f, "SRTF"),
        }
    }
}
