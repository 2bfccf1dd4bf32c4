pub mod driver;
pub mod event;
pub mod observer;
pub mod sink;
pub mod state;
pub mod stats;

pub use driver::{SchedCore, SimConfig};
pub use event::{PreemptReason, SimEvent};
pub use sink::{DebugSink, LogSink};
pub use state::{DeviceState, Job, JobId, JobState, SimCtx, Ticks};
pub use stats::QueueStats;
