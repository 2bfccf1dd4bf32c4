pub mod core;
pub mod logger;
pub mod scheduler;
pub mod sim;

pub use crate::core::{DeviceState, Job, JobId, SimConfig, SimEvent};
pub use scheduler::{FcfsScheduler, Policy, Scheduler, SrtfScheduler};
pub use sim::{JobSpec, Sim, SimReport};
