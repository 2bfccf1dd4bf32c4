pub mod driver;
pub mod job;
pub mod workload;

pub use driver::{Sim, SimReport};
pub use job::{JobInstance, JobLabel, JobSpec};
pub use workload::bernoulli_jobs;
