use average::Estimate;
use rustc_hash::FxHashMap;
use std::fmt;

use super::job::{JobInstance, JobSpec};
use crate::{
    core::{
        driver::{SchedCore, SimConfig},
        event::SimEvent,
        sink::DebugSink,
        state::{JobId, Ticks},
    },
    scheduler::Scheduler,
};

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    pub jobs: Vec<JobInstance>,
    job_cursor: usize,
    // JobId --> jobs[index]; used to propagate start/completion to JobInstance
    ids_to_jobs: FxHashMap<JobId, usize>,
}

/// Summary of a finished (or cut-off) run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    pub completed: usize,
    pub total: usize,
    pub makespan: Ticks,
    pub avg_response: f64,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_queue_len: f64,
    pub max_queue_len: u64,
    pub preemptions: u64,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(jobs: Vec<JobSpec>, config: SimConfig) -> Self {
        Self::from_core(jobs, SchedCore::new(config))
    }

    pub fn with_sink(jobs: Vec<JobSpec>, config: SimConfig, sink: Box<dyn DebugSink>) -> Self {
        Self::from_core(jobs, SchedCore::with_sink(config, sink))
    }

    fn from_core(mut jobs: Vec<JobSpec>, core: SchedCore<S>) -> Self {
        jobs.sort_by(|a, b| {
            a.arrival_time
                .cmp(&b.arrival_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        let jobs = jobs
            .into_iter()
            .map(|job| JobInstance {
                job,
                start_time: None,
                completion_time: None,
            })
            .collect();

        Self {
            core,
            jobs,
            job_cursor: 0,
            ids_to_jobs: FxHashMap::default(),
        }
    }

    pub fn step(&mut self) -> Vec<SimEvent> {
        self.handle_arrivals();

        let dispatch_time = self.core.now();
        let events = self.core.tick();
        let completion_time = self.core.now();

        for event in &events {
            match *event {
                SimEvent::JobDispatched {
                    job,
                    first_run: true,
                } => {
                    let job_index = self.job_index(job);
                    self.jobs[job_index].start_time = Some(dispatch_time);
                }
                SimEvent::JobCompleted { job } => {
                    let job_index = self.job_index(job);
                    self.jobs[job_index].completion_time = Some(completion_time);
                }
                _ => {}
            }
        }

        events
    }

    fn job_index(&self, job: JobId) -> usize {
        *self
            .ids_to_jobs
            .get(&job)
            .expect("Scheduled job missing associated workload entry")
    }

    fn handle_arrivals(&mut self) {
        let now = self.core.now();
        // Jobs are sorted, so arrivals for `now` are contiguous from the cursor
        while let Some(instance) = self.jobs.get(self.job_cursor) {
            if instance.job.arrival_time > now {
                break;
            }

            let job_id = self
                .core
                .ctx
                .create_job(instance.job.id, instance.job.burst);
            self.ids_to_jobs.insert(job_id, self.job_cursor);
            self.core.arrive(job_id);

            self.job_cursor += 1;
        }
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.jobs.iter().all(|job| job.completion_time.is_some())
    }

    pub fn finished(&self) -> bool {
        let out_of_time = self
            .core
            .config()
            .max_ticks
            .is_some_and(|limit| self.core.now() >= limit);
        self.all_jobs_completed() || out_of_time
    }

    pub fn run(&mut self) -> SimReport {
        while !self.finished() {
            self.step();
        }

        let report = self.report();
        log::info!(
            "run finished at t={}: {}/{} jobs completed",
            self.core.now(),
            report.completed,
            report.total
        );
        report
    }

    // Apply `f` to every completed job
    pub fn jobs_map<'a>(
        &'a self,
        f: impl Fn(&JobInstance) -> Ticks + 'a,
    ) -> impl Iterator<Item = f64> + 'a {
        self.jobs
            .iter()
            .filter(|job| job.completion_time.is_some())
            .map(move |job| f(job) as f64)
    }

    pub fn report(&self) -> SimReport {
        let now = self.core.now();
        let stats = &self.core.ctx.stats;

        SimReport {
            completed: self
                .jobs
                .iter()
                .filter(|job| job.completion_time.is_some())
                .count(),
            total: self.jobs.len(),
            makespan: self
                .jobs
                .iter()
                .filter_map(|job| job.completion_time)
                .max()
                .unwrap_or(0),
            avg_response: avg(self.jobs_map(|j| j.response_time().unwrap_or(0))),
            avg_turnaround: avg(self.jobs_map(|j| j.turnaround_time().unwrap_or(0))),
            avg_waiting: avg(self.jobs_map(|j| j.waiting_time().unwrap_or(0))),
            avg_queue_len: stats.average_len(now),
            max_queue_len: stats.max(),
            preemptions: self.core.preemptions(),
        }
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<average::Mean>().estimate()
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Jobs completed: {}/{}", self.completed, self.total)?;
        writeln!(f, "Makespan: {} ticks", self.makespan)?;
        writeln!(f, "Average response time: {:.2} ticks", self.avg_response)?;
        writeln!(f, "Average turnaround time: {:.2} ticks", self.avg_turnaround)?;
        writeln!(f, "Average waiting time: {:.2} ticks", self.avg_waiting)?;
        writeln!(
            f,
            "Queue length: {:.2} average, {} max",
            self.avg_queue_len, self.max_queue_len
        )?;
        write!(f, "Preemptions: {}", self.preemptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{FcfsScheduler, SrtfScheduler};

    fn entry(id: u64, arrival_time: Ticks, burst: Ticks) -> JobSpec {
        JobSpec {
            id,
            arrival_time,
            burst,
        }
    }

    fn completion_order<S: Scheduler>(sim: &Sim<S>) -> Vec<u64> {
        let mut done: Vec<_> = sim
            .jobs
            .iter()
            .map(|job| (job.completion_time.unwrap(), job.job.id))
            .collect();
        done.sort();
        done.into_iter().map(|(_, id)| id).collect()
    }

    fn workload() -> Vec<JobSpec> {
        vec![entry(0, 0, 6), entry(1, 1, 4), entry(2, 2, 1), entry(3, 3, 2)]
    }

    #[test]
    fn fcfs_serves_in_arrival_order() {
        let mut sim = Sim::<FcfsScheduler>::new(workload(), SimConfig::default());
        let report = sim.run();

        assert!(sim.all_jobs_completed());
        assert_eq!(completion_order(&sim), vec![0, 1, 2, 3]);
        assert_eq!(report.makespan, 13);
        assert_eq!(report.preemptions, 0);
        // completions at 6, 10, 11, 13
        assert_eq!(report.avg_turnaround, (6.0 + 9.0 + 9.0 + 10.0) / 4.0);
    }

    #[test]
    fn srtf_favours_short_jobs() {
        let config = SimConfig {
            clock_interval: 1,
            ..SimConfig::default()
        };
        let mut sim = Sim::<SrtfScheduler>::new(workload(), config);
        let report = sim.run();

        assert_eq!(completion_order(&sim), vec![2, 3, 1, 0]);
        assert_eq!(report.makespan, 13);
        assert!(report.preemptions > 0);
    }

    #[test]
    fn workload_is_sorted_by_arrival() {
        let jobs = vec![entry(5, 4, 1), entry(2, 0, 1), entry(1, 4, 1)];
        let sim = Sim::<FcfsScheduler>::new(jobs, SimConfig::default());
        let ids: Vec<_> = sim.jobs.iter().map(|job| job.job.id).collect();
        assert_eq!(ids, vec![2, 1, 5]);
    }

    #[test]
    fn max_ticks_cuts_the_run_short() {
        let config = SimConfig {
            max_ticks: Some(5),
            ..SimConfig::default()
        };
        let mut sim = Sim::<FcfsScheduler>::new(vec![entry(0, 0, 100)], config);
        let report = sim.run();

        assert_eq!(sim.core.now(), 5);
        assert_eq!(report.completed, 0);
        assert_eq!(report.total, 1);
    }

    #[test]
    fn response_and_waiting_times() {
        let jobs = vec![entry(0, 0, 3), entry(1, 0, 2)];
        let mut sim = Sim::<FcfsScheduler>::new(jobs, SimConfig::default());
        let report = sim.run();

        let second = &sim.jobs[1];
        assert_eq!(second.start_time, Some(3));
        assert_eq!(second.response_time(), Some(3));
        assert_eq!(second.waiting_time(), Some(3));
        assert_eq!(report.avg_response, 1.5);
        assert_eq!(report.max_queue_len, 2);
    }

    #[test]
    fn report_display() {
        let mut sim = Sim::<FcfsScheduler>::new(vec![entry(0, 0, 2)], SimConfig::default());
        let text = sim.run().to_string();
        assert!(text.starts_with("Jobs completed: 1/1\n"));
        assert!(text.ends_with("Preemptions: 0"));
    }
}
