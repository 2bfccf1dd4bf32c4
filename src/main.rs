use std::{env, error::Error, fmt, process};

use cpusim::{
    FcfsScheduler, Policy, Scheduler, Sim, SimConfig, SimEvent, SrtfScheduler,
    logger, scheduler::ParsePolicyError, sim::{JobInstance, bernoulli_jobs},
};
use log::LevelFilter;

const TICKS: u64 = 500;
const P_ARRIVAL: f64 = 0.15;
const P_SHORT: f64 = 0.3;
const SHORT_TICKS: u64 = 2;
const LONG_TICKS: u64 = 6;

#[derive(Debug)]
enum CliError {
    Policy(ParsePolicyError),
    Seed(String),
    Usage,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Policy(err) => write!(f, "{err}"),
            CliError::Seed(seed) => write!(f, "invalid seed `{seed}`"),
            CliError::Usage => write!(f, "usage: cpusim [fcfs|srtf] [seed]"),
        }
    }
}

impl Error for CliError {}

fn parse_args(args: &[String]) -> Result<(Policy, u64), CliError> {
    let policy = match args.first() {
        Some(name) => name.parse().map_err(CliError::Policy)?,
        None => Policy::Srtf,
    };
    let seed = match args.get(1) {
        Some(seed) => seed.parse().map_err(|_| CliError::Seed(seed.clone()))?,
        None => 0,
    };
    if args.len() > 2 {
        return Err(CliError::Usage);
    }
    Ok((policy, seed))
}

fn main() {
    let level = env::var("CPUSIM_LOG")
        .ok()
        .and_then(|name| logger::parse_level(&name))
        .unwrap_or(LevelFilter::Info);
    if let Err(err) = logger::init(level) {
        eprintln!("failed to install logger: {err}");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let (policy, seed) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    let jobs = bernoulli_jobs(TICKS, P_ARRIVAL, P_SHORT, SHORT_TICKS, LONG_TICKS, seed);
    log::info!("{policy}: {} jobs, seed {seed}", jobs.len());

    let config = SimConfig::default();
    match policy {
        Policy::Fcfs => simulate(Sim::<FcfsScheduler>::new(jobs, config)),
        Policy::Srtf => simulate(Sim::<SrtfScheduler>::new(jobs, config)),
    }
}

fn simulate<S: Scheduler>(mut sim: Sim<S>) {
    let mut current_idle = 0;
    let mut max_idle = 0;

    while !sim.finished() {
        let now = sim.core.now();
        let events = sim.step();

        let mut got_idle = false;
        for event in events {
            log::debug!("t={} {:?}", now, event);
            if event == SimEvent::CpuIdle {
                got_idle = true;
            }
        }

        if got_idle {
            current_idle += 1;
            max_idle = max_idle.max(current_idle);
        } else {
            current_idle = 0;
        }
    }

    println!("{}", sim.report());
    println!("Longest idle period: {max_idle} ticks");
    if let Some(job) = longest_wait(&sim) {
        println!(
            "Longest wait: job {} ({} ticks)",
            job.job.id,
            job.waiting_time().unwrap_or(0)
        );
    }
}

fn longest_wait<S: Scheduler>(sim: &Sim<S>) -> Option<&JobInstance> {
    sim.jobs
        .iter()
        .filter(|job| job.completion_time.is_some())
        .max_by_key(|job| job.waiting_time())
}
