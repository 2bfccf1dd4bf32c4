use crate::core::{JobId, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreemptReason {
    // A newcomer's add() asked for it
    Arrival,
    // reschedule() asked for it on a clock interrupt
    ClockInterrupt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    JobArrived {
        job: JobId,
        burst: Ticks,
    },
    JobDispatched {
        job: JobId,
        first_run: bool,
    },
    JobPreempted {
        job: JobId,
        reason: PreemptReason,
        time_left: Ticks,
    },
    JobCompleted {
        job: JobId,
    },
    // CPU idle even after remove()
    CpuIdle,
}
