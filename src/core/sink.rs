/// Destination for scheduler debug output.
///
/// Schedulers receive one at construction. Closures are sinks too, which
/// is how tests capture the dump.
pub trait DebugSink {
    fn db(&mut self, line: &str);
}

impl<F: FnMut(&str)> DebugSink for F {
    fn db(&mut self, line: &str) {
        self(line)
    }
}

/// Forwards every line to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn db(&mut self, line: &str) {
        log::debug!(target: "cpusim::sched", "{line}");
    }
}
