use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::platform::Platform;

/// Print what platform detection found.
pub fn run(log: &Logger) {
    let platform = Platform::detect(&SystemExecutor);
    log.stage("Platform");
    for line in platform.summary() {
        log.info(&line);
    }
}
