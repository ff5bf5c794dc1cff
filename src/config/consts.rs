/// Name of the serial lane standing in for a UI main loop
pub const DEFAULT_MAIN_QUEUE_NAME: &str = "main";
/// Name of the parallel lane for expensive work
pub const DEFAULT_BACKGROUND_QUEUE_NAME: &str = "background";
/// Thread name prefix for the background runtime's workers
pub const DEFAULT_THREAD_NAME: &str = "observable-worker";
/// Worker count used when the platform cannot report its parallelism
pub const FALLBACK_WORKER_THREADS: usize = 4;
