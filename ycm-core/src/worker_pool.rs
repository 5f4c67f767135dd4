//! Global rayon pool used for scoring scans.

use crate::config::CompleterConfig;
use std::sync::Once;
use tracing::{debug, warn};

static POOL_INIT: Once = Once::new();

/// Size the global pool from hardware concurrency, clamped to the configured
/// bounds. Only the first call has any effect.
pub(crate) fn init_worker_pool(config: &CompleterConfig) {
    POOL_INIT.call_once(|| {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        let num_threads = config.worker_threads(available);

        let built = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("ycm-worker-{}", i))
            .start_handler(|_| {
                // Scoring yields to the host's request thread.
                use thread_priority::*;
                let _ = set_current_thread_priority(ThreadPriority::Min);
            })
            .build_global();

        match built {
            Ok(()) => debug!(num_threads, available, "worker pool initialized"),
            Err(e) => warn!("worker pool already initialized elsewhere: {e}"),
        }
    });
}
