//! Rayon thread pool configuration for recap workloads.
//!
//! Use [`WorkerPool::install`] to run trials on a fixed number of threads, or
//! rely on Rayon's global pool (all CPU cores).

use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};

/// How many worker threads run trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Worker threads; 0 means the global Rayon pool.
    pub workers: usize,
}

impl WorkerPool {
    /// The global Rayon pool.
    #[must_use]
    pub const fn default_workers() -> Self {
        Self { workers: 0 }
    }

    /// Exactly `n` worker threads.
    #[must_use]
    pub const fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Runs `f` on this pool. With zero workers `f` runs directly and its
    /// parallel iterators use the global pool; otherwise a temporary pool of
    /// `workers` threads is built for the call.
    ///
    /// # Errors
    ///
    /// Returns the build error when the dedicated pool cannot be created.
    pub fn install<F, R>(&self, f: F) -> Result<R, ThreadPoolBuildError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
        Ok(pool.install(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn dedicated_pool_has_requested_threads() {
        let threads = WorkerPool::with_workers(2)
            .install(rayon::current_num_threads)
            .unwrap();
        assert_eq!(threads, 2);
    }

    #[test]
    fn global_pool_runs_inline() {
        let sum: u64 = WorkerPool::default_workers()
            .install(|| (1..=100u64).into_par_iter().sum())
            .unwrap();
        assert_eq!(sum, 5050);
    }
}
