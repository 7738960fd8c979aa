//! Trial scheduling.
//!
//! A [`WorkerPool`] maps a function over a slice of trials and returns the
//! results in input order, whichever policy is in effect. Without the
//! `parallel` feature every policy degrades to sequential evaluation.

use tracing::{debug, warn};

use greenmode_core::config::WorkerPolicy;

/// Pool size used when the policy does not name one: the available cores
/// minus one, at least one.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

pub enum WorkerPool {
    Sequential,
    #[cfg(feature = "parallel")]
    Parallel(rayon::ThreadPool),
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => f.write_str("WorkerPool::Sequential"),
            #[cfg(feature = "parallel")]
            Self::Parallel(pool) => f
                .debug_struct("WorkerPool::Parallel")
                .field("threads", &pool.current_num_threads())
                .finish(),
        }
    }
}

impl WorkerPool {
    /// Build a pool for `policy`. A pool that cannot be created falls back
    /// to sequential evaluation.
    pub fn new(policy: WorkerPolicy) -> Self {
        match policy {
            WorkerPolicy::Sequential => Self::Sequential,
            WorkerPolicy::Parallel { threads } => Self::parallel(threads.unwrap_or_else(default_threads)),
        }
    }

    #[cfg(feature = "parallel")]
    fn parallel(threads: usize) -> Self {
        let threads = threads.max(1);
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("greenmode-trial-{idx}"))
            .build()
        {
            Ok(pool) => {
                debug!(threads, "trial pool ready");
                Self::Parallel(pool)
            }
            Err(err) => {
                warn!(error = %err, "could not build trial pool, running trials sequentially");
                Self::Sequential
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn parallel(threads: usize) -> Self {
        warn!(threads, "built without the parallel feature, running trials sequentially");
        Self::Sequential
    }

    pub fn threads(&self) -> usize {
        match self {
            Self::Sequential => 1,
            #[cfg(feature = "parallel")]
            Self::Parallel(pool) => pool.current_num_threads(),
        }
    }

    /// Apply `f` to every item, keeping input order. When items fail, one of
    /// their errors is returned.
    pub fn try_map<T, R, E, F>(&self, items: &[T], f: F) -> Result<Vec<R>, E>
    where
        T: Sync,
        R: Send,
        E: Send,
        F: Fn(&T) -> Result<R, E> + Sync + Send,
    {
        match self {
            Self::Sequential => items.iter().map(f).collect(),
            #[cfg(feature = "parallel")]
            Self::Parallel(pool) => {
                use rayon::prelude::*;
                pool.install(|| items.par_iter().map(f).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_and_parallel_agree_on_order() {
        let items: Vec<u32> = (0..200).collect();
        let seq = WorkerPool::new(WorkerPolicy::Sequential);
        let par = WorkerPool::new(WorkerPolicy::Parallel { threads: Some(3) });

        let square = |x: &u32| -> Result<u32, String> { Ok(x * x) };
        assert_eq!(seq.try_map(&items, square).unwrap(), par.try_map(&items, square).unwrap());
    }

    #[test]
    fn errors_propagate() {
        let items = vec![1, 2, 3];
        let pool = WorkerPool::new(WorkerPolicy::Parallel { threads: Some(2) });
        let res: Result<Vec<i32>, String> = pool.try_map(&items, |x| {
            if *x == 2 {
                Err("two".to_string())
            } else {
                Ok(*x)
            }
        });
        assert_eq!(res.unwrap_err(), "two");
    }

    #[test]
    fn default_thread_count_is_positive() {
        assert!(default_threads() >= 1);
        assert_eq!(WorkerPool::new(WorkerPolicy::Sequential).threads(), 1);
    }
}
