//! Independent runs over a worker pool.
//!
//! Each job owns its whole search state; jobs only share their graph, read
//! only, through an `Arc`. Results come back in job order, though jobs may
//! finish in any order.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;
#[cfg(feature = "parallel")]
use log::warn;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::TabucolError;
use crate::graph::{Color, Graph};
use crate::tabucol::{Outcome, TabucolConfig, TabucolResult, TabucolRunner};

/// One run to execute.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Graph to color.
    pub graph: Arc<Graph>,
    /// Number of colors.
    pub k: Color,
    /// Run configuration.
    pub config: TabucolConfig,
}

impl BatchJob {
    /// Creates a job.
    pub fn new(graph: Arc<Graph>, k: Color, config: TabucolConfig) -> Self {
        Self { graph, k, config }
    }

    /// `count` copies of one run, seeded `base_seed`, `base_seed + 1`, ...
    pub fn replicate(
        graph: Arc<Graph>,
        k: Color,
        config: &TabucolConfig,
        count: usize,
        base_seed: u64,
    ) -> Vec<Self> {
        (0..count as u64)
            .map(|i| {
                Self::new(
                    Arc::clone(&graph),
                    k,
                    config.clone().with_seed(base_seed.wrapping_add(i)),
                )
            })
            .collect()
    }

    fn execute(&self, cancel: Option<&Arc<AtomicBool>>) -> Result<TabucolResult, TabucolError> {
        TabucolRunner::run_with_cancel(&self.graph, self.k, &self.config, cancel.cloned())
    }
}

/// Runs batches of jobs.
pub struct BatchRunner;

impl BatchRunner {
    /// Runs every job, on `workers` threads when given, otherwise on the
    /// global pool.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use tabucol::batch::{BatchJob, BatchRunner, BatchSummary};
    /// use tabucol::graph::Graph;
    /// use tabucol::tabucol::TabucolConfig;
    ///
    /// let square = Arc::new(Graph::new(4, [(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap());
    /// let jobs = BatchJob::replicate(square, 2, &TabucolConfig::default(), 8, 0);
    /// let results = BatchRunner::run(&jobs, Some(2));
    /// let summary = BatchSummary::from_results(&results);
    /// assert_eq!(summary.runs, 8);
    /// assert_eq!(summary.errors, 0);
    /// ```
    pub fn run(
        jobs: &[BatchJob],
        workers: Option<usize>,
    ) -> Vec<Result<TabucolResult, TabucolError>> {
        Self::run_with_cancel(jobs, workers, None)
    }

    /// Runs every job with a shared cancellation token.
    ///
    /// Raising the flag stops running jobs at their next iteration and makes
    /// jobs that have not started return [`Outcome::Cancelled`] at once.
    pub fn run_with_cancel(
        jobs: &[BatchJob],
        workers: Option<usize>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Vec<Result<TabucolResult, TabucolError>> {
        debug!("running {} tabucol jobs", jobs.len());
        execute_all(jobs, workers, cancel.as_ref())
    }
}

#[cfg(feature = "parallel")]
fn execute_all(
    jobs: &[BatchJob],
    workers: Option<usize>,
    cancel: Option<&Arc<AtomicBool>>,
) -> Vec<Result<TabucolResult, TabucolError>> {
    let par_run = || {
        jobs.par_iter()
            .map(|job| job.execute(cancel))
            .collect::<Vec<_>>()
    };

    match workers {
        None => par_run(),
        Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => pool.install(par_run),
            Err(err) => {
                warn!("could not build a {n}-thread pool ({err}), using the global pool");
                par_run()
            }
        },
    }
}

#[cfg(not(feature = "parallel"))]
fn execute_all(
    jobs: &[BatchJob],
    _workers: Option<usize>,
    cancel: Option<&Arc<AtomicBool>>,
) -> Vec<Result<TabucolResult, TabucolError>> {
    jobs.iter().map(|job| job.execute(cancel)).collect()
}

/// Outcome counts over a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Jobs in the batch.
    pub runs: usize,
    /// Runs that found a proper coloring.
    pub successes: usize,
    /// Runs that ran out of admissible moves.
    pub stuck: usize,
    /// Runs that used their whole iteration budget.
    pub exhausted: usize,
    /// Runs stopped by the cancellation token.
    pub cancelled: usize,
    /// Jobs rejected for their configuration.
    pub errors: usize,
    /// Mean iterations over successful runs.
    pub mean_success_iterations: Option<f64>,
}

impl BatchSummary {
    /// Tallies a batch.
    pub fn from_results(results: &[Result<TabucolResult, TabucolError>]) -> Self {
        let mut summary = Self {
            runs: results.len(),
            ..Self::default()
        };
        let mut success_iterations = 0usize;

        for result in results {
            match result {
                Ok(r) => match &r.outcome {
                    Outcome::Success { iterations, .. } => {
                        summary.successes += 1;
                        success_iterations += iterations;
                    }
                    Outcome::Stuck { .. } => summary.stuck += 1,
                    Outcome::Exhausted { .. } => summary.exhausted += 1,
                    Outcome::Cancelled { .. } => summary.cancelled += 1,
                },
                Err(_) => summary.errors += 1,
            }
        }

        if summary.successes > 0 {
            summary.mean_success_iterations =
                Some(success_iterations as f64 / summary.successes as f64);
        }
        summary
    }

    /// Share of runs that found a proper coloring.
    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.successes as f64 / self.runs as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odd_cycle() -> Arc<Graph> {
        Arc::new(Graph::new(5, (0..5).map(|i| (i, (i + 1) % 5))).unwrap())
    }

    #[test]
    fn test_replicate_assigns_consecutive_seeds() {
        let jobs = BatchJob::replicate(odd_cycle(), 3, &TabucolConfig::default(), 3, 10);
        let seeds: Vec<_> = jobs.iter().map(|j| j.config.seed).collect();
        assert_eq!(seeds, vec![Some(10), Some(11), Some(12)]);
        assert!(jobs.iter().all(|j| Arc::ptr_eq(&j.graph, &jobs[0].graph)));
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let config = TabucolConfig::default().with_rep(2).with_max_iterations(200);
        let jobs = BatchJob::replicate(odd_cycle(), 3, &config, 6, 100);
        let results = BatchRunner::run(&jobs, Some(3));
        assert_eq!(results.len(), 6);

        for (job, result) in jobs.iter().zip(&results) {
            let alone = TabucolRunner::run(&job.graph, job.k, &job.config).unwrap();
            let batched = result.as_ref().unwrap();
            assert_eq!(batched.outcome, alone.outcome);
            assert_eq!(batched.objective_history, alone.objective_history);
        }
    }

    #[test]
    fn test_batch_reports_config_errors_per_job() {
        let graph = odd_cycle();
        let jobs = vec![
            BatchJob::new(Arc::clone(&graph), 3, TabucolConfig::default().with_seed(1)),
            BatchJob::new(Arc::clone(&graph), 0, TabucolConfig::default()),
        ];
        let results = BatchRunner::run(&jobs, None);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(TabucolError::Config(_))));

        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_cancelled_batch() {
        // a random 2-coloring of the 5-cycle always has a conflict
        let jobs = BatchJob::replicate(odd_cycle(), 2, &TabucolConfig::default(), 4, 0);
        let flag = Arc::new(AtomicBool::new(true));
        let results = BatchRunner::run_with_cancel(&jobs, Some(2), Some(flag));
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.cancelled, 4);
        assert_eq!(summary.success_rate(), 0.0);
    }

    #[test]
    fn test_summary_mean_iterations() {
        let ok = |iterations| -> Result<TabucolResult, TabucolError> {
            let graph = Graph::edgeless(1);
            let mut r = TabucolRunner::run(&graph, 1, &TabucolConfig::default()).unwrap();
            r.outcome = Outcome::Success {
                iterations,
                coloring: vec![0],
            };
            Ok(r)
        };
        let results = vec![ok(4), ok(8)];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.mean_success_iterations, Some(6.0));
        assert_eq!(summary.success_rate(), 1.0);
        assert_eq!(BatchSummary::from_results(&[]).mean_success_iterations, None);
    }
}
