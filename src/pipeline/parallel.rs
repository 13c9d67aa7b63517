//! Concurrent source counting using crossbeam channels
//!
//! ```text
//!                     ┌─────────────┐
//!                     │   Producer  │  feeds (index, source) jobs
//!                     └──────┬──────┘
//!                            │ bounded channel (job_tx → job_rx)
//!            ┌───────────────┼───────────────┐
//!            ▼               ▼               ▼
//!     ┌──────────┐    ┌──────────┐    ┌──────────┐
//!     │ Worker 1 │    │ Worker 2 │    │ Worker N │  one source at a time each
//!     └────┬─────┘    └────┬─────┘    └────┬─────┘
//!          └───────────────┼───────────────┘
//!                          │ bounded channel (result_tx → result_rx)
//!                          ▼
//!                   ┌──────────────┐
//!                   │  Collector   │  waits for every source, then merges
//!                   └──────────────┘
//! ```
//!
//! Each worker owns the window and counter of the source it is reading, so no
//! locks are involved. Merging starts only after every source has finished
//! and runs on the calling thread in source order.

use super::{count_source, Source, SourceCount, SourceError, SourceStats};
use crate::phrases::PhraseCounter;
use crossbeam_channel::bounded;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use thiserror::Error;

/// What to do when one source fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Rank whatever sources completed; failures are reported alongside.
    #[default]
    Continue,
    /// Stop the remaining sources and produce no ranking.
    FailFast,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "fail-fast" | "failfast" => Ok(FailurePolicy::FailFast),
            _ => Err(anyhow::anyhow!(
                "Unknown failure policy '{}'. Valid values: continue, fail-fast",
                s
            )),
        }
    }
}

/// Knobs for [`run_sources`]
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Upper bound on sources read at the same time
    pub workers: usize,
    pub policy: FailurePolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            policy: FailurePolicy::default(),
        }
    }
}

/// How one source ended up
#[derive(Debug)]
pub struct SourceReport {
    pub source: Source,
    pub outcome: Result<SourceStats, SourceError>,
}

/// Merged counts of every completed source plus a per-source account.
#[derive(Debug)]
pub struct RunOutcome {
    pub merged: PhraseCounter,
    /// One entry per input source, in input order
    pub reports: Vec<SourceReport>,
}

impl RunOutcome {
    pub fn failures(&self) -> impl Iterator<Item = &SourceReport> {
        self.reports.iter().filter(|r| r.outcome.is_err())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Errors that end the whole run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("run aborted: {0}")]
    SourceFailed(SourceError),

    #[error("a worker thread panicked while reading {0} source(s)")]
    WorkerPanicked(usize),
}

type Job = (usize, Source);
type JobResult = (usize, Result<SourceCount, SourceError>);

/// Count every source concurrently, wait for all of them, then merge.
pub fn run_sources(sources: Vec<Source>, options: RunOptions) -> Result<RunOutcome, RunError> {
    let started = Instant::now();
    let total = sources.len();
    let num_workers = options.workers.clamp(1, total.max(1));
    let fail_fast = options.policy == FailurePolicy::FailFast;
    let cancel = Arc::new(AtomicBool::new(false));

    let (job_tx, job_rx) = bounded::<Job>(num_workers);
    let (result_tx, result_rx) = bounded::<JobResult>(num_workers);

    let jobs: Vec<Job> = sources.iter().cloned().enumerate().collect();
    let producer_handle = thread::spawn(move || {
        for job in jobs {
            if job_tx.send(job).is_err() {
                break;
            }
        }
    });

    let mut worker_handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let rx = job_rx.clone();
        let tx = result_tx.clone();
        let cancel = Arc::clone(&cancel);

        worker_handles.push(thread::spawn(move || {
            for (index, source) in rx {
                let result = if cancel.load(Ordering::Relaxed) {
                    Err(SourceError::Cancelled {
                        source_name: source.name(),
                    })
                } else {
                    count_source(&source, Some(cancel.as_ref()))
                };

                if let Err(e) = &result {
                    if !e.is_cancelled() {
                        tracing::warn!("{}", e);
                        if fail_fast {
                            cancel.store(true, Ordering::Relaxed);
                        }
                    }
                }

                if tx.send((index, result)).is_err() {
                    break;
                }
            }
        }));
    }

    // Workers hold the only remaining copies, so the collector loop ends when they do
    drop(job_rx);
    drop(result_tx);

    let mut results: Vec<Option<Result<SourceCount, SourceError>>> =
        (0..total).map(|_| None).collect();
    for (index, result) in result_rx {
        results[index] = Some(result);
    }

    let _ = producer_handle.join();
    let mut panicked = 0;
    for handle in worker_handles {
        if handle.join().is_err() {
            panicked += 1;
        }
    }

    let missing = results.iter().filter(|r| r.is_none()).count();
    if panicked > 0 || missing > 0 {
        tracing::error!(
            "{} worker(s) panicked, {} source(s) unaccounted for",
            panicked,
            missing
        );
        return Err(RunError::WorkerPanicked(missing));
    }

    if fail_fast {
        let first_failure = results
            .iter()
            .position(|r| matches!(r, Some(Err(e)) if !e.is_cancelled()));
        if let Some(i) = first_failure {
            if let Some(Err(e)) = results[i].take() {
                return Err(RunError::SourceFailed(e));
            }
        }
    }

    // Strictly sequential merge in input order
    let mut merged = PhraseCounter::new();
    let mut reports = Vec::with_capacity(total);
    for (source, result) in sources.into_iter().zip(results.into_iter().flatten()) {
        let outcome = match result {
            Ok(SourceCount { counter, stats }) => {
                merged.merge_from(counter);
                Ok(stats)
            }
            Err(e) => Err(e),
        };
        reports.push(SourceReport { source, outcome });
    }

    tracing::info!(
        "Counted {} source(s) ({} failed) into {} distinct phrases in {:.2?}",
        total,
        reports.iter().filter(|r| r.outcome.is_err()).count(),
        merged.len(),
        started.elapsed()
    );

    Ok(RunOutcome { merged, reports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn text_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn options(workers: usize, policy: FailurePolicy) -> RunOptions {
        RunOptions { workers, policy }
    }

    #[test]
    fn test_no_sources_yields_empty_counter() {
        let outcome = run_sources(Vec::new(), RunOptions::default()).unwrap();
        assert!(outcome.merged.is_empty());
        assert!(outcome.reports.is_empty());
        assert!(!outcome.has_failures());
    }

    #[test]
    fn test_merges_across_files() {
        let a = text_file("a b c. A B C!\n");
        let b = text_file("a b c\nx y z x y z x y z\n");
        let sources = vec![Source::from(a.path()), Source::from(b.path())];

        let outcome = run_sources(sources, options(2, FailurePolicy::Continue)).unwrap();
        // "a b c a b c" -> abc, bca, cab, abc
        assert_eq!(outcome.merged.get("a b c"), 3);
        assert_eq!(outcome.merged.get("x y z"), 3);
        assert_eq!(outcome.reports.len(), 2);
        assert!(!outcome.has_failures());
    }

    #[test]
    fn test_windows_do_not_span_sources() {
        let a = text_file("one two\n");
        let b = text_file("three four\n");
        let sources = vec![Source::from(a.path()), Source::from(b.path())];
        let outcome = run_sources(sources, options(1, FailurePolicy::Continue)).unwrap();
        assert!(outcome.merged.is_empty());
    }

    #[test]
    fn test_continue_keeps_partial_results() {
        let good = text_file("red green blue\n");
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let sources = vec![Source::File(missing.clone()), Source::from(good.path())];

        let outcome = run_sources(sources, options(4, FailurePolicy::Continue)).unwrap();
        assert_eq!(outcome.merged.get("red green blue"), 1);
        let failures: Vec<_> = outcome.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, Source::File(missing));
        // Reports keep input order regardless of completion order
        assert!(outcome.reports[0].outcome.is_err());
        assert!(outcome.reports[1].outcome.is_ok());
    }

    #[test]
    fn test_fail_fast_returns_first_failure() {
        let good = text_file("red green blue\n");
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let sources = vec![Source::from(good.path()), Source::File(missing)];

        let err = run_sources(sources, options(1, FailurePolicy::FailFast)).unwrap_err();
        match err {
            RunError::SourceFailed(e) => assert!(e.source_name().ends_with("missing.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_result_independent_of_worker_count() {
        let files: Vec<NamedTempFile> = (0..6)
            .map(|i| text_file(&format!("w{i} shared words here and shared words here\n")))
            .collect();
        let sources: Vec<Source> = files.iter().map(|f| Source::from(f.path())).collect();

        let serial = run_sources(sources.clone(), options(1, FailurePolicy::Continue)).unwrap();
        let wide = run_sources(sources, options(8, FailurePolicy::Continue)).unwrap();
        assert_eq!(serial.merged, wide.merged);
        assert_eq!(serial.merged.get("shared words here"), 12);
    }

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!(
            "continue".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Continue
        );
        assert_eq!(
            "fail-fast".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::FailFast
        );
        assert!("maybe".parse::<FailurePolicy>().is_err());
    }
}
