//! Partitioned parallel execution of a per-element stage chain.
//!
//! The source is buffered up front and cut into contiguous partitions. Each
//! partition becomes one job that pushes its elements through the composed
//! stages (`map`, `try_map`, `filter`, `flat_map`) into a sink. Jobs run on
//! a `WorkerPool`; results are merged either through a channel as they are
//! produced (`MergeMode::Unordered`) or through per-partition slots that are
//! concatenated in partition order (`MergeMode::Ordered`).
//!
//! Failure handling: the first job error is kept, the shared cancel flag is
//! raised so sibling jobs stop at their next element, and the error is
//! returned only after the pool scope has joined every job. No partial
//! result is returned alongside an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, PoisonError};

use lazyseq_core::config::{MergeMode, ParallelConfig};
use lazyseq_core::error::{Result, SeqError};
use lazyseq_operators::Seq;

use crate::metrics::emit_span;
use crate::pool::WorkerPool;

/// One partition's share of the work: feed every produced element to the
/// sink, stopping early once the cancel flag is raised.
type Job<T> = Box<dyn FnOnce(&AtomicBool, &mut dyn FnMut(T) -> Result<()>) -> Result<()> + Send>;

/// Cuts the buffered source into `n` jobs with the full stage chain applied.
type Splitter<T> = Box<dyn FnOnce(usize) -> Vec<Job<T>> + Send>;

fn job<T, F>(f: F) -> Job<T>
where
    F: FnOnce(&AtomicBool, &mut dyn FnMut(T) -> Result<()>) -> Result<()> + Send + 'static,
{
    Box::new(f)
}

/// A query over a buffered source whose stages run on a worker pool.
pub struct ParallelQuery<T> {
    len: usize,
    splitter: Splitter<T>,
    config: ParallelConfig,
}

impl<T> std::fmt::Debug for ParallelQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelQuery")
            .field("len", &self.len)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Send + 'static> ParallelQuery<T> {
    /// Wrap owned elements. Uses `ParallelConfig::default()`.
    pub fn from_vec(items: Vec<T>) -> Self {
        let len = items.len();
        let splitter: Splitter<T> = Box::new(move |parts| {
            split_contiguous(items, parts)
                .into_iter()
                .map(|chunk| {
                    job(move |cancel: &AtomicBool, sink: &mut dyn FnMut(T) -> Result<()>| {
                        for item in chunk {
                            if cancel.load(Ordering::Relaxed) {
                                break;
                            }
                            sink(item)?;
                        }
                        Ok(())
                    })
                })
                .collect()
        });
        Self {
            len,
            splitter,
            config: ParallelConfig::default(),
        }
    }

    /// Buffer `seq` on the calling thread. Fails with the first error the
    /// traversal yields.
    pub fn from_seq(seq: &Seq<'_, T>) -> Result<Self> {
        Ok(Self::from_vec(seq.to_vec()?))
    }

    pub fn with_config(mut self, config: ParallelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.config.degree_of_parallelism = Some(degree);
        self
    }

    pub fn with_merge(mut self, merge: MergeMode) -> Self {
        self.config.merge = merge;
        self
    }

    /// Reassemble results in source order.
    pub fn ordered(self) -> Self {
        self.with_merge(MergeMode::Ordered)
    }

    pub fn unordered(self) -> Self {
        self.with_merge(MergeMode::Unordered)
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Number of buffered source elements.
    pub fn source_len(&self) -> usize {
        self.len
    }

    fn stage<U, W>(self, wrap: W) -> ParallelQuery<U>
    where
        U: Send + 'static,
        W: Fn(Job<T>) -> Job<U> + Send + 'static,
    {
        let prev = self.splitter;
        ParallelQuery {
            len: self.len,
            splitter: Box::new(move |parts| prev(parts).into_iter().map(&wrap).collect()),
            config: self.config,
        }
    }

    pub fn map<U, F>(self, f: F) -> ParallelQuery<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.stage(move |inner: Job<T>| {
            let f = Arc::clone(&f);
            job(move |cancel: &AtomicBool, sink: &mut dyn FnMut(U) -> Result<()>| {
                inner(cancel, &mut |t: T| sink(f(t)))
            })
        })
    }

    /// Fallible map. The first `Err` cancels the whole query.
    pub fn try_map<U, F>(self, f: F) -> ParallelQuery<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<U> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.stage(move |inner: Job<T>| {
            let f = Arc::clone(&f);
            job(move |cancel: &AtomicBool, sink: &mut dyn FnMut(U) -> Result<()>| {
                inner(cancel, &mut |t: T| sink(f(t)?))
            })
        })
    }

    pub fn filter<P>(self, pred: P) -> ParallelQuery<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let pred = Arc::new(pred);
        self.stage(move |inner: Job<T>| {
            let pred = Arc::clone(&pred);
            job(move |cancel: &AtomicBool, sink: &mut dyn FnMut(T) -> Result<()>| {
                inner(cancel, &mut |t: T| if pred(&t) { sink(t) } else { Ok(()) })
            })
        })
    }

    /// Expand every element; the expansion of one element stays contiguous.
    pub fn flat_map<U, I, F>(self, f: F) -> ParallelQuery<U>
    where
        U: Send + 'static,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.stage(move |inner: Job<T>| {
            let f = Arc::clone(&f);
            job(move |cancel: &AtomicBool, sink: &mut dyn FnMut(U) -> Result<()>| {
                inner(cancel, &mut |t: T| {
                    for u in f(t) {
                        sink(u)?;
                    }
                    Ok(())
                })
            })
        })
    }

    /// Run the query and collect the merged results.
    pub fn to_vec(self) -> Result<Vec<T>> {
        match self.config.merge {
            MergeMode::Ordered => {
                let parts = self.run_partitions(Vec::new, |acc, t| acc.push(t))?;
                let total = parts.iter().map(Vec::len).sum();
                let mut out = Vec::with_capacity(total);
                for part in parts {
                    out.extend(part);
                }
                Ok(out)
            }
            MergeMode::Unordered => {
                let mut out = Vec::new();
                self.run_streaming(|t| out.push(t))?;
                Ok(out)
            }
        }
    }

    pub fn count(self) -> Result<usize> {
        let parts = self.run_partitions(|| 0usize, |n, _| *n += 1)?;
        Ok(parts.into_iter().sum())
    }

    /// Deliver every result to `f` on the calling thread.
    ///
    /// Results are buffered first, so `f` runs only after every job
    /// succeeded and never sees a partial result.
    pub fn for_each<F>(self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        for t in self.to_vec()? {
            f(t);
        }
        Ok(())
    }

    /// Run the query and expose the merged results as a sequential `Seq`.
    pub fn into_seq<'a>(self) -> Result<Seq<'a, T>>
    where
        T: Clone + 'a,
    {
        Ok(Seq::from_vec(self.to_vec()?))
    }

    fn prepare(self) -> Result<Option<(WorkerPool, Vec<Job<T>>)>> {
        let parts = self.config.partition_count(self.len);
        if parts == 0 {
            return Ok(None);
        }
        let pool = WorkerPool::new(&self.config)?;
        emit_span(
            "parallel.plan",
            &[
                ("source_len", self.len.to_string()),
                ("partitions", parts.to_string()),
                ("degree", pool.degree().to_string()),
                ("merge", format!("{:?}", self.config.merge)),
            ],
        );
        let jobs = (self.splitter)(parts);
        Ok(Some((pool, jobs)))
    }

    /// Fold each partition into its own accumulator; accumulators come back
    /// in partition order.
    fn run_partitions<A, I, S>(self, init: I, step: S) -> Result<Vec<A>>
    where
        A: Send,
        I: Fn() -> A + Sync,
        S: Fn(&mut A, T) + Sync,
    {
        let Some((pool, jobs)) = self.prepare()? else {
            return Ok(Vec::new());
        };
        let failure = Failure::default();
        let slots: Mutex<Vec<Option<A>>> =
            Mutex::new((0..jobs.len()).map(|_| None).collect());

        pool.scope(|s| {
            for (idx, work) in jobs.into_iter().enumerate() {
                let (init, step, failure, slots) = (&init, &step, &failure, &slots);
                s.spawn(move |_| {
                    let mut acc = init();
                    let outcome = work(&failure.cancel, &mut |t: T| {
                        step(&mut acc, t);
                        Ok(())
                    });
                    match outcome {
                        Ok(()) => {
                            let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                            slots[idx] = Some(acc);
                        }
                        Err(e) => failure.record(idx, e),
                    }
                });
            }
        });

        failure.into_result()?;
        let slots = slots.into_inner().unwrap_or_else(PoisonError::into_inner);
        emit_span("parallel.merged", &[("partitions", slots.len().to_string())]);
        Ok(slots.into_iter().flatten().collect())
    }

    /// Forward every produced element through a channel to `consume` on
    /// the calling thread while workers run.
    fn run_streaming<C>(self, mut consume: C) -> Result<()>
    where
        C: FnMut(T),
    {
        let Some((pool, jobs)) = self.prepare()? else {
            return Ok(());
        };
        let failure = Failure::default();
        let (tx, rx) = mpsc::channel::<T>();
        let partitions = jobs.len();

        pool.scope(|s| {
            for (idx, work) in jobs.into_iter().enumerate() {
                let tx = tx.clone();
                let failure = &failure;
                s.spawn(move |_| {
                    let outcome = work(&failure.cancel, &mut |t: T| {
                        tx.send(t)
                            .map_err(|_| SeqError::Worker("merge channel closed".to_string()))
                    });
                    if let Err(e) = outcome {
                        failure.record(idx, e);
                    }
                });
            }
            drop(tx);
            for t in rx {
                consume(t);
            }
        });

        failure.into_result()?;
        emit_span("parallel.merged", &[("partitions", partitions.to_string())]);
        Ok(())
    }
}

/// Cancellation flag plus the first error any job reported.
#[derive(Default)]
struct Failure {
    cancel: AtomicBool,
    first: Mutex<Option<SeqError>>,
}

impl Failure {
    fn record(&self, partition: usize, err: SeqError) {
        self.cancel.store(true, Ordering::SeqCst);
        let mut first = self.first.lock().unwrap_or_else(PoisonError::into_inner);
        if first.is_none() {
            emit_span(
                "parallel.worker_failed",
                &[
                    ("partition", partition.to_string()),
                    ("kind", err.kind().to_string()),
                ],
            );
            *first = Some(err);
        }
    }

    fn into_result(self) -> Result<()> {
        match self.first.into_inner().unwrap_or_else(PoisonError::into_inner) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Split into `parts` contiguous runs whose sizes differ by at most one.
fn split_contiguous<T>(mut items: Vec<T>, parts: usize) -> Vec<Vec<T>> {
    let parts = parts.max(1);
    let base = items.len() / parts;
    let extra = items.len() % parts;
    let mut out = Vec::with_capacity(parts);
    for i in (0..parts).rev() {
        let size = base + usize::from(i < extra);
        let at = items.len() - size;
        out.push(items.split_off(at));
    }
    out.reverse();
    out
}

/// Entry point from a sequential `Seq`.
pub trait AsParallel<T> {
    /// Buffer on the calling thread and hand the elements to a `ParallelQuery`.
    fn as_parallel(&self) -> Result<ParallelQuery<T>>;

    fn as_parallel_with(&self, config: ParallelConfig) -> Result<ParallelQuery<T>>;
}

impl<'a, T: Send + 'static> AsParallel<T> for Seq<'a, T> {
    fn as_parallel(&self) -> Result<ParallelQuery<T>> {
        ParallelQuery::from_seq(self)
    }

    fn as_parallel_with(&self, config: ParallelConfig) -> Result<ParallelQuery<T>> {
        Ok(ParallelQuery::from_seq(self)?.with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sizes_differ_by_at_most_one() {
        let runs = split_contiguous((0..10).collect::<Vec<_>>(), 3);
        let sizes: Vec<usize> = runs.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        let flat: Vec<i32> = runs.into_iter().flatten().collect();
        assert_eq!(flat, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn split_more_parts_than_items() {
        let runs = split_contiguous(vec![1, 2], 4);
        assert_eq!(runs.len(), 4);
        assert_eq!(runs.iter().map(Vec::len).sum::<usize>(), 2);
    }

    #[test]
    fn empty_source_runs_no_jobs() {
        let out = ParallelQuery::from_vec(Vec::<i32>::new())
            .map(|x| x + 1)
            .to_vec()
            .unwrap();
        assert!(out.is_empty());
    }
}
