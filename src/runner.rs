//! Execution of a [`CombineFn`] over a batch of inputs.
//!
//! [`ExecMode::Sequential`] folds every input into one accumulator.
//! [`ExecMode::Parallel`] splits the input into partitions, accumulates each
//! partition on the rayon pool, then merges the partials in rounds of at most
//! `fanout` accumulators until one remains. Because every accumulator in this
//! crate merges associatively and commutatively, both modes produce the same
//! result (exactly for metrics, within the sketch error for distributions).

use crate::combiners::CombineFn;
use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    Sequential,
    /// `threads` sizes a dedicated pool (the global pool when `None`);
    /// `partitions` overrides [`Runner::default_partitions`].
    Parallel {
        threads: Option<usize>,
        partitions: Option<usize>,
    },
}

pub struct Runner {
    pub mode: ExecMode,
    pub default_partitions: usize,
    /// Most accumulators merged together in one round; `None` merges all
    /// partials in a single round.
    pub fanout: Option<usize>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: None,
            },
            default_partitions: 2 * num_cpus::get().max(2),
            fanout: None,
        }
    }
}

impl Runner {
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            mode: ExecMode::Sequential,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn parallel(partitions: usize) -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: Some(partitions),
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_fanout(mut self, fanout: usize) -> Self {
        self.fanout = Some(fanout);
        self
    }

    /// Accumulate `input` with `comb` and return the finished output.
    pub fn combine<C, V, A, O>(&self, comb: &C, input: Vec<V>) -> Result<O>
    where
        C: CombineFn<V, A, O>,
        V: Send,
        A: Send,
    {
        match self.mode {
            ExecMode::Sequential => {
                let mut acc = comb.create();
                for v in input {
                    comb.add_input(&mut acc, v);
                }
                Ok(comb.finish(acc))
            }
            ExecMode::Parallel { partitions, .. } => {
                let parts = partitions.unwrap_or(self.default_partitions);
                self.combine_partitions(comb, split_vec(input, parts))
            }
        }
    }

    /// Accumulate pre-partitioned input, one accumulator per partition, and
    /// merge the partials. In sequential mode the partitions are folded in
    /// order on the calling thread.
    pub fn combine_partitions<C, V, A, O>(&self, comb: &C, partitions: Vec<Vec<V>>) -> Result<O>
    where
        C: CombineFn<V, A, O>,
        V: Send,
        A: Send,
    {
        let local = |part: Vec<V>| {
            let mut acc = comb.create();
            for v in part {
                comb.add_input(&mut acc, v);
            }
            acc
        };

        let merged = match self.mode {
            ExecMode::Sequential => {
                let partials = partitions.into_iter().map(local).collect();
                reduce_sequential::<C, V, A, O>(comb, partials)
            }
            ExecMode::Parallel { threads, .. } => {
                debug!(partitions = partitions.len(), fanout = ?self.fanout, "parallel combine");
                let run = || {
                    let partials: Vec<A> = partitions.into_par_iter().map(local).collect();
                    reduce_partials::<C, V, A, O>(comb, partials, self.fanout)
                };
                match threads {
                    Some(t) => rayon::ThreadPoolBuilder::new()
                        .num_threads(t)
                        .build()
                        .context("failed to build combine thread pool")?
                        .install(run),
                    None => run(),
                }
            }
        };
        Ok(comb.finish(merged))
    }
}

/// Merge `partials` left to right.
fn reduce_sequential<C, V, A, O>(comb: &C, partials: Vec<A>) -> A
where
    C: CombineFn<V, A, O>,
{
    let mut it = partials.into_iter();
    let mut acc = it.next().unwrap_or_else(|| comb.create());
    for p in it {
        comb.merge(&mut acc, p);
    }
    acc
}

/// Tree-merge `partials`, at most `fanout` per group per round, groups merged
/// in parallel.
fn reduce_partials<C, V, A, O>(comb: &C, mut partials: Vec<A>, fanout: Option<usize>) -> A
where
    C: CombineFn<V, A, O>,
    A: Send,
{
    let fanout = fanout.unwrap_or(usize::MAX).max(2);
    let mut round = 0usize;
    while partials.len() > 1 {
        round += 1;
        debug!(round, partials = partials.len(), "merge round");
        partials = split_chunks(partials, fanout)
            .into_par_iter()
            .map(|group| reduce_sequential::<C, V, A, O>(comb, group))
            .collect();
    }
    partials.pop().unwrap_or_else(|| comb.create())
}

/// Split into at most `n` contiguous, near-equal partitions.
fn split_vec<T>(v: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let len = v.len();
    if n <= 1 || len <= 1 {
        return vec![v];
    }
    split_chunks(v, len.div_ceil(n))
}

/// Split into contiguous chunks of `size` (the last may be shorter).
fn split_chunks<T>(mut v: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let mut out = Vec::with_capacity(v.len().div_ceil(size.max(1)));
    while v.len() > size {
        let tail = v.split_off(size);
        out.push(v);
        v = tail;
    }
    out.push(v);
    out
}
