//! Execution targets for grid construction and solver phases.
//!
//! Every phase of the solver is data-parallel over an index space. An
//! [`Architecture`] decides whether that index space is walked serially or
//! split across the rayon thread pool. Dispatch functions return only after
//! every task has finished, which is the synchronisation point between
//! dependent phases.

use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Where data-parallel phases execute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// Single-threaded execution on the calling thread.
    #[default]
    Cpu,
    /// Multithreaded execution on the rayon pool (feature `parallel`).
    ///
    /// Without the feature this behaves like [`Architecture::Cpu`].
    Multicore,
}

impl Architecture {
    /// True if phases are actually dispatched to the thread pool.
    #[inline]
    pub fn is_parallel(&self) -> bool {
        matches!(self, Architecture::Multicore) && cfg!(feature = "parallel")
    }

    /// Resolve the requested architecture against the compiled features.
    pub(crate) fn resolve(self) -> Self {
        if matches!(self, Architecture::Multicore) && !cfg!(feature = "parallel") {
            log::warn!("Multicore requested but the `parallel` feature is disabled; running on Cpu");
            return Architecture::Cpu;
        }
        self
    }

    /// Fill `out[n] = f(n)` for every linear index.
    pub fn fill_indexed<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        if self.is_parallel() {
            out.par_iter_mut().enumerate().for_each(|(n, v)| *v = f(n));
            return;
        }

        for (n, v) in out.iter_mut().enumerate() {
            *v = f(n);
        }
    }

    /// Run `f(index, chunk, scratch)` over consecutive chunks of `data`, with
    /// one `scratch` vector of length `scratch_len` per worker.
    ///
    /// Chunks are disjoint, so tasks carry no ordering guarantee.
    pub fn for_each_chunk_mut<T, F>(&self, chunk: usize, data: &mut [T], scratch_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T], &mut [f64]) + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        if self.is_parallel() {
            data.par_chunks_mut(chunk).enumerate().for_each_init(
                || vec![0.0; scratch_len],
                |scratch, (n, c)| f(n, c, scratch),
            );
            return;
        }

        let mut scratch = vec![0.0; scratch_len];
        for (n, c) in data.chunks_mut(chunk).enumerate() {
            f(n, c, &mut scratch);
        }
    }

    /// Sum of all values, split across workers when parallel.
    pub fn sum(&self, values: &[f64]) -> f64 {
        #[cfg(feature = "parallel")]
        if self.is_parallel() {
            return values.par_iter().sum::<f64>();
        }

        values.iter().sum()
    }

    /// Add `shift` to every value.
    pub fn shift(&self, values: &mut [f64], shift: f64) {
        #[cfg(feature = "parallel")]
        if self.is_parallel() {
            values.par_iter_mut().for_each(|v| *v += shift);
            return;
        }

        values.iter_mut().for_each(|v| *v += shift);
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Cpu => write!(f, "Cpu"),
            Architecture::Multicore => write!(f, "Multicore"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCHS: [Architecture; 2] = [Architecture::Cpu, Architecture::Multicore];

    #[test]
    fn test_fill_indexed() {
        for arch in ARCHS {
            let mut out = vec![0.0; 100];
            arch.fill_indexed(&mut out, |n| 2.0 * n as f64);
            assert_eq!(out[0], 0.0);
            assert_eq!(out[99], 198.0);
        }
    }

    #[test]
    fn test_chunks_see_scratch() {
        for arch in ARCHS {
            let mut data = vec![1.0; 9];
            arch.for_each_chunk_mut(3, &mut data, 3, |c, chunk, scratch| {
                assert_eq!(scratch.len(), 3);
                for (v, s) in chunk.iter_mut().zip(scratch.iter_mut()) {
                    *s = *v + c as f64;
                    *v = 2.0 * *s;
                }
            });
            assert_eq!(data, vec![2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 6.0, 6.0, 6.0]);
        }
    }

    #[test]
    fn test_sum_and_shift() {
        for arch in ARCHS {
            let mut v: Vec<f64> = (1..=10).map(|n| n as f64).collect();
            assert_eq!(arch.sum(&v), 55.0);
            arch.shift(&mut v, -5.5);
            assert!(arch.sum(&v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_resolve_keeps_cpu() {
        assert_eq!(Architecture::Cpu.resolve(), Architecture::Cpu);
        assert!(!Architecture::Cpu.is_parallel());
    }
}
