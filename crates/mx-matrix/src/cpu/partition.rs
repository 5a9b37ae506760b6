//! Row partitioning and the scoped parallel-for that runs one worker per block.
//!
//! Each worker receives a disjoint `&mut` block of the output, carved off
//! with `split_at_mut` in partition order. No two workers can alias the same
//! row, so the compute path takes no locks.

use std::ops::Range;
use std::thread;

use crate::error::{MatrixError, Result};

/// Split `[0, dimension)` into at most `workers` contiguous row ranges.
///
/// The worker count is clamped to `dimension`. The first
/// `dimension % workers` ranges get one extra row. Ranges are returned in
/// increasing order and tile `[0, dimension)` exactly once. A dimension of
/// zero yields no ranges.
///
/// # Errors
/// Returns `InvalidArgument` if `workers == 0`.
pub fn partition_rows(dimension: usize, workers: usize) -> Result<Vec<Range<usize>>> {
    if workers == 0 {
        return Err(MatrixError::InvalidArgument(
            "worker count must be positive".to_string(),
        ));
    }
    if dimension == 0 {
        return Ok(Vec::new());
    }

    let workers = workers.min(dimension);
    let base = dimension / workers;
    let remainder = dimension % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for w in 0..workers {
        let end = start + base + usize::from(w < remainder);
        ranges.push(start..end);
        start = end;
    }
    Ok(ranges)
}

/// Run `work` once per range on its own scoped thread.
///
/// `out` is a row-major buffer with rows of `row_len` elements; worker `w`
/// gets the rows of `ranges[w]` as its exclusive block. `ranges` must be
/// ascending and contiguous from row 0, as produced by [`partition_rows`].
///
/// Every spawned thread is joined before this returns, including when a
/// later spawn fails. A failed spawn or a panicking worker surfaces as
/// `Runtime`.
pub(crate) fn parallel_for_rows<F>(
    out: &mut [f64],
    row_len: usize,
    ranges: &[Range<usize>],
    work: F,
) -> Result<()>
where
    F: Fn(Range<usize>, &mut [f64]) + Sync,
{
    let work = &work;
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(ranges.len());
        let mut spawn_error = None;
        let mut rest = out;

        for (worker, range) in ranges.iter().enumerate() {
            let (block, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * row_len);
            rest = tail;
            let range = range.clone();

            tracing::trace!(worker, rows = ?range, "spawning row worker");
            let spawned = thread::Builder::new()
                .name(format!("mx-worker-{}", worker))
                .spawn_scoped(scope, move || work(range, block));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(MatrixError::Runtime(format!(
                        "failed to spawn worker {}: {}",
                        worker, e
                    )));
                    break;
                }
            }
        }

        // Join everything that started, whatever happened above.
        let mut join_error = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && join_error.is_none() {
                join_error = Some(MatrixError::Runtime(format!(
                    "worker {} panicked",
                    worker
                )));
            }
        }

        match spawn_error.or(join_error) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(ranges: &[Range<usize>]) -> Vec<usize> {
        ranges.iter().map(|r| r.len()).collect()
    }

    #[test]
    fn test_partition_ten_by_three() {
        let ranges = partition_rows(10, 3).unwrap();
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
        assert_eq!(sizes(&ranges), vec![4, 3, 3]);
    }

    #[test]
    fn test_partition_even_split() {
        assert_eq!(partition_rows(8, 4).unwrap(), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn test_partition_clamps_workers_to_dimension() {
        let ranges = partition_rows(3, 8).unwrap();
        assert_eq!(ranges, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_partition_zero_dimension() {
        assert!(partition_rows(0, 4).unwrap().is_empty());
    }

    #[test]
    fn test_partition_zero_workers() {
        assert!(matches!(
            partition_rows(10, 0),
            Err(MatrixError::InvalidArgument(_))
        ));
        assert!(matches!(
            partition_rows(0, 0),
            Err(MatrixError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_partition_tiles_every_row_once() {
        for dimension in 0..40 {
            for workers in 1..12 {
                let ranges = partition_rows(dimension, workers).unwrap();
                assert_eq!(ranges.len(), workers.min(dimension));

                let mut owner = vec![0usize; dimension];
                let mut expected_start = 0;
                for r in &ranges {
                    assert_eq!(r.start, expected_start, "gap or overlap at {}", r.start);
                    assert!(!r.is_empty());
                    for row in r.clone() {
                        owner[row] += 1;
                    }
                    expected_start = r.end;
                }
                assert_eq!(expected_start, dimension);
                assert!(owner.iter().all(|&count| count == 1));

                // Sizes differ by at most one, larger blocks first.
                let s = sizes(&ranges);
                assert!(s.windows(2).all(|w| w[0] >= w[1] && w[0] - w[1] <= 1));
            }
        }
    }

    #[test]
    fn test_parallel_for_writes_disjoint_blocks() {
        let row_len = 3;
        let ranges = partition_rows(7, 3).unwrap();
        let mut out = vec![0.0; 7 * row_len];
        parallel_for_rows(&mut out, row_len, &ranges, |rows, block| {
            assert_eq!(block.len(), rows.len() * row_len);
            for (local, row) in rows.enumerate() {
                for v in &mut block[local * row_len..(local + 1) * row_len] {
                    *v = row as f64;
                }
            }
        })
        .unwrap();

        for (row, chunk) in out.chunks(row_len).enumerate() {
            assert!(chunk.iter().all(|&v| v == row as f64));
        }
    }

    #[test]
    fn test_parallel_for_worker_panic_is_runtime_error() {
        let ranges = partition_rows(4, 2).unwrap();
        let mut out = vec![0.0; 4];
        let result = parallel_for_rows(&mut out, 1, &ranges, |rows, block| {
            if rows.start == 2 {
                panic!("boom");
            }
            block.fill(1.0);
        });
        assert!(matches!(result, Err(MatrixError::Runtime(_))));
        // The healthy worker still ran to completion.
        assert_eq!(&out[..2], &[1.0, 1.0]);
    }
}
