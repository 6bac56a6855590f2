//! # Neighbor Finder
//!
//! Exact k-nearest-neighbor search over an embedding by brute force.
//!
//! For every point the full row of Euclidean distances is computed and the
//! other points are ranked by `(distance, index)`. Ranking by index on equal
//! distance is part of the output contract: two implementations given the
//! same points must produce the same lists.
//!
//! The outer loop over points runs on rayon. Each point only reads the shared
//! point slice and produces its own list, so no locking is involved and the
//! collected result is identical to a sequential run.

use crate::{PixnetError, Point};
use rayon::prelude::*;
use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// =============================================================================
// CANCELLATION
// =============================================================================

/// Cooperative cancellation flag for long neighbor searches.
///
/// Checked before each point, never in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// =============================================================================
// DISTANCE
// =============================================================================

/// Euclidean distance between two coordinate slices of equal length.
#[must_use]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Check that all points share one dimensionality and are finite.
///
/// Returns the dimensionality (0 for an empty slice).
pub fn validate_points(points: &[Point]) -> Result<usize, PixnetError> {
    let Some(first) = points.first() else {
        return Ok(0);
    };
    let expected = first.dims();

    for (index, point) in points.iter().enumerate() {
        if point.dims() != expected {
            return Err(PixnetError::DimensionMismatch {
                index,
                expected,
                found: point.dims(),
            });
        }
        if !point.is_finite() {
            return Err(PixnetError::NonFiniteCoordinate { index });
        }
    }

    Ok(expected)
}

// =============================================================================
// SEARCH
// =============================================================================

/// Find the `k` nearest other points of every point.
///
/// Each returned list has length `min(k, N - 1)`, is ordered by ascending
/// distance (ties by lower index) and never contains the point itself.
pub fn find_neighbors(points: &[Point], k: usize) -> Result<Vec<Vec<usize>>, PixnetError> {
    find_neighbors_with_cancel(points, k, &CancelToken::new())
}

/// [`find_neighbors`] with a cancellation check before each point.
pub fn find_neighbors_with_cancel(
    points: &[Point],
    k: usize,
    cancel: &CancelToken,
) -> Result<Vec<Vec<usize>>, PixnetError> {
    search(points, k, cancel, |_| {})
}

/// The search loop. `on_point_done` receives the running count of finished
/// points.
fn search<F>(
    points: &[Point],
    k: usize,
    cancel: &CancelToken,
    on_point_done: F,
) -> Result<Vec<Vec<usize>>, PixnetError>
where
    F: Fn(usize) + Sync,
{
    validate_points(points)?;

    let n = points.len();
    let take = k.min(n.saturating_sub(1));
    if take == 0 {
        return Ok(vec![Vec::new(); n]);
    }

    let completed = AtomicUsize::new(0);
    let rows: Vec<Option<Vec<usize>>> = (0..n)
        .into_par_iter()
        .map(|i| {
            if cancel.is_cancelled() {
                return None;
            }
            let row = ranked_row(points, i, take);
            on_point_done(completed.fetch_add(1, Ordering::Relaxed) + 1);
            Some(row)
        })
        .collect();

    rows.into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PixnetError::Cancelled {
            completed: completed.load(Ordering::Relaxed),
        })
}

fn by_distance_then_index(a: &(f64, usize), b: &(f64, usize)) -> CmpOrdering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// The `take` closest other points to `points[i]`.
///
/// The point itself is filtered out by index rather than by dropping the
/// first entry, so a coincident point with a lower index cannot push it
/// into its own list.
fn ranked_row(points: &[Point], i: usize, take: usize) -> Vec<usize> {
    let origin = points[i].coords();

    let mut row: Vec<(f64, usize)> = points
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(j, p)| (euclidean(origin, p.coords()), j))
        .collect();

    if take < row.len() {
        row.select_nth_unstable_by(take - 1, by_distance_then_index);
        row.truncate(take);
    }
    row.sort_unstable_by(by_distance_then_index);

    row.into_iter().map(|(_, j)| j).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_outlier() -> Vec<Point> {
        vec![
            Point::xy(0.0, 0.0),
            Point::xy(1.0, 0.0),
            Point::xy(0.0, 1.0),
            Point::xy(5.0, 5.0),
        ]
    }

    #[test]
    fn equal_distances_rank_lower_index_first() {
        let lists = find_neighbors(&square_with_outlier(), 2).expect("search");

        assert_eq!(lists[0], vec![1, 2]);
        // (0,1) and (1,0) are equidistant from (5,5): index 1 before index 2
        assert_eq!(lists[3], vec![1, 2]);
    }

    #[test]
    fn all_candidates_returned_in_distance_order() {
        let lists = find_neighbors(&square_with_outlier(), 3).expect("search");
        assert_eq!(lists[3], vec![1, 2, 0]);
    }

    #[test]
    fn k_larger_than_population_is_capped() {
        let lists = find_neighbors(&square_with_outlier(), 50).expect("search");
        assert!(lists.iter().all(|l| l.len() == 3));
    }

    #[test]
    fn single_point_has_no_neighbors() {
        let lists = find_neighbors(&[Point::xy(1.0, 1.0)], 10).expect("search");
        assert_eq!(lists, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let lists = find_neighbors(&[], 10).expect("search");
        assert!(lists.is_empty());
    }

    #[test]
    fn zero_k_yields_empty_lists() {
        let lists = find_neighbors(&square_with_outlier(), 0).expect("search");
        assert_eq!(lists.len(), 4);
        assert!(lists.iter().all(Vec::is_empty));
    }

    #[test]
    fn coincident_points_never_list_themselves() {
        let points = vec![
            Point::xy(2.0, 2.0),
            Point::xy(2.0, 2.0),
            Point::xy(2.0, 2.0),
        ];
        let lists = find_neighbors(&points, 2).expect("search");

        assert_eq!(lists[0], vec![1, 2]);
        assert_eq!(lists[1], vec![0, 2]);
        assert_eq!(lists[2], vec![0, 1]);
    }

    #[test]
    fn scalene_triangle_is_not_symmetric() {
        let points = vec![
            Point::xy(0.0, 0.0),
            Point::xy(1.0, 0.0),
            Point::xy(3.0, 0.5),
        ];
        let lists = find_neighbors(&points, 1).expect("search");

        assert_eq!(lists[2], vec![1]);
        assert_eq!(lists[1], vec![0]);
        assert!(!lists[1].contains(&2));
    }

    #[test]
    fn higher_dimensions_supported() {
        let points = vec![
            Point::new(vec![0.0, 0.0, 0.0]),
            Point::new(vec![0.0, 0.0, 3.0]),
            Point::new(vec![0.0, 1.0, 0.0]),
        ];
        let lists = find_neighbors(&points, 1).expect("search");
        assert_eq!(lists[0], vec![2]);
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let points = vec![Point::xy(0.0, 0.0), Point::new(vec![1.0, 2.0, 3.0])];
        let result = find_neighbors(&points, 1);
        assert!(matches!(
            result,
            Err(PixnetError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn non_finite_rejected() {
        let points = vec![Point::xy(0.0, 0.0), Point::xy(f64::NAN, 1.0)];
        let result = find_neighbors(&points, 1);
        assert!(matches!(
            result,
            Err(PixnetError::NonFiniteCoordinate { index: 1 })
        ));
    }

    #[test]
    fn cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = find_neighbors_with_cancel(&square_with_outlier(), 2, &cancel);
        assert!(matches!(
            result,
            Err(PixnetError::Cancelled { completed: 0 })
        ));
    }

    fn cancel_after(threads: usize, after: usize) -> Result<Vec<Vec<usize>>, PixnetError> {
        let points: Vec<Point> = (0..64).map(|i| Point::xy(i as f64, 0.0)).collect();
        let cancel = CancelToken::new();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("pool");
        pool.install(|| {
            search(&points, 3, &cancel, |done| {
                if done == after {
                    cancel.cancel();
                }
            })
        })
    }

    #[test]
    fn cancelled_between_points() {
        let result = cancel_after(1, 5);
        assert!(matches!(result, Err(PixnetError::Cancelled { completed: 5 })));
    }

    #[test]
    fn cancelled_mid_search_on_many_threads() {
        // Points already past the check still finish.
        let result = cancel_after(4, 5);
        assert!(matches!(
            result,
            Err(PixnetError::Cancelled { completed }) if (5..64).contains(&completed)
        ));
    }

    #[test]
    fn cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn euclidean_distance() {
        assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert_eq!(euclidean(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }
}
