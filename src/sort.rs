//! Partial ordering primitives for bulk loading.
//!
//! Bulk loading never needs fully sorted input, only runs of a given length
//! that are ordered *between* each other. [`bucket_sort`] produces exactly
//! that by divide-and-conquer over [`select`], a Floyd–Rivest selection that
//! places the k-th order statistic at position k in expected linear time.
//! This is what keeps a build level at `O(N log(N/M))` instead of
//! `O(N log N)`.

/// Swap-based access to a sequence, in the spirit of a sort interface:
/// the algorithms below never read element values, only compare positions
/// and swap them.
pub trait Sortable {
    fn len(&self) -> usize;

    /// True if the element at `i` orders strictly before the element at `j`.
    fn less(&self, i: usize, j: usize) -> bool;

    fn swap(&mut self, i: usize, j: usize);
}

/// Above this interval width, selection first recurses into a sampled
/// sub-interval around k before partitioning.
const SAMPLING_THRESHOLD: isize = 600;

/// Partially sort `[left, right]` (inclusive) so that the element at `k` is
/// the one a full sort would put there, everything before `k` orders at or
/// below it, and everything after orders at or above it.
pub fn select<A: Sortable + ?Sized>(a: &mut A, k: usize, left: usize, right: usize) {
    debug_assert!(left <= k && k <= right && right < a.len());
    select_in(a, k as isize, left as isize, right as isize);
}

fn select_in<A: Sortable + ?Sized>(a: &mut A, k: isize, mut left: isize, mut right: isize) {
    while right > left {
        if right - left > SAMPLING_THRESHOLD {
            // Floyd-Rivest sampling: narrow to an interval that contains the
            // k-th element with high probability, then partition only that.
            let n = (right - left + 1) as f64;
            let m = (k - left + 1) as f64;
            let z = n.ln();
            let s = 0.5 * (2.0 * z / 3.0).exp();
            let sign = if m - n / 2.0 < 0.0 { -1.0 } else { 1.0 };
            let sd = 0.5 * (z * s * (n - s) / n).sqrt() * sign;
            let new_left = left.max((k as f64 - m * s / n + sd).floor() as isize);
            let new_right = right.min((k as f64 + (n - m) * s / n + sd).floor() as isize);
            select_in(a, k, new_left, new_right);
        }

        // Hoare partition around the element currently at k. The interface
        // is swap-only, so the pivot is tracked by position across swaps.
        let mut pivot = k;
        let mut i = left;
        let mut j = right;

        swap_tracked(a, &mut pivot, left, k);
        if less(a, pivot, right) {
            swap_tracked(a, &mut pivot, left, right);
        }

        while i < j {
            swap_tracked(a, &mut pivot, i, j);
            i += 1;
            j -= 1;
            while i < a.len() as isize && less(a, i, pivot) {
                i += 1;
            }
            while j >= 0 && less(a, pivot, j) {
                j -= 1;
            }
        }

        if !less(a, left, pivot) && !less(a, pivot, left) {
            swap_tracked(a, &mut pivot, left, j);
        } else {
            j += 1;
            swap_tracked(a, &mut pivot, j, right);
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            right = j - 1;
        }
    }
}

fn less<A: Sortable + ?Sized>(a: &A, i: isize, j: isize) -> bool {
    a.less(i as usize, j as usize)
}

fn swap_tracked<A: Sortable + ?Sized>(a: &mut A, pivot: &mut isize, i: isize, j: isize) {
    if i == j {
        return;
    }
    a.swap(i as usize, j as usize);
    if *pivot == i {
        *pivot = j;
    } else if *pivot == j {
        *pivot = i;
    }
}

/// Reorder `[left, right]` (inclusive) so that every `run`-length chunk,
/// aligned to multiples of `run` from `left`, is ordered relative to the
/// chunks around it. Elements inside a chunk stay unordered.
pub fn bucket_sort<A: Sortable + ?Sized>(a: &mut A, run: usize, left: usize, right: usize) {
    debug_assert!(run > 0);
    let mut pending = vec![(left, right)];

    while let Some((lo, hi)) = pending.pop() {
        if hi - lo <= run {
            continue;
        }
        // max(..) keeps the cut aligned when the interval is under two runs
        let mid = lo + ((hi - lo) / run / 2).max(1) * run;
        select(a, mid, lo, hi);
        pending.push((lo, mid));
        pending.push((mid, hi));
    }
}
