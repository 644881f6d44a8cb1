//! Linear sum assignment.
//!
//! Minimum-cost one-to-one assignment between the rows and columns of a
//! cost matrix, solved with the Hungarian (Kuhn-Munkres) algorithm using
//! row/column potentials.
#![allow(clippy::needless_range_loop)]

use nalgebra::DMatrix;

/// Represents a match between a row index and column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub row_idx: usize,
    pub col_idx: usize,
}

/// Result of linear sum assignment.
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    /// Valid assignments (row, col pairs), ordered by row
    pub assignments: Vec<Assignment>,
}

/// Solve the linear sum assignment problem.
///
/// Finds the assignment of rows to columns that minimizes the total cost,
/// then drops pairs whose cost exceeds `max_cost`. Non-finite costs are
/// treated as forbidden: they are replaced by a cost larger than any sum of
/// finite entries, so the solver only uses them when nothing else fits, and
/// they are never reported as assignments.
///
/// # Arguments
/// * `cost_matrix` - Cost matrix where `(i, j)` is the cost of assigning row i to column j
/// * `max_cost` - Assignments with cost > max_cost are rejected
pub fn linear_sum_assignment(cost_matrix: &DMatrix<f64>, max_cost: f64) -> AssignmentResult {
    let num_rows = cost_matrix.nrows();
    let num_cols = cost_matrix.ncols();

    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult {
            assignments: Vec::new(),
        };
    }

    // Pad to square, replacing forbidden entries by a dominating finite cost
    let n = num_rows.max(num_cols);
    let largest = cost_matrix
        .iter()
        .filter(|c| c.is_finite())
        .fold(0.0_f64, |acc, c| acc.max(c.abs()));
    let forbidden = (largest + 1.0) * (n as f64 + 1.0);

    let padded = DMatrix::from_fn(n, n, |i, j| {
        if i < num_rows && j < num_cols {
            let c = cost_matrix[(i, j)];
            if c.is_finite() {
                c
            } else {
                forbidden
            }
        } else {
            0.0
        }
    });

    let row_assignments = hungarian_algorithm(&padded);

    let mut assignments = Vec::new();

    for (row_idx, col_idx) in row_assignments.into_iter().enumerate().take(num_rows) {
        let Some(col) = col_idx else { continue };
        if col >= num_cols {
            continue;
        }
        let cost = cost_matrix[(row_idx, col)];
        if cost.is_finite() && cost <= max_cost {
            assignments.push(Assignment {
                row_idx,
                col_idx: col,
            });
        }
    }

    AssignmentResult { assignments }
}

/// Hungarian algorithm on a square matrix of finite costs.
///
/// Returns a vector where result[i] = Some(j) means row i is assigned to column j.
fn hungarian_algorithm(cost: &DMatrix<f64>) -> Vec<Option<usize>> {
    let n = cost.nrows();

    // 1-indexed potentials; column 0 is a virtual column used to seed each row
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    // p[j] = row (1-indexed) currently assigned to column j, 0 if none
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0;
        let mut minv = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        // Grow the alternating tree until a free column is reached
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost[(i0 - 1, j - 1)] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Augment along the recorded path
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut row_match = vec![None; n];
    for j in 1..=n {
        if p[j] != 0 {
            row_match[p[j] - 1] = Some(j - 1);
        }
    }
    row_match
}
