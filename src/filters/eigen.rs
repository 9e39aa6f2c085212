//! Eigen decomposition of small symmetric matrices.
//!
//! Patch covariance matrices are at most a few hundred rows wide, so a
//! cyclic Jacobi sweep is accurate and fast enough.

use ndarray::{Array1, Array2};

const MAX_SWEEPS: usize = 64;
const TOLERANCE: f64 = 1e-12;

/// Returns `(eigenvalues, eigenvectors)` of a symmetric matrix.
///
/// Eigenvector `i` is column `i` of the returned matrix. No ordering is
/// applied. Only the upper triangle is trusted to be symmetric with the
/// lower one.
pub(crate) fn symmetric_eigen(matrix: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = matrix.nrows();
    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);

    let scale = a.iter().map(|x| x * x).sum::<f64>().sqrt();

    for _ in 0..MAX_SWEEPS {
        let off_diagonal = off_diagonal_norm(&a);
        if off_diagonal <= TOLERANCE * scale {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }

                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}

fn off_diagonal_norm(a: &Array2<f64>) -> f64 {
    a.indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, x)| x * x)
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_diagonal_matrix_unchanged() {
        let (values, vectors) = symmetric_eigen(&array![[3.0, 0.0], [0.0, 1.0]]);
        assert_eq!(values, array![3.0, 1.0]);
        assert_eq!(vectors, Array2::eye(2));
    }

    #[test]
    fn test_two_by_two() {
        // Eigenvalues 3 and 1 with eigenvectors (1, 1) and (1, -1).
        let matrix = array![[2.0, 1.0], [1.0, 2.0]];
        let (values, vectors) = symmetric_eigen(&matrix);

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert!((sorted[0] - 3.0).abs() < 1e-10);
        assert!((sorted[1] - 1.0).abs() < 1e-10);

        for i in 0..2 {
            let column = vectors.column(i);
            let image = matrix.dot(&column);
            for k in 0..2 {
                assert!((image[k] - values[i] * column[k]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_reconstruction() {
        let matrix = array![
            [4.0, 1.0, -2.0, 2.0],
            [1.0, 2.0, 0.0, 1.0],
            [-2.0, 0.0, 3.0, -2.0],
            [2.0, 1.0, -2.0, -1.0],
        ];
        let (values, vectors) = symmetric_eigen(&matrix);

        let rebuilt = vectors.dot(&Array2::from_diag(&values)).dot(&vectors.t());
        for (a, b) in rebuilt.iter().zip(matrix.iter()) {
            assert!((a - b).abs() < 1e-9);
        }

        let gram = vectors.t().dot(&vectors);
        for ((i, j), &x) in gram.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((x - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn test_zero_matrix() {
        let (values, vectors) = symmetric_eigen(&Array2::zeros((3, 3)));
        assert!(values.iter().all(|&v| v == 0.0));
        assert_eq!(vectors, Array2::eye(3));
    }
}
