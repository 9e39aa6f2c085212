//! Patch mean removal.

use ndarray::Array2;

/// Subtracts each row's mean from that row.
///
/// Input is a `(n_patches, fh * fw)` matrix of flattened patches.
/// Zero-mean patches carry local structure rather than absolute brightness.
pub fn remove_patch_mean(mut patches: Array2<f64>) -> Array2<f64> {
    for mut row in patches.rows_mut() {
        let mean = row.mean().unwrap_or(0.0);
        row.mapv_inplace(|v| v - mean);
    }
    patches
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    #[test]
    fn test_constant_rows_become_zero() {
        let centered = remove_patch_mean(array![[3.0, 3.0, 3.0], [-1.0, -1.0, -1.0]]);
        assert!(centered.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rows_are_independent() {
        let centered = remove_patch_mean(array![[0.0, 2.0], [10.0, 30.0]]);
        assert_eq!(centered, array![[-1.0, 1.0], [-10.0, 10.0]]);
    }

    #[test]
    fn test_empty_input() {
        let centered = remove_patch_mean(Array2::zeros((0, 4)));
        assert_eq!(centered.dim(), (0, 4));
    }

    proptest! {
        #[test]
        fn prop_row_means_are_zero(
            rows in 1usize..8,
            values in prop::collection::vec(-1000.0f64..1000.0, 1..64),
        ) {
            let cols = values.len();
            let data: Vec<f64> = (0..rows)
                .flat_map(|r| values.iter().map(move |v| v * (r as f64 + 1.0)))
                .collect();
            let patches = Array2::from_shape_vec((rows, cols), data).unwrap();
            let centered = remove_patch_mean(patches);
            for row in centered.rows() {
                prop_assert!(row.mean().unwrap().abs() < 1e-9);
            }
        }
    }
}
