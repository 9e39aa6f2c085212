//! Binary hashing of second-layer feature maps.

use ndarray::{Array3, ArrayBase, ArrayView4, Axis, DataMut, Dimension, Zip};

/// Maps every positive value to 1 and everything else (including 0 and NaN) to 0.
pub fn binarize<S, D>(maps: &mut ArrayBase<S, D>)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    maps.mapv_inplace(|v| if v > 0.0 { 1.0 } else { 0.0 });
}

/// Packs `(n_images, L2, h, w)` bit maps into `(n_images, h, w)` codes.
///
/// Map 0 is the most significant bit: the code is
/// `sum(bit[b] * 2^(L2 - 1 - b))`. A value counts as a set bit when it is
/// positive.
///
/// Callers keep `L2` at or below [`MAX_L2_OUTPUT`](crate::config::MAX_L2_OUTPUT).
pub(crate) fn binary_to_decimal(bits: ArrayView4<'_, f64>) -> Array3<u32> {
    let (n_images, n_bits, height, width) = bits.dim();
    debug_assert!(n_bits <= 32, "cannot pack {} bit maps into u32 codes", n_bits);

    let mut codes = Array3::<u32>::zeros((n_images, height, width));
    for (b, plane) in bits.axis_iter(Axis(1)).enumerate() {
        let weight = 1u32 << (n_bits - 1 - b);
        Zip::from(&mut codes).and(&plane).for_each(|code, &bit| {
            if bit > 0.0 {
                *code |= weight;
            }
        });
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array4};
    use proptest::prelude::*;

    #[test]
    fn test_zero_maps_to_zero() {
        let mut maps = array![[-1.5, 0.0], [1e-12, 3.0]];
        binarize(&mut maps);
        assert_eq!(maps, array![[0.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_nan_maps_to_zero() {
        let mut maps = array![f64::NAN, -0.0];
        binarize(&mut maps);
        assert_eq!(maps, array![0.0, 0.0]);
    }

    #[test]
    fn test_msb_first_packing() {
        // one image, L2 = 3, 1x1 map: bits [1, 0, 1] -> 5
        let bits = Array4::from_shape_vec((1, 3, 1, 1), vec![1.0, 0.0, 1.0]).unwrap();
        let codes = binary_to_decimal(bits.view());
        assert_eq!(codes.dim(), (1, 1, 1));
        assert_eq!(codes[[0, 0, 0]], 5);
    }

    #[test]
    fn test_images_decoded_independently() {
        let mut bits = Array4::<f64>::zeros((2, 2, 1, 2));
        bits[[0, 0, 0, 0]] = 1.0; // image 0, msb, pixel 0
        bits[[1, 1, 0, 1]] = 1.0; // image 1, lsb, pixel 1
        bits[[1, 0, 0, 1]] = 1.0; // image 1, msb, pixel 1

        let codes = binary_to_decimal(bits.view());
        assert_eq!(codes, array![[[2, 0]], [[0, 3]]]);
    }

    #[test]
    fn test_permuted_view_packs() {
        // (L2, n_images, h, w) viewed as (n_images, L2, h, w)
        let mut stack = Array4::<f64>::zeros((2, 1, 1, 1));
        stack[[1, 0, 0, 0]] = 1.0;
        let codes = binary_to_decimal(stack.view().permuted_axes([1, 0, 2, 3]));
        assert_eq!(codes[[0, 0, 0]], 1);
    }

    proptest! {
        #[test]
        fn prop_binarize_range(values in prop::collection::vec(-1e6f64..1e6, 1..128)) {
            let mut maps = ndarray::Array1::from(values);
            binarize(&mut maps);
            prop_assert!(maps.iter().all(|&v| v == 0.0 || v == 1.0));
        }

        #[test]
        fn prop_codes_in_range(n_bits in 1usize..9, seed in 0u64..1000) {
            let bits = Array4::from_shape_fn((2, n_bits, 3, 3), |(i, b, y, x)| {
                (((seed as usize + i * 31 + b * 17 + y * 7 + x) % 3) == 0) as u8 as f64
            });
            let codes = binary_to_decimal(bits.view());
            prop_assert!(codes.iter().all(|&c| (c as usize) < (1usize << n_bits)));
        }
    }
}
