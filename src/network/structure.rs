//! Structural validation: every stage must tile its input exactly.

use super::error::{NetworkError, Stage};
use crate::config::{NetworkConfig, Shape};
use crate::extraction::steps;

/// Checks that no stage of `config` leaves unvisited margin pixels.
///
/// Propagates the image shape through both convolution layers and the
/// block tiling. A stage is valid when its last window ends exactly on the
/// input's last row and column.
pub fn validate_structure(config: &NetworkConfig) -> Result<(), NetworkError> {
    let l1 = check_tiling(
        Stage::First,
        config.image_shape,
        config.filter_shape_l1,
        config.step_shape_l1,
    )?;
    let l2 = check_tiling(Stage::Second, l1, config.filter_shape_l2, config.step_shape_l2)?;
    check_tiling(Stage::Pooling, l2, config.block_shape, config.block_shape)?;
    Ok(())
}

/// Returns the stage's output shape if its grid covers `input` exactly.
fn check_tiling(stage: Stage, input: Shape, filter: Shape, step: Shape) -> Result<Shape, NetworkError> {
    let grid = steps(input, filter, step);
    match grid.covered(filter) {
        Some(covered) if covered == input => Ok(grid.output_shape()),
        covered => Err(NetworkError::StructuralInvalidity {
            stage,
            input,
            covered: covered.unwrap_or(Shape::new(0, 0)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(image: usize) -> NetworkConfig {
        NetworkConfig {
            image_shape: Shape::square(image),
            filter_shape_l1: Shape::square(4),
            step_shape_l1: Shape::square(2),
            n_l1_output: 2,
            filter_shape_l2: Shape::square(2),
            step_shape_l2: Shape::square(1),
            n_l2_output: 2,
            block_shape: Shape::square(2),
            n_bins: None,
        }
    }

    #[test]
    fn test_exact_tiling_valid() {
        // 8 -> 3 -> 2 -> one 2x2 block
        assert!(validate_structure(&small_config(8)).is_ok());
    }

    #[test]
    fn test_margin_in_first_layer() {
        let err = validate_structure(&small_config(9)).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::StructuralInvalidity {
                stage: Stage::First,
                input,
                covered,
            } if input == Shape::square(9) && covered == Shape::square(8)
        ));
    }

    #[test]
    fn test_margin_in_second_layer() {
        let config = NetworkConfig {
            step_shape_l2: Shape::new(1, 2),
            ..small_config(8)
        };
        // 3x3 input, 2x2 filter, x step 2 -> xs = [0], covers 2 of 3 columns
        let err = validate_structure(&config).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::StructuralInvalidity { stage: Stage::Second, .. }
        ));
    }

    #[test]
    fn test_margin_in_pooling() {
        let config = NetworkConfig {
            image_shape: Shape::square(10),
            ..small_config(8)
        };
        // 10 -> 4 -> 3, 2x2 blocks leave one row and column
        let err = validate_structure(&config).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::StructuralInvalidity { stage: Stage::Pooling, .. }
        ));
    }

    #[test]
    fn test_default_config_tiles() {
        assert!(validate_structure(&NetworkConfig::default()).is_ok());
    }
}
