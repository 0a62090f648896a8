//! Head/neck mask derived from the modal intensity of a reference volume

use std::collections::HashMap;

use units::todo::Intensityf32;
use crate::image::{Image, Mask};

/// Most frequent value among the rounded finite `values`.
///
/// Ties go to the smallest value; `None` if no value is finite.
pub fn modal_value(values: impl IntoIterator<Item = Intensityf32>) -> Option<Intensityf32> {
    let mut counts = HashMap::<i64, usize>::new();
    for v in values.into_iter().filter(|v| v.is_finite()) {
        *counts.entry(v.round() as i64).or_default() += 1;
    }
    counts.into_iter()
        .max_by(|(va, na), (vb, nb)| na.cmp(nb).then(vb.cmp(va)))
        .map(|(value, _)| value as Intensityf32)
}

/// Mask of voxels strictly brighter than `multiplier` times the modal
/// (rounded) intensity of `reference`, together with that threshold.
pub fn head_mask(reference: &Image, multiplier: f32) -> Option<(Intensityf32, Mask)> {
    let threshold = multiplier * modal_value(reference.data.iter().copied())?;
    Some((threshold, reference.above(threshold)))
}


#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use proptest::prelude::*;
    use units::mm;
    use crate::grid::Grid;

    #[rstest(/**/ values                           , expected,
             case(vec![1.0, 2.0, 2.0, 3.0]          , Some(2.0)),
             // Rounding happens before counting
             case(vec![1.6, 2.4, 2.2, 7.0]          , Some(2.0)),
             case(vec![-0.4, 0.3, 0.49, 10.0, 10.0] , Some(0.0)),
             // Ties resolved towards the smallest value
             case(vec![5.0, 5.0, 3.0, 3.0, 9.0]     , Some(3.0)),
             case(vec![-2.0, 4.0]                   , Some(-2.0)),
             // Non-finite voxels are ignored
             case(vec![f32::NAN, f32::NAN, 8.0]     , Some(8.0)),
             case(vec![f32::NAN, f32::INFINITY]     , None),
             case(vec![]                            , None),
    )]
    fn modes(values: Vec<f32>, expected: Option<f32>) {
        assert_eq!(modal_value(values), expected);
    }

    #[test]
    fn threshold_is_multiple_of_mode() {
        let grid = Grid::new((6, 1, 1), [mm(1.0); 3]);
        let pdw = Image::new(grid, vec![10.2, 9.8, 10.0, 50.0, 51.0, 49.9]);
        let (threshold, mask) = head_mask(&pdw, 5.0).unwrap();
        assert_eq!(threshold, 50.0);
        // 50.0 itself is not above the threshold
        assert_eq!(mask.data, vec![false, false, false, false, true, false]);
    }

    proptest! {
        #[test]
        fn nothing_at_or_below_threshold_survives(
            values in proptest::collection::vec(0.0 .. (500.0 as f32), 1..200),
            multiplier in 0.5 .. (10.0 as f32),
        ) {
            let grid = Grid::new((values.len(), 1, 1), [mm(1.0); 3]);
            let pdw = Image::new(grid, values);
            let (threshold, mask) = head_mask(&pdw, multiplier).unwrap();
            for (&v, &inside) in pdw.data.iter().zip(mask.data.iter()) {
                prop_assert_eq!(inside, v > threshold);
            }
        }
    }
}
