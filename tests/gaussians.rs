use float_eq::assert_float_eq;
use proptest::prelude::*;

use qmri::{gauss::{kernel, smooth}, Grid, Image};
use units::mm;

proptest! {
    #[test]
    fn kernels_are_normalized_and_symmetric(
        sigma in 0.1 .. (10.0 as f32),
        voxel in 0.5 .. ( 4.0 as f32),
    ) {
        let k = kernel(mm(sigma), mm(voxel));
        prop_assert_eq!(k.len() % 2, 1);
        assert_float_eq!(k.iter().sum::<f32>(), 1.0, abs <= 1e-5);
        for (a, b) in k.iter().zip(k.iter().rev()) {
            assert_float_eq!(*a, *b, abs <= 1e-7);
        }
    }

    // Intensity far enough from the edges is neither lost nor created
    #[test]
    fn interior_mass_is_preserved(
        fwhm  in 0.5 .. ( 3.0 as f32),
        value in 1.0 .. (50.0 as f32),
        x in 12 .. 13_usize,
        y in 10 .. 15_usize,
        z in 10 .. 15_usize,
    ) {
        let grid = Grid::new((25, 25, 25), [mm(1.0); 3]);
        let mut image = Image::zeros(grid);
        image[[x, y, z]] = value;
        let smoothed = smooth(&image, [mm(fwhm); 3]);
        assert_float_eq!(smoothed.data.iter().sum::<f32>(), value, rmax <= 1e-4);
        prop_assert!(smoothed[[x, y, z]] <= value);
    }
}

#[test]
fn larger_voxels_mean_narrower_kernels() {
    let fine   = kernel(mm(3.0), mm(1.0));
    let coarse = kernel(mm(3.0), mm(2.0));
    assert!(coarse.len() < fine.len());
}
