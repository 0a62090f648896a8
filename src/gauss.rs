//! Separable Gaussian smoothing of volumes, with zero padding at the borders

#[cfg(not(feature = "serial"))]
use rayon::prelude::*;

use units::{mm, ratio, ratio_, Length, Ratio};
use crate::image::Image;
use crate::index::{index1_to_3, BoxDim_u};

/// Kernels are truncated at this many standard deviations either side
const CUTOFF: f32 = 6.0;

/// Below this width (in voxels) smoothing along an axis is skipped
const MIN_SIGMA: f32 = 1e-2;

pub fn fwhm_to_sigma(fwhm: Length) -> Length {
    fwhm / (8.0 * std::f32::consts::LN_2).sqrt()
}

/// Unnormalized Gaussian with unit peak height, vanishing beyond `cutoff`
/// standard deviations
pub fn make_gauss(sigma: Length, cutoff: Option<Ratio>) -> impl Fn(Length) -> f32 {
    let cutoff: Length = cutoff.map_or(mm(f32::INFINITY), |width| width * sigma);
    move |dx: Length| -> f32 {
        if dx.abs() <= cutoff {
            let y = ratio_(dx / sigma);
            (-0.5 * y * y).exp()
        } else {
            0.0
        }
    }
}

/// Gaussian of width `sigma` sampled at voxel centres `voxel` apart,
/// normalized to unit sum
pub fn kernel(sigma: Length, voxel: Length) -> Vec<f32> {
    let s = ratio_(sigma / voxel);
    // Also catches NaN
    if !(s >= MIN_SIGMA) { return vec![1.0] }
    let half = (CUTOFF * s).round() as i32;
    let gauss = make_gauss(sigma, Some(ratio(CUTOFF)));
    let weights: Vec<f32> = (-half..=half).map(|i| gauss(voxel * i as f32)).collect();
    let total: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Smooth `image` with a Gaussian of the given full widths at half maximum
/// along x, y and z. Voxels beyond the image border count as zero.
pub fn smooth(image: &Image, fwhm: [Length; 3]) -> Image {
    let mut data = image.data.clone();
    for axis in 0..3 {
        let k = kernel(fwhm_to_sigma(fwhm[axis]), image.grid.voxel_size[axis]);
        if k.len() > 1 {
            data = convolve_axis(&data, image.grid.n, axis, &k);
        }
    }
    Image::new(image.grid.clone(), data)
}

fn convolve_axis(data: &[f32], n: BoxDim_u, axis: usize, kernel: &[f32]) -> Vec<f32> {
    let half = (kernel.len() / 2) as isize;
    let len = n[axis] as isize;
    let stride = [1, n[0], n[0] * n[1]][axis] as isize;
    let value = |i: usize| -> f32 {
        let here = index1_to_3(i, n)[axis] as isize;
        kernel.iter().enumerate()
            .filter_map(|(k, &w)| {
                let there = here + k as isize - half;
                (0..len).contains(&there)
                    .then(|| w * data[(i as isize + (there - here) * stride) as usize])
            })
            .sum()
    };
    #[cfg(not(feature = "serial"))]
    { (0..data.len()).into_par_iter().map(value).collect() }
    #[cfg(feature = "serial")]
    { (0..data.len()).map(value).collect() }
}


#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use float_eq::assert_float_eq;
    use crate::grid::Grid;

    #[test]
    fn half_maximum_at_half_fwhm() {
        let fwhm = mm(6.0);
        let gauss = make_gauss(fwhm_to_sigma(fwhm), None);
        assert_float_eq!(gauss(mm(0.0)), 1.0, ulps <= 1);
        assert_float_eq!(gauss(fwhm / 2.0), 0.5, abs <= 1e-6);
        assert_float_eq!(gauss(-fwhm / 2.0), 0.5, abs <= 1e-6);
    }

    #[test]
    fn cutoff() {
        let gauss = make_gauss(mm(1.0), Some(ratio(3.0)));
        assert!(gauss(mm(2.9)) > 0.0);
        assert_eq!(gauss(mm(3.1)), 0.0);
    }

    #[rstest(/**/ sigma, voxel, expected_len,
             case(  0.0,   1.0,  1),
             case(1e-3,    1.0,  1),
             case(  1.0,   1.0, 13),
             case(  1.0,   2.0,  7),
             case(  2.5,   1.0, 31),
    )]
    fn kernel_shape(sigma: f32, voxel: f32, expected_len: usize) {
        let k = kernel(mm(sigma), mm(voxel));
        assert_eq!(k.len(), expected_len);
        assert_float_eq!(k.iter().sum::<f32>(), 1.0, abs <= 1e-5);
        // Symmetric, peaked in the middle
        let mid = k.len() / 2;
        for i in 0..mid {
            assert_float_eq!(k[i], k[k.len() - 1 - i], ulps <= 1);
            assert!(k[i] <= k[mid]);
        }
    }

    #[test]
    fn zero_fwhm_is_identity() {
        let grid = Grid::new((3, 4, 5), [mm(1.0); 3]);
        let data = (0..grid.n_voxels()).map(|i| (i * 7 % 11) as f32).collect();
        let image = Image::new(grid, data);
        assert_eq!(smooth(&image, [mm(0.0); 3]).data, image.data);
    }

    #[test]
    fn impulse_spreads_only_along_smoothed_axis() {
        let grid = Grid::new((9, 9, 9), [mm(1.0); 3]);
        let mut image = Image::zeros(grid);
        image[[4, 4, 4]] = 1.0;
        let smoothed = smooth(&image, [mm(2.0), mm(0.0), mm(0.0)]);
        assert!(smoothed[[3, 4, 4]] > 0.0);
        assert_eq!(smoothed[[4, 3, 4]], 0.0);
        assert_eq!(smoothed[[4, 4, 3]], 0.0);
        assert_float_eq!(smoothed.data.iter().sum::<f32>(), 1.0, abs <= 1e-5);
    }

    #[test]
    fn edges_lose_intensity_to_zero_padding() {
        let grid = Grid::new((20, 1, 1), [mm(1.0); 3]);
        let image = Image::ones(grid);
        let smoothed = smooth(&image, [mm(3.0), mm(0.0), mm(0.0)]);
        assert!(smoothed[0] < 0.9);
        assert_float_eq!(smoothed[10], 1.0, abs <= 1e-4);
    }

    #[test]
    fn voxel_size_is_respected() {
        // Same physical kernel, twice the voxel size: neighbour weight differs
        let fine   = kernel(mm(2.0), mm(1.0));
        let coarse = kernel(mm(2.0), mm(2.0));
        assert_eq!(fine.len(), 25);
        assert_eq!(coarse.len(), 13);
        let relative = |k: &[f32]| k[k.len() / 2 + 1] / k[k.len() / 2];
        assert_float_eq!(relative(&fine  ), (-0.5_f32 * 0.25).exp(), r2nd <= 1e-5);
        assert_float_eq!(relative(&coarse), (-0.5_f32 * 1.00).exp(), r2nd <= 1e-5);
    }
}
