use units::todo::Intensityf32;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::index::{index3_to_1, Index1_u, Index3_u};

pub type ImageData = Vec<Intensityf32>;


#[derive(Clone, Debug)]
pub struct Image {
    pub grid: Grid,
    pub data: ImageData,
}

/// Voxel-wise boolean image on a `Grid`
#[derive(Clone, Debug)]
pub struct Mask {
    pub grid: Grid,
    pub data: Vec<bool>,
}

impl Image {

    pub fn new(grid: Grid, data: ImageData) -> Self {
        assert_eq!(data.len(), grid.n_voxels(),
                   "Image data length does not match grid size {:?}", grid.n);
        Self { grid, data }
    }

    pub fn zeros(grid: Grid) -> Self { Self::filled(grid, 0.0) }
    pub fn ones (grid: Grid) -> Self { Self::filled(grid, 1.0) }

    fn filled(grid: Grid, value: Intensityf32) -> Self {
        let data = vec![value; grid.n_voxels()];
        Self { grid, data }
    }

    pub fn map(&self, f: impl Fn(Intensityf32) -> Intensityf32) -> Self {
        let data = self.data.iter().copied().map(f).collect();
        Self { grid: self.grid.clone(), data }
    }

    /// Combine two images voxel by voxel. Fails if they are not on the same grid.
    pub fn zip_map(&self, other: &Self, f: impl Fn(Intensityf32, Intensityf32) -> Intensityf32) -> Result<Self> {
        self.check_same_space(&other.grid)?;
        let data = self.data.iter().zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self { grid: self.grid.clone(), data })
    }

    /// Voxels strictly greater than `threshold`
    pub fn above(&self, threshold: Intensityf32) -> Mask {
        let data = self.data.iter().map(|&v| v > threshold).collect();
        Mask { grid: self.grid.clone(), data }
    }

    /// Copy of the image with every voxel outside `mask` set to zero
    pub fn masked(&self, mask: &Mask) -> Result<Self> {
        self.select(mask, |v| v)
    }

    /// Apply `f` inside `mask`; voxels outside the mask are zero, whatever
    /// `f` would have made of them.
    pub fn select(&self, mask: &Mask, f: impl Fn(Intensityf32) -> Intensityf32) -> Result<Self> {
        self.check_same_space(&mask.grid)?;
        let data = self.data.iter().zip(mask.data.iter())
            .map(|(&v, &inside)| if inside { f(v) } else { 0.0 })
            .collect();
        Ok(Self { grid: self.grid.clone(), data })
    }

    pub fn check_same_space(&self, other: &Grid) -> Result<()> {
        if self.grid.same_space(other) { Ok(()) }
        else { Err(Error::GridMismatch { expected: self.grid.n, found: other.n }) }
    }

}

impl Mask {

    /// Number of voxels inside the mask
    pub fn count(&self) -> usize { self.data.iter().filter(|&&m| m).count() }
}


impl core::ops::IndexMut<Index1_u> for Image {
    #[inline]
    fn index_mut(&mut self, i: Index1_u) -> &mut Self::Output { &mut self.data[i] }
}

impl core::ops::Index<Index1_u> for Image {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i: Index1_u) -> &Self::Output { &self.data[i] }
}

impl core::ops::IndexMut<Index3_u> for Image {
    fn index_mut(&mut self, i3: Index3_u) -> &mut Self::Output {
        let i1 = index3_to_1(i3, self.grid.n);
        &mut self.data[i1]
    }
}

impl core::ops::Index<Index3_u> for Image {
    type Output = Intensityf32;
    fn index(&self, i3: Index3_u) -> &Self::Output {
        let i1 = index3_to_1(i3, self.grid.n);
        &self.data[i1]
    }
}
