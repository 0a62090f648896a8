//! The voxel grid on which a volume is sampled: matrix size, voxel size and
//! the NIfTI geometry (orientation, origin) that every derived volume inherits

use nifti::NiftiHeader;

use units::{mm, mm_, Length};
use crate::index::{BoxDim_u, Index1_u};

#[derive(Clone, Debug)]
pub struct Grid {
    pub n: BoxDim_u,
    pub voxel_size: [Length; 3],
    header: NiftiHeader,
}

impl Grid {

    /// Grid with an axis-aligned scanner-space affine centred on the volume
    pub fn new((nx, ny, nz): (usize, usize, usize), voxel_size: [Length; 3]) -> Self {
        let n = [nx, ny, nz];
        let mut header = NiftiHeader::default();
        header.dim = [3, 1, 1, 1, 1, 1, 1, 1];
        for axis in 0..3 {
            header.dim   [axis + 1] = n[axis] as _;
            header.pixdim[axis + 1] = mm_(voxel_size[axis]);
        }
        let d = |axis: usize| mm_(voxel_size[axis]);
        let offset = |axis: usize| -d(axis) * (n[axis] as f32 - 1.0) / 2.0;
        header.sform_code = 1;
        header.srow_x = [d(0), 0.0 , 0.0 , offset(0)];
        header.srow_y = [0.0 , d(1), 0.0 , offset(1)];
        header.srow_z = [0.0 , 0.0 , d(2), offset(2)];
        Self { n, voxel_size, header }
    }

    /// Grid described by an existing NIfTI header. Only the first three
    /// dimensions are considered.
    pub fn from_header(header: &NiftiHeader) -> Self {
        let mut n = [1; 3];
        let mut voxel_size = [mm(1.0); 3];
        for axis in 0..3 {
            n[axis] = (header.dim[axis + 1] as usize).max(1);
            let d = header.pixdim[axis + 1].abs();
            voxel_size[axis] = mm(if d > 0.0 { d } else { 1.0 });
        }
        Self { n, voxel_size, header: header.clone() }
    }

    /// Header to be used as reference when writing a volume on this grid.
    ///
    /// Values written by this crate are already scaled, so the scaling
    /// parameters are reset. Always describes a single 3D volume.
    pub fn header_template(&self) -> NiftiHeader {
        let mut header = self.header.clone();
        let [nx, ny, nz] = self.n;
        header.dim = [3, nx as _, ny as _, nz as _, 1, 1, 1, 1];
        header.scl_slope = 1.0;
        header.scl_inter = 0.0;
        header
    }

    pub fn n_voxels(&self) -> Index1_u {
        let [nx, ny, nz] = self.n;
        nx * ny * nz
    }

    /// Whether voxels at the same index in both grids refer to the same tissue
    pub fn same_space(&self, other: &Self) -> bool {
        let tolerance = 1e-4;
        self.n == other.n &&
            self.voxel_size.iter().zip(other.voxel_size.iter())
            .all(|(&a, &b)| (mm_(a) - mm_(b)).abs() < tolerance)
    }

    /// Voxel size in mm
    pub fn voxel_size_mm(&self) -> [f32; 3] {
        self.voxel_size.map(mm_)
    }
}
