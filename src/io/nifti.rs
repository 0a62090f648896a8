//! Read / write scalar volumes as NIfTI-1
//!
//! `.nii`, `.nii.gz` and `.hdr`/`.img` pairs are read; output format is
//! chosen by extension (`.nii` or `.nii.gz`). Voxel values are always written
//! as float32.

use std::path::{Path, PathBuf};

use ndarray::{Array3, Axis, ShapeBuilder};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use nifti::writer::WriterOptions;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::image::Image;

/// Recognised NIfTI file extensions, longest first so that `.nii.gz` wins
/// over `.gz`-less matches.
const EXTENSIONS: [&str; 4] = [".nii.gz", ".nii", ".hdr", ".img"];

/// Read a single 3D volume.
///
/// A frame of a 4D file is selected with a 1-based `,<frame>` suffix on the
/// path (`TPM.nii,3`); without a suffix the file must hold exactly one volume.
pub fn read_image(path: &Path) -> Result<Image> {
    let (file, frame) = split_frame(path);
    let nifti_error = |source| Error::Nifti { path: file.clone(), source };

    let obj = ReaderOptions::new().read_file(&file).map_err(nifti_error)?;
    let mut grid = Grid::from_header(obj.header());
    let volume = obj.into_volume().into_ndarray::<f32>().map_err(nifti_error)?;

    let shape = volume.shape().to_vec();
    let volumes: usize = shape.iter().skip(3).product();
    let volume = match frame {
        None if volumes == 1 => volume,
        None => return Err(Error::NotAVolume { path: file, volumes }),
        Some(frame) if frame == 0 || frame > volumes =>
            return Err(Error::NoSuchFrame { path: file, frame, volumes }),
        Some(_) if shape.len() <= 3 => volume,
        Some(frame) if shape.len() == 4 => volume.index_axis_move(Axis(3), frame - 1),
        Some(_) => return Err(Error::NotAVolume { path: file, volumes }),
    };
    // Trust the data over the header for the matrix size: 2D files may leave
    // garbage in dim[3]
    for axis in 0..3 {
        grid.n[axis] = shape.get(axis).copied().unwrap_or(1);
    }

    // Reversing the axes makes logical iteration order x-fastest
    let data = volume.t().iter().copied().collect();
    Ok(Image::new(grid, data))
}

/// `TPM.nii,3` -> (`TPM.nii`, Some(3)); paths without a frame suffix are
/// returned unchanged.
pub fn split_frame(path: &Path) -> (PathBuf, Option<usize>) {
    let text = path.to_string_lossy();
    text.rsplit_once(',')
        .and_then(|(file, frame)| Some((PathBuf::from(file), Some(frame.parse().ok()?))))
        .unwrap_or_else(|| (path.to_path_buf(), None))
}

pub fn write_image(image: &Image, path: &Path) -> Result<()> {
    let [nx, ny, nz] = image.grid.n;
    let array = Array3::from_shape_vec((nx, ny, nz).f(), image.data.clone())
        .map_err(|_| Error::GridMismatch { expected: image.grid.n, found: [image.data.len(), 1, 1] })?;

    let mut header = image.grid.header_template();
    if is_analyze_pair(path) {
        header.magic = *b"ni1\0";
        header.vox_offset = 0.0;
    } else {
        header.magic = *b"n+1\0";
        header.vox_offset = 352.0;
    }
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&array)
        .map_err(|source| Error::Nifti { path: path.to_path_buf(), source })
}

fn is_analyze_pair(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".hdr") || name.ends_with(".img")
}

// ----- File naming ---------------------------------------------------------------------

/// File name with any NIfTI extension removed: `dir/R1.nii.gz` -> `R1`
pub fn file_stem(path: &Path) -> String {
    let (path, _) = split_frame(path);
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    EXTENSIONS.iter()
        .find_map(|ext| name.strip_suffix(ext))
        .map(str::to_string)
        .unwrap_or(name)
}

/// `dir/<prefix><stem><suffix>.nii`
pub fn derived_path(dir: &Path, prefix: &str, input: &Path, suffix: &str) -> PathBuf {
    dir.join(format!("{prefix}{}{suffix}.nii", file_stem(input)))
}

/// Find the volume called `stem` in `dir`, whichever format it was written in.
///
/// Tried in order: `.nii`, `.nii.gz`, then an `.img` whose `.hdr` header
/// exists (in which case the header path is returned, as that is what the
/// reader needs).
pub fn find_volume(dir: &Path, stem: &str) -> Option<PathBuf> {
    let candidate = |ext: &str| dir.join(format!("{stem}{ext}"));
    [".nii", ".nii.gz"].into_iter()
        .map(candidate)
        .find(|p| p.is_file())
        .or_else(|| {
            let (img, hdr) = (candidate(".img"), candidate(".hdr"));
            (img.is_file() && hdr.is_file()).then_some(hdr)
        })
}

/// Files making up the volume at `path`: both halves of an Analyze-style pair
pub fn volume_files(path: &Path) -> Vec<PathBuf> {
    if is_analyze_pair(path) {
        vec![path.with_extension("hdr"), path.with_extension("img")]
    } else {
        vec![path.to_path_buf()]
    }
}
