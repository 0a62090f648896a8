#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ndarray::{Array4, ShapeBuilder};
use nifti::writer::WriterOptions;

use qmri::{Grid, Image, io::nifti::write_image};
use units::mm;

pub const N: (usize, usize, usize) = (8, 8, 8);

pub fn grid() -> Grid { Grid::new(N, [mm(2.0); 3]) }

/// Image on `grid()` with `inside` in the central 4×4×4 cube and `outside`
/// elsewhere
pub fn cube(inside: f32, outside: f32) -> Image {
    let mut image = Image::new(grid(), vec![outside; N.0 * N.1 * N.2]);
    for x in 2..6 { for y in 2..6 { for z in 2..6 {
        image[[x, y, z]] = inside;
    }}}
    image
}

pub fn write(dir: &Path, name: &str, image: &Image) -> PathBuf {
    let path = dir.join(name);
    write_image(image, &path).unwrap();
    path
}

/// 4D file holding `frames` one after the other, like a tissue probability atlas
pub fn write_frames(dir: &Path, name: &str, frames: &[Image]) -> PathBuf {
    let path = dir.join(name);
    let (nx, ny, nz) = N;
    let data = frames.iter().flat_map(|f| f.data.iter().copied()).collect();
    let array = Array4::from_shape_vec((nx, ny, nz, frames.len()).f(), data).unwrap();
    let mut header = grid().header_template();
    header.dim = [4, nx as _, ny as _, nz as _, frames.len() as _, 1, 1, 1];
    header.magic = *b"n+1\0";
    header.vox_offset = 352.0;
    WriterOptions::new(path.as_path()).reference_header(&header).write_nifti(&array).unwrap();
    path
}

/// Names of all files in `dir`, sorted
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir).unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
