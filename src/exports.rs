pub use crate::error::{Error, Result};
pub use crate::grid::Grid;
pub use crate::image::{Image, ImageData, Mask};
pub use crate::index::{BoxDim_u, Index1_u, Index3_u};
pub use crate::segment::{ExternalSegmenter, Segmenter};

pub use units::{Length, Ratio, todo::{Intensityf32, Probabilityf32}};
