//! Quantitative MRI post-processing: UNICORT correction of R1 maps for RF
//! transmit inhomogeneity, and tissue-weighted smoothing of multi-parametric
//! maps.

mod exports;
pub use exports::*;

pub mod config;
pub mod error;
pub mod gauss;
pub mod grid;
pub mod image;
pub mod index;
pub mod io;
pub mod segment;
pub mod smooth;
pub mod threshold;
pub mod unicort;
pub mod utils;
