#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "unicort", about = "Correct an R1 map for RF transmit inhomogeneity and estimate the B1+ map")]
pub struct Cli {

    /// Proton-density weighted image, used to build the head mask
    pub pdw: PathBuf,

    /// R1 map to be corrected
    pub r1: PathBuf,

    /// TOML file with UNICORT parameters
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Tissue probability atlas [overrides config]
    #[clap(long)]
    pub tpm: Option<PathBuf>,

    /// Where to write the outputs [default: directory of the R1 map]
    #[clap(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Mask threshold as a multiple of the modal PDw intensity [overrides config]
    #[clap(short, long)]
    pub threshold: Option<f32>,

    /// Program performing the unified segmentation [overrides config]
    #[clap(long)]
    pub segmenter: Option<PathBuf>,

    /// Extra argument passed to the segmentation program (repeatable)
    #[clap(long = "segmenter-arg", allow_hyphen_values = true)]
    pub segmenter_args: Vec<String>,
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::path::PathBuf;
