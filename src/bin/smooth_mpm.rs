// ----------------------------------- CLI -----------------------------------
#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "smooth_mpm", about = "Tissue-weighted smoothing of quantitative maps")]
pub struct Cli {

    /// Quantitative maps to be smoothed
    #[clap(short, long, num_args = 1.., required = true)]
    pub maps: Vec<PathBuf>,

    /// Tissue probability maps, one per tissue class
    #[clap(short, long, num_args = 1.., required = true)]
    pub tissues: Vec<PathBuf>,

    /// Tissue priors, in the same order as the tissue probability maps. A
    /// frame of a 4D atlas is selected with a 1-based suffix: 'TPM.nii,1'
    #[clap(short, long, num_args = 1.., required = true)]
    pub priors: Vec<PathBuf>,

    /// Smoothing kernel FWHM, e.g. '6 mm' [overrides config]
    #[clap(short, long)]
    pub fwhm: Option<Length>,

    /// TOML file with smoothing parameters
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the outputs
    #[clap(short, long, default_value = ".")]
    pub out_dir: PathBuf,
}

// --------------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn Error>> {

    let Cli { maps, tissues, priors, fwhm, config, out_dir } = Cli::parse();

    let mut progress = Progress::new();

    progress.start("Reading configuration");
    let mut config: Config = match config {
        Some(path) => read_config_file(&path)?,
        None       => Config::default(),
    };
    progress.done();
    if let Some(fwhm) = fwhm { config.fwhm = fwhm }

    let inputs = Inputs { maps, tissue_classes: tissues, priors };
    inputs.validate()?;

    progress.startln(&format!("Smoothing {} maps in {} tissue classes (FWHM {:?})",
                              inputs.maps.len(), inputs.tissue_classes.len(), config.fwhm));
    let bar = ProgressBar::new(inputs.n_outputs() as u64);
    bar.set_style(ProgressStyle::default_bar()
                  .template("Smoothing: {msg}\n[{elapsed_precise}] {wide_bar} {pos}/{len} ({eta_precise})")?
    );
    let smoothed = smooth::run(&inputs, &config, &out_dir, &bar)?;
    bar.finish_and_clear();
    progress.done_with_message(&format!("Wrote {} smoothed maps to {}", smoothed.len(), out_dir.display()));
    Ok(())
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::{
    error::Error,
    path::PathBuf,
};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use qmri::{
    config::{read_config_file, smooth::Config},
    smooth::{self, Inputs},
    utils::timing::Progress,
    Length,
};
