mod cli;
use cli::*;

fn main() -> Result<(), Box<dyn Error>> {

    let Cli { pdw, r1, config, tpm, out_dir, threshold, segmenter, segmenter_args } = Cli::parse();

    let mut progress = Progress::new();

    // ----- Parameters ----------------------------------------------------------------------------------
    progress.start("Reading configuration");
    let mut config: Config = match config {
        Some(path) => read_config_file(&path)?,
        None       => Config::default(),
    };
    progress.done();
    if let Some(tpm)       = tpm       { config.tpm       = tpm }
    if let Some(threshold) = threshold { config.threshold = threshold }
    if let Some(program)   = segmenter {
        config.segmenter = Some(SegmenterConfig { program, args: segmenter_args });
    }
    let segmenter: ExternalSegmenter = config.segmenter.as_ref()
        .ok_or("No segmentation program: use --segmenter or set [segmenter] in the config file")?
        .into();

    let out_dir = out_dir.unwrap_or_else(|| match r1.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    });

    // ----- UNICORT -------------------------------------------------------------------------------------
    progress.startln(&format!("Running UNICORT on {}", r1.display()));
    let outputs = unicort::run(&pdw, &r1, &config, &segmenter, &out_dir)?;
    progress.done_with_message("UNICORT");

    println!("PDw threshold : {}", outputs.threshold);
    println!("Masked R1     : {}", outputs.masked_r1   .display());
    println!("Corrected R1  : {}", outputs.corrected_r1.display());
    println!("B1+ map       : {}", outputs.b1_map      .display());
    println!("Bias field    : {}", outputs.bias_field  .display());
    Ok(())
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::{
    error::Error,
    path::PathBuf,
};

use clap::Parser;

use qmri::{
    config::{read_config_file, unicort::{Config, Segmenter as SegmenterConfig}},
    segment::ExternalSegmenter,
    unicort,
    utils::timing::Progress,
};
