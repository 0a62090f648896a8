//! Interface to the external unified-segmentation routine
//!
//! Segmentation and bias-field estimation are not performed here. A
//! `SegmentationJob` describes one invocation; a `Segmenter` carries it out
//! and leaves its results next to the input volume, following the naming
//! convention
//!
//! + `BiasField_<stem>`: the estimated multiplicative bias field
//! + `m<stem>`: the input divided by the bias field

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use units::mm_decimal;
use crate::config::unicort::{self, Config};
use crate::error::{io_error, Error, Result};
use crate::io::nifti::{file_stem, find_volume};

pub const BIAS_FIELD_PREFIX: &str = "BiasField_";
pub const CORRECTED_PREFIX : &str = "m";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SegmentationJob {
    pub channel: Channel,
    pub tissues: Vec<Tissue>,
    pub warp: Warp,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Channel {
    pub vols: Vec<PathBuf>,
    pub biasreg: f64,
    pub biasfwhm_mm: f64,
    pub write_bias_field: bool,
    pub write_corrected: bool,
}

/// One tissue class: a frame of the probability atlas and its mixture model
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Tissue {
    pub tpm: PathBuf,
    /// 1-based frame of `tpm`
    pub frame: usize,
    pub ngaus: usize,
    /// Write [native, DARTEL-imported] tissue maps
    pub native: [bool; 2],
    /// Write [unmodulated, modulated] warped tissue maps
    pub warped: [bool; 2],
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Warp {
    pub mrf: f64,
    pub cleanup: u8,
    pub reg: [f64; 5],
    pub affreg: String,
    pub fwhm_mm: f64,
    pub samp_mm: f64,
    /// Write [inverse, forward] deformation fields
    pub write: [bool; 2],
}

impl SegmentationJob {

    /// Bias-field estimation of `input`, writing only the bias field and the
    /// corrected volume
    pub fn unicort(input: &Path, config: &Config) -> Self {
        let channel = Channel {
            vols: vec![input.to_path_buf()],
            biasreg: config.bias_reg,
            biasfwhm_mm: mm_decimal(config.bias_fwhm),
            write_bias_field: true,
            write_corrected: true,
        };
        let tissues = config.n_gaussians.iter()
            .enumerate()
            .map(|(k, &ngaus)| Tissue {
                tpm: config.tpm.clone(),
                frame: k + 1,
                ngaus,
                native: [false, false],
                warped: [false, false],
            })
            .collect();
        let warp = Warp {
            mrf: config.mrf,
            cleanup: config.cleanup,
            reg: config.warp_reg,
            affreg: config.affine_reg.clone(),
            fwhm_mm: mm_decimal(config.smoothness),
            samp_mm: mm_decimal(config.sampling),
            write: [false, false],
        };
        Self { channel, tissues, warp }
    }

    /// The (first) volume being segmented
    pub fn input(&self) -> Result<&Path> {
        self.channel.vols.first()
            .map(PathBuf::as_path)
            .ok_or(Error::NoInputs("segmentation channel volumes"))
    }
}

pub trait Segmenter {
    /// Run `job` to completion, leaving its outputs next to its input
    fn segment(&self, job: &SegmentationJob) -> Result<()>;
}

/// Segmentation performed by an external program.
///
/// The job is written as JSON next to the input volume (`<stem>_seg_job.json`)
/// and the program is run as `program [args...] <job file>`.
#[derive(Debug, Clone)]
pub struct ExternalSegmenter {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl From<&unicort::Segmenter> for ExternalSegmenter {
    fn from(config: &unicort::Segmenter) -> Self {
        Self { program: config.program.clone(), args: config.args.clone() }
    }
}

impl ExternalSegmenter {
    pub fn job_path(input: &Path) -> PathBuf {
        input.with_file_name(format!("{}_seg_job.json", file_stem(input)))
    }
}

impl Segmenter for ExternalSegmenter {
    fn segment(&self, job: &SegmentationJob) -> Result<()> {
        let job_path = Self::job_path(job.input()?);
        std::fs::write(&job_path, serde_json::to_string_pretty(job)?).map_err(io_error(&job_path))?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&job_path)
            .status()
            .map_err(io_error(&self.program))?;

        if status.success() { Ok(()) }
        else { Err(Error::SegmentationFailed { program: self.program.clone(), status }) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationOutputs {
    pub bias_field: PathBuf,
    pub corrected: PathBuf,
}

/// Find the outputs of segmenting the volume called `stem` in `dir`
pub fn locate_outputs(dir: &Path, stem: &str) -> Result<SegmentationOutputs> {
    let find = |prefix: &str| {
        let stem = format!("{prefix}{stem}");
        find_volume(dir, &stem).ok_or_else(|| Error::MissingOutput { dir: dir.to_path_buf(), stem })
    };
    Ok(SegmentationOutputs {
        bias_field: find(BIAS_FIELD_PREFIX)?,
        corrected : find(CORRECTED_PREFIX)?,
    })
}


#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn unicort_job_has_one_tissue_per_gaussian_count() {
        let job = SegmentationJob::unicort(Path::new("out/R1_masked.nii"), &Config::default());
        assert_eq!(job.channel.vols, vec![PathBuf::from("out/R1_masked.nii")]);
        assert_eq!(job.channel.biasreg, 1e-3);
        assert_eq!(job.channel.biasfwhm_mm, 60.0);
        assert!(job.channel.write_bias_field && job.channel.write_corrected);

        let frames: Vec<_> = job.tissues.iter().map(|t| (t.frame, t.ngaus)).collect();
        assert_eq!(frames, vec![(1, 2), (2, 2), (3, 2), (4, 3), (5, 4), (6, 2)]);
        assert!(job.tissues.iter().all(|t| t.native == [false, false] && t.warped == [false, false]));
        assert!(job.tissues.iter().all(|t| t.tpm == Path::new("TPM.nii")));

        assert_eq!(job.warp.reg, [0.0, 1e-3, 0.5, 0.05, 0.2]);
        assert_eq!(job.warp.affreg, "mni");
        assert_eq!(job.warp.samp_mm, 3.0);
        assert_eq!(job.warp.fwhm_mm, 0.0);
        assert_eq!((job.warp.mrf, job.warp.cleanup), (1.0, 1));
        assert_eq!(job.warp.write, [false, false]);
    }

    #[test]
    fn job_serializes_to_json() -> Result<()> {
        let job = SegmentationJob::unicort(Path::new("R1_masked.nii"), &Config::default());
        let json = serde_json::to_value(&job)?;
        assert_eq!(json["channel"]["vols"][0], "R1_masked.nii");
        assert_eq!(json["tissues"].as_array().map(Vec::len), Some(6));
        assert_eq!(json["warp"]["affreg"], "mni");
        // Parameters appear exactly as configured
        assert_eq!(json["channel"]["biasfwhm_mm"], 60.0);
        assert_eq!(json["warp"]["samp_mm"], 3.0);
        assert_eq!(json["warp"]["reg"][3], 0.05);
        Ok(())
    }

    #[test]
    fn locate_reports_missing_bias_field() -> std::io::Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("mR1_masked.nii"), b"")?;
        match locate_outputs(dir.path(), "R1_masked") {
            Err(Error::MissingOutput { stem, .. }) => assert_eq!(stem, "BiasField_R1_masked"),
            other => panic!("expected MissingOutput, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn locate_finds_analyze_bias_field() -> std::io::Result<()> {
        let dir = tempdir()?;
        let d = dir.path();
        for name in ["BiasField_R1_masked.hdr", "BiasField_R1_masked.img", "mR1_masked.nii"] {
            std::fs::write(d.join(name), b"")?;
        }
        let outputs = locate_outputs(d, "R1_masked").unwrap();
        assert_eq!(outputs, SegmentationOutputs {
            bias_field: d.join("BiasField_R1_masked.hdr"),
            corrected : d.join("mR1_masked.nii"),
        });
        Ok(())
    }

    #[cfg(unix)]
    mod external {
        use super::*;
        #[allow(unused)] use pretty_assertions::assert_eq;

        fn job_in(dir: &Path) -> SegmentationJob {
            SegmentationJob::unicort(&dir.join("R1_masked.nii"), &Config::default())
        }

        #[test]
        fn successful_program_sees_job_file() -> Result<()> {
            let dir = tempdir().unwrap();
            let job = job_in(dir.path());
            // `test -f <job>` succeeds only if the job file exists
            let segmenter = ExternalSegmenter { program: "test".into(), args: vec!["-f".into()] };
            segmenter.segment(&job)?;
            let written = std::fs::read_to_string(ExternalSegmenter::job_path(job.input()?)).unwrap();
            let written: serde_json::Value = serde_json::from_str(&written)?;
            assert_eq!(written, serde_json::to_value(&job)?);
            assert_eq!(written["channel"]["biasfwhm_mm"], 60.0);
            assert_eq!(written["warp"]["samp_mm"], 3.0);
            Ok(())
        }

        #[test]
        fn failing_program_is_reported() {
            let dir = tempdir().unwrap();
            let segmenter = ExternalSegmenter { program: "false".into(), args: vec![] };
            let result = segmenter.segment(&job_in(dir.path()));
            assert!(matches!(result, Err(Error::SegmentationFailed { .. })));
        }

        #[test]
        fn missing_program_is_an_io_error() {
            let dir = tempdir().unwrap();
            let segmenter = ExternalSegmenter { program: "/nonexistent/segmenter".into(), args: vec![] };
            let result = segmenter.segment(&job_in(dir.path()));
            assert!(matches!(result, Err(Error::Io { .. })));
        }
    }
}
