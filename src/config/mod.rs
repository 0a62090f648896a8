//! TOML configuration of the processing stages
//!
//! Physical quantities are written as strings with explicit units
//! (`fwhm = "6 mm"`), and parsed with `uom`'s parsers.

pub mod unicort;
pub mod smooth;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

use crate::error::{io_error, Result};

pub(crate) fn deserialize_uom<'d, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    String::deserialize(deserializer)?
        .parse::<T>()
        .map_err(de::Error::custom)
}

pub fn read_config_file<C: for<'d> Deserialize<'d>>(path: &Path) -> Result<C> {
    let config: String = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(toml::from_str(&config)?)
}
