mod extract;

pub use extract::{country_regions, extract_regions, resample_ring, ring_extent, simplify_rings};

use crate::error::Result;
use crate::map::renderer::Region;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// ISO 3166-1 country-code tables, keyed by country name.
/// Built once by `load_country_codes` and passed by reference; there is
/// no module-level table state.
#[derive(Debug, Default)]
pub struct CountryCodes {
    alpha3: HashMap<String, String>,
    alpha2: HashMap<String, String>,
}

impl CountryCodes {
    /// Three-letter code for a country name
    pub fn alpha3(&self, name: &str) -> Option<&str> {
        self.alpha3.get(name).map(String::as_str)
    }

    /// Two-letter code for a country name
    pub fn alpha2(&self, name: &str) -> Option<&str> {
        self.alpha2.get(name).map(String::as_str)
    }

    /// All known three-letter codes
    pub fn iter_alpha3(&self) -> impl Iterator<Item = &str> {
        self.alpha3.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.alpha3.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha3.is_empty()
    }
}

/// Load the ISO 3166-1 alpha-3 and alpha-2 reference tables from their
/// tab-separated files under the data directory
pub fn load_country_codes(data_dir: &Path) -> Result<CountryCodes> {
    let alpha3 = fs::read_to_string(data_dir.join("countrycodes_ISO_3166_1_3.dat"))?;
    let alpha2 = fs::read_to_string(data_dir.join("countrycodes_ISO_3166_1_2.dat"))?;

    Ok(CountryCodes {
        alpha3: parse_code_table(&alpha3, 2),
        alpha2: parse_code_table(&alpha2, 3),
    })
}

/// Parse a tab-separated table of `code \t name [\t extra]` rows into a
/// name -> code map; rows with any other field count are skipped
fn parse_code_table(content: &str, fields: usize) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() == fields {
                Some((cols[1].trim_end().to_string(), cols[0].to_string()))
            } else {
                None
            }
        })
        .collect()
}

/// Country codes with a `{code}_adm{level}.shp` present in the data
/// directory, sorted for stable display order
pub fn discover_countries(data_dir: &Path, level: u8) -> Result<Vec<String>> {
    let suffix = format!("_adm{level}");
    let mut codes = Vec::new();

    for entry in fs::read_dir(data_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("shp") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if let Some(code) = stem.strip_suffix(&suffix) {
                codes.push(code.to_string());
            }
        }
    }

    codes.sort();
    Ok(codes)
}

/// Extract regions for many countries in parallel. Countries that fail
/// to load are skipped with a warning; each extraction itself is pure
/// and independent.
pub fn load_countries(
    data_dir: &Path,
    codes: &[String],
    level: u8,
) -> Vec<(String, Vec<Region>)> {
    codes
        .par_iter()
        .filter_map(|code| match country_regions(data_dir, code, level) {
            Ok(regions) => Some((code.clone(), regions)),
            Err(e) => {
                eprintln!("Warning: failed to load {code}: {e}");
                None
            }
        })
        .collect()
}
