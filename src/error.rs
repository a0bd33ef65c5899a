use thiserror::Error;

/// Errors surfaced by the extraction and rendering pipeline.
#[derive(Error, Debug)]
pub enum MapError {
    #[error(
        "could not find shapefiles for {country} at level {level}: \
         download the GADM archive first ({country}_adm{level}.shp/.shx/.dbf \
         are expected under the data directory)"
    )]
    MissingSourceData { country: String, level: u8 },

    #[error("style count mismatch: {expected} regions but {got} per-region values")]
    StyleCountMismatch { expected: usize, got: usize },

    #[error("shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
