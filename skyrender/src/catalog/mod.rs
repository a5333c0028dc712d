//! Star catalog access.
//!
//! The catalog is a Parquet file whose first four columns are, in order,
//! RA, Dec, band 1 magnitude and band 2 magnitude (Tycho-2 BT and VT). Rows
//! are split into row groups carrying min/max statistics, which lets a query
//! skip every row group whose RA/Dec range cannot reach the query box.

pub mod interval;

use std::fs::File;
use std::path::{Path, PathBuf};

use parquet::basic::Type as PhysicalType;
use parquet::column::reader::{ColumnReader, ColumnReaderImpl};
use parquet::data_type::DataType;
use parquet::errors::ParquetError;
use parquet::file::metadata::RowGroupMetaData;
use parquet::file::reader::{FileReader, RowGroupReader, SerializedFileReader};
use parquet::file::statistics::Statistics;

use crate::error::{Error, Result};
use crate::footprint::SkyRegion;
pub use interval::{RaInterval, dec_contains, dec_intersects};


const RA_COLUMN: usize = 0;
const DEC_COLUMN: usize = 1;
const BAND1_COLUMN: usize = 2;
const BAND2_COLUMN: usize = 3;
const REQUIRED_COLUMNS: usize = 4;

/// Magnitude given to stars with neither band measured.
pub const UNKNOWN_MAGNITUDE: f64 = 999.0;

/// One catalog star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRecord {
    /// Right ascension in degrees.
    pub ra: f64,
    /// Declination in degrees.
    pub dec: f64,
    /// Visual magnitude, [`UNKNOWN_MAGNITUDE`] when unmeasured.
    pub v_mag: f64,
    /// B-V color index, 0 when either band is missing.
    pub bv: f64,
}

impl StarRecord {
    /// Builds a record from the two magnitude bands.
    ///
    /// Band 2 is the visual band and wins when present.
    pub fn from_bands(ra: f64, dec: f64, band1: Option<f64>, band2: Option<f64>) -> Self {
        let v_mag = band2.or(band1).unwrap_or(UNKNOWN_MAGNITUDE);
        let bv = match (band1, band2) {
            (Some(b), Some(v)) => b - v,
            _ => 0.0,
        };

        Self { ra, dec, v_mag, bv }
    }
}

/// Read access to a Parquet star catalog.
pub struct CatalogReader {
    path: PathBuf,
    reader: SerializedFileReader<File>,
}

impl std::fmt::Debug for CatalogReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogReader")
            .field("path", &self.path)
            .field("row_groups", &self.num_row_groups())
            .finish()
    }
}

impl CatalogReader {
    /// Opens a catalog and checks its schema.
    ///
    /// Fails when the file is missing, is not a Parquet file, has fewer than
    /// four columns, or any of the first four columns is not floating point.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(Error::CatalogNotFound { path });
        }

        let file = File::open(&path).map_err(|source| Error::CatalogOpen {
            path: path.clone(),
            source,
        })?;
        let reader = SerializedFileReader::new(file).map_err(|source| Error::CatalogRead {
            path: path.clone(),
            source,
        })?;

        let schema = reader.metadata().file_metadata().schema_descr();
        if schema.num_columns() < REQUIRED_COLUMNS {
            return Err(Error::TooFewColumns {
                path,
                found: schema.num_columns(),
            });
        }

        for index in 0..REQUIRED_COLUMNS {
            let column = schema.column(index);
            if !matches!(
                column.physical_type(),
                PhysicalType::DOUBLE | PhysicalType::FLOAT
            ) {
                return Err(Error::UnsupportedColumnType {
                    path,
                    index,
                    name: column.name().to_string(),
                });
            }
        }

        tracing::debug!(
            "Opened star catalog {} with {} row groups",
            path.display(),
            reader.metadata().num_row_groups()
        );

        Ok(Self { path, reader })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn num_row_groups(&self) -> usize {
        self.reader.metadata().num_row_groups()
    }

    /// Lazily streams the stars inside the RA/Dec box.
    ///
    /// `ra_min > ra_max` selects a box wrapping through RA 0, and `[0, 360]`
    /// selects every RA. Row groups are read one at a time as the stream is
    /// pulled, so dropping the stream early stops all further I/O.
    pub fn stream_in_region(
        &self,
        ra_min: f64,
        ra_max: f64,
        dec_min: f64,
        dec_max: f64,
    ) -> StarStream<'_> {
        StarStream {
            catalog: self,
            ra: RaInterval::new(ra_min, ra_max),
            dec_min,
            dec_max,
            next_group: 0,
            pending: Vec::new().into_iter(),
        }
    }

    /// Streams the stars inside a footprint.
    pub fn stream_region(&self, region: &SkyRegion) -> StarStream<'_> {
        self.stream_in_region(
            region.ra_min,
            region.ra_max,
            region.dec_min,
            region.dec_max,
        )
    }

    fn read_error(&self, source: ParquetError) -> Error {
        Error::CatalogRead {
            path: self.path.clone(),
            source,
        }
    }
}

/// Pull-based sequence of catalog stars inside a query box.
///
/// Yields `Err` when a row group fails to decode; the stream may be pulled
/// again afterwards to continue with the next row group.
pub struct StarStream<'a> {
    catalog: &'a CatalogReader,
    ra: RaInterval,
    dec_min: f64,
    dec_max: f64,
    next_group: usize,
    pending: std::vec::IntoIter<StarRecord>,
}

impl StarStream<'_> {
    /// Whether the statistics of a row group allow any star inside the box.
    ///
    /// Row groups without usable statistics are skipped.
    fn group_may_intersect(&self, group: &RowGroupMetaData, index: usize) -> bool {
        let (Some((ra_lo, ra_hi)), Some((dec_lo, dec_hi))) = (
            column_range(group, RA_COLUMN),
            column_range(group, DEC_COLUMN),
        ) else {
            tracing::warn!(
                "Row group {} of {} has no RA/Dec statistics, skipping",
                index,
                self.catalog.path.display()
            );
            return false;
        };

        RaInterval::new(ra_lo, ra_hi).intersects(&self.ra)
            && dec_intersects(dec_lo, dec_hi, self.dec_min, self.dec_max)
    }

    fn read_group(&self, index: usize) -> Result<Vec<StarRecord>> {
        let catalog = self.catalog;
        let num_rows = catalog.reader.metadata().row_group(index).num_rows() as usize;
        let group = catalog
            .reader
            .get_row_group(index)
            .map_err(|e| catalog.read_error(e))?;

        let read = |column| {
            read_float_column(group.as_ref(), column, num_rows).map_err(|e| catalog.read_error(e))
        };
        let ra = read(RA_COLUMN)?;
        let dec = read(DEC_COLUMN)?;
        let band1 = read(BAND1_COLUMN)?;
        let band2 = read(BAND2_COLUMN)?;

        let stars = ra
            .into_iter()
            .zip(dec)
            .zip(band1.into_iter().zip(band2))
            .filter_map(|((ra, dec), (band1, band2))| {
                let (ra, dec) = (ra?, dec?);
                (self.ra.contains(ra) && dec_contains(self.dec_min, self.dec_max, dec))
                    .then(|| StarRecord::from_bands(ra, dec, band1, band2))
            })
            .collect();

        Ok(stars)
    }
}

impl Iterator for StarStream<'_> {
    type Item = Result<StarRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(star) = self.pending.next() {
                return Some(Ok(star));
            }

            let catalog = self.catalog;
            let metadata = catalog.reader.metadata();
            if self.next_group >= metadata.num_row_groups() {
                return None;
            }

            let index = self.next_group;
            self.next_group += 1;

            if !self.group_may_intersect(metadata.row_group(index), index) {
                continue;
            }

            match self.read_group(index) {
                Ok(stars) => self.pending = stars.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Min/max statistics of a floating-point column, if recorded.
fn column_range(group: &RowGroupMetaData, column: usize) -> Option<(f64, f64)> {
    match group.column(column).statistics()? {
        Statistics::Double(stats) => Some((*stats.min_opt()?, *stats.max_opt()?)),
        Statistics::Float(stats) => Some((
            f64::from(*stats.min_opt()?),
            f64::from(*stats.max_opt()?),
        )),
        _ => None,
    }
}

/// Reads a whole column of a row group, one entry per row, `None` for nulls.
fn read_float_column(
    group: &dyn RowGroupReader,
    column: usize,
    num_rows: usize,
) -> parquet::errors::Result<Vec<Option<f64>>> {
    let max_def_level = group.metadata().schema_descr().column(column).max_def_level();

    match group.get_column_reader(column)? {
        ColumnReader::DoubleColumnReader(mut reader) => {
            read_values(&mut reader, max_def_level, num_rows, |v| v)
        }
        ColumnReader::FloatColumnReader(mut reader) => {
            read_values(&mut reader, max_def_level, num_rows, f64::from)
        }
        _ => Err(ParquetError::General(format!(
            "column {} is not a floating-point column",
            column
        ))),
    }
}

fn read_values<T: DataType>(
    reader: &mut ColumnReaderImpl<T>,
    max_def_level: i16,
    num_rows: usize,
    convert: impl Fn(T::T) -> f64,
) -> parquet::errors::Result<Vec<Option<f64>>> {
    let nullable = max_def_level > 0;
    let mut values = Vec::with_capacity(num_rows);
    let mut def_levels = Vec::with_capacity(if nullable { num_rows } else { 0 });

    let mut rows = 0;
    while rows < num_rows {
        let (read, _, _) = reader.read_records(
            num_rows - rows,
            nullable.then_some(&mut def_levels),
            None,
            &mut values,
        )?;
        if read == 0 {
            break;
        }
        rows += read;
    }

    if !nullable {
        return Ok(values.into_iter().map(|v| Some(convert(v))).collect());
    }

    let mut values = values.into_iter().map(convert);
    Ok(def_levels
        .iter()
        .map(|&level| {
            if level == max_def_level {
                values.next()
            } else {
                None
            }
        })
        .collect())
}
