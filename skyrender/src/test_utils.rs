//! Parquet catalog fixtures for tests.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use parquet::data_type::{DoubleType, FloatType};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use common::test_utils::test_output_path;

const DOUBLE_SCHEMA: &str = "
    message tycho {
        REQUIRED DOUBLE ra;
        REQUIRED DOUBLE dec;
        OPTIONAL DOUBLE bt;
        OPTIONAL DOUBLE vt;
    }
";

const FLOAT_SCHEMA: &str = "
    message tycho {
        REQUIRED FLOAT ra;
        REQUIRED FLOAT dec;
        OPTIONAL FLOAT bt;
        OPTIONAL FLOAT vt;
    }
";

/// One catalog row: RA, Dec, BT, VT.
#[derive(Debug, Clone, Copy)]
pub struct Row {
    pub ra: f64,
    pub dec: f64,
    pub bt: Option<f64>,
    pub vt: Option<f64>,
}

impl Row {
    pub fn new(ra: f64, dec: f64, bt: Option<f64>, vt: Option<f64>) -> Self {
        Self { ra, dec, bt, vt }
    }

    /// A row with both bands set to `mag`.
    pub fn star(ra: f64, dec: f64, mag: f64) -> Self {
        Self::new(ra, dec, Some(mag), Some(mag))
    }

    fn cell(&self, column: usize) -> Option<f64> {
        match column {
            0 => Some(self.ra),
            1 => Some(self.dec),
            2 => self.bt,
            3 => self.vt,
            _ => unreachable!("catalog fixture has four columns"),
        }
    }
}

/// Options for [`write_catalog_with`].
#[derive(Debug, Clone, Copy)]
pub struct CatalogOptions {
    pub statistics: bool,
    pub single_precision: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            statistics: true,
            single_precision: false,
        }
    }
}

/// Writes a catalog with one row group per entry of `groups`.
pub fn write_catalog(name: &str, groups: &[Vec<Row>]) -> PathBuf {
    write_catalog_with(name, groups, CatalogOptions::default())
}

pub fn write_catalog_with(name: &str, groups: &[Vec<Row>], options: CatalogOptions) -> PathBuf {
    let path = test_output_path(name);
    let schema = if options.single_precision {
        FLOAT_SCHEMA
    } else {
        DOUBLE_SCHEMA
    };
    let schema = Arc::new(parse_message_type(schema).unwrap());
    let statistics = if options.statistics {
        EnabledStatistics::Chunk
    } else {
        EnabledStatistics::None
    };
    let props = Arc::new(
        WriterProperties::builder()
            .set_statistics_enabled(statistics)
            .build(),
    );

    let file = File::create(&path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    for group in groups {
        let mut row_group = writer.next_row_group().unwrap();
        let mut column_index = 0;

        while let Some(mut column) = row_group.next_column().unwrap() {
            let cells: Vec<Option<f64>> = group.iter().map(|row| row.cell(column_index)).collect();
            let def_levels: Vec<i16> = cells.iter().map(|c| i16::from(c.is_some())).collect();
            // RA and Dec are REQUIRED and take no definition levels
            let def_levels = (column_index >= 2).then_some(def_levels.as_slice());

            if options.single_precision {
                let values: Vec<f32> = cells.iter().flatten().map(|&v| v as f32).collect();
                column
                    .typed::<FloatType>()
                    .write_batch(&values, def_levels, None)
                    .unwrap();
            } else {
                let values: Vec<f64> = cells.iter().flatten().copied().collect();
                column
                    .typed::<DoubleType>()
                    .write_batch(&values, def_levels, None)
                    .unwrap();
            }

            column.close().unwrap();
            column_index += 1;
        }

        row_group.close().unwrap();
    }

    writer.close().unwrap();
    path
}

/// Writes a Parquet file with the given schema and no row groups.
pub fn write_schema_only(name: &str, message: &str) -> PathBuf {
    let path = test_output_path(name);
    let schema = Arc::new(parse_message_type(message).unwrap());
    let file = File::create(&path).unwrap();
    let mut writer =
        SerializedFileWriter::new(file, schema, Arc::new(WriterProperties::default())).unwrap();
    writer.close().unwrap();
    path
}
