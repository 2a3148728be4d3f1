// CSV ingestion for the three export sources.
//
// The geocoded-address table is a single file; trips and payments arrive as
// directories of per-period export files that get concatenated downstream.
// Malformed rows are skipped and counted rather than failing the load.
use crate::types::{RawGeocodeRow, RawPaymentRow, RawTripRow};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub geocoded_rows: usize,
    pub trip_files: usize,
    pub trip_rows: usize,
    pub payment_files: usize,
    pub payment_rows: usize,
    pub parse_errors: usize,
}

#[derive(Debug, Default)]
pub struct LoadedData {
    pub geocoded: Vec<RawGeocodeRow>,
    pub trip_tables: Vec<Vec<RawTripRow>>,
    pub payment_tables: Vec<Vec<RawPaymentRow>>,
}

fn read_rows<T: DeserializeOwned>(
    path: &Path,
    parse_errors: &mut usize,
) -> Result<Vec<T>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(_) => *parse_errors += 1,
        }
    }
    Ok(rows)
}

/// Every `*.csv` file directly under `dir`, one table per file, in file-name
/// order so repeated runs concatenate identically. A missing directory is
/// treated as zero tables, not an error.
fn read_csv_dir<T: DeserializeOwned>(
    dir: &Path,
    parse_errors: &mut usize,
) -> Result<Vec<Vec<T>>, Box<dyn Error>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "csv").unwrap_or(false))
        .collect();
    paths.sort();
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        tables.push(read_rows(&path, parse_errors)?);
    }
    Ok(tables)
}

/// Load the geocoded-address table plus all trip and payment exports found
/// under `data_dir` (`geocoded_addresses.csv`, `trips/*.csv`,
/// `payments/*.csv`).
pub fn load_all(data_dir: &Path) -> Result<(LoadedData, LoadReport), Box<dyn Error>> {
    let mut report = LoadReport::default();

    let geocoded = read_rows::<RawGeocodeRow>(
        &data_dir.join("geocoded_addresses.csv"),
        &mut report.parse_errors,
    )?;
    report.geocoded_rows = geocoded.len();

    let trip_tables =
        read_csv_dir::<RawTripRow>(&data_dir.join("trips"), &mut report.parse_errors)?;
    report.trip_files = trip_tables.len();
    report.trip_rows = trip_tables.iter().map(Vec::len).sum();

    let payment_tables =
        read_csv_dir::<RawPaymentRow>(&data_dir.join("payments"), &mut report.parse_errors)?;
    report.payment_files = payment_tables.len();
    report.payment_rows = payment_tables.iter().map(Vec::len).sum();

    Ok((
        LoadedData {
            geocoded,
            trip_tables,
            payment_tables,
        },
        report,
    ))
}
