//! File loader for assumption sets
//!
//! Assumption sets are stored as JSON documents in the same camelCase shape the
//! calculator saves drafts in. Additional cash flows can also come from a CSV
//! with `date,description,type,amount` columns.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::investment::{AdditionalCashFlow, InvestmentAssumptions};
use super::rental::RentalAssumptions;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let reader = BufReader::new(open(path)?);
    serde_json::from_reader(reader).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a flip analysis from a JSON file
pub fn load_investment(path: &Path) -> Result<InvestmentAssumptions, LoadError> {
    let assumptions: InvestmentAssumptions = load_json(path)?;
    log::info!(
        "Loaded investment assumptions from {} ({} additional cash flows)",
        path.display(),
        assumptions.additional_cash_flows.len()
    );
    Ok(assumptions)
}

/// Load a rental pro forma from a JSON file
pub fn load_rental(path: &Path) -> Result<RentalAssumptions, LoadError> {
    let assumptions: RentalAssumptions = load_json(path)?;
    log::info!("Loaded rental assumptions from {} ({} keys)", path.display(), assumptions.keys);
    Ok(assumptions)
}

/// Load additional cash flows from CSV
pub fn load_additional_cash_flows(path: &Path) -> Result<Vec<AdditionalCashFlow>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    let mut flows = Vec::new();
    for result in reader.deserialize() {
        let flow: AdditionalCashFlow = result.map_err(csv_err)?;
        flows.push(flow);
    }

    log::debug!("Read {} additional cash flows from {}", flows.len(), path.display());
    Ok(flows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::FlowDirection;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("property_returns_{}_{}", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_rental_round_trip() {
        let original = RentalAssumptions::reference_apartment();
        let path = temp_file("rental.json", &serde_json::to_string_pretty(&original).unwrap());

        let loaded = load_rental(&path).unwrap();
        assert_eq!(loaded, original);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_cash_flow_csv() {
        let path = temp_file(
            "flows.csv",
            "date,description,type,amount\n\
             2026-02-01, Furniture Package, outflow, 150000000\n\
             2026-09-01, Interim rental, inflow, 40000000\n",
        );

        let flows = load_additional_cash_flows(&path).unwrap();
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].description, "Furniture Package");
        assert_eq!(flows[0].direction, FlowDirection::Outflow);
        assert_eq!(flows[1].signed_amount(), 40_000_000.0);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_investment(Path::new("/nonexistent/investment.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let path = temp_file("broken.json", "{ \"totalPrice\": ");
        let err = load_investment(&path).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        std::fs::remove_file(path).ok();
    }
}
