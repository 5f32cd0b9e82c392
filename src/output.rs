//! Aggregated-table emission.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::aggregate::AggregateOutput;
use crate::constants::columns;
use crate::errors::PipelineError;

/// Write the aggregated count table as CSV with header
/// `pcn_code, <supplier columns...>, ICB`.
///
/// Every aggregated network is written, including those that match no
/// geometry. The file is written to a temporary sibling path and moved
/// into place on success, so a failed run never leaves a truncated table.
pub fn write_table(output: &AggregateOutput, path: &Path) -> Result<(), PipelineError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::Writer::from_writer(temp.as_file());

        let mut header: Vec<&str> = Vec::with_capacity(output.suppliers.len() + 2);
        header.push(columns::PCN_CODE);
        header.extend(output.suppliers.iter().map(String::as_str));
        header.push(columns::REGION_CODE);
        writer.write_record(&header).map_err(io::Error::other)?;

        for network in &output.networks {
            let mut row: Vec<String> = Vec::with_capacity(header.len());
            row.push(network.pcn_code.clone());
            for supplier in &output.suppliers {
                row.push(network.count(supplier).to_string());
            }
            row.push(network.region_code.clone());
            writer.write_record(&row).map_err(io::Error::other)?;
        }
        writer.flush()?;
    }
    temp.persist(path).map_err(|err| PipelineError::Io(err.error))?;
    info!(table = ?path, networks = output.networks.len(), "wrote aggregated table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregatedNetwork;
    use indexmap::IndexMap;
    use tempfile::tempdir;

    fn sample_output() -> AggregateOutput {
        let mut counts = IndexMap::new();
        counts.insert("EMIS".to_string(), 2u32);
        counts.insert("TPP".to_string(), 0u32);
        AggregateOutput {
            networks: vec![AggregatedNetwork {
                pcn_code: "N001".to_string(),
                region_code: "B01".to_string(),
                supplier_counts: counts,
            }],
            suppliers: vec!["EMIS".to_string(), "TPP".to_string()],
            total_supplier_a: 2,
            total_supplier_b: 0,
        }
    }

    #[test]
    fn writes_wide_header_and_one_row_per_network() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("counts.csv");
        write_table(&sample_output(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("pcn_code,EMIS,TPP,ICB"));
        assert_eq!(lines.next(), Some("N001,2,0,B01"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested/output/counts.csv");
        write_table(&sample_output(), &path).unwrap();
        assert!(path.is_file());
    }
}
