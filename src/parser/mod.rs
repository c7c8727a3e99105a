//! Parsing of the two comma-separated input tables
//!
//! The events table maps molecules to observed adverse events and has no
//! header. The results table maps molecules to predicted targets, carries
//! a header row and eight columns of which only four are consumed
//! downstream. Parsing produces plain record structs; the association
//! index is built from those in a separate step.

use std::io::Read;

use tracing::info;

use crate::associations::{EventId, MoleculeId, TargetId, TargetInfo};
use crate::{EfaError, EfaResult};

/// Number of columns of the results table
const RESULT_ROW_FIELDS: usize = 8;

/// One row of the events table: a molecule exhibiting an event
///
/// Extra columns beyond the first two are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    molecule: MoleculeId,
    event: EventId,
}

impl EventRecord {
    /// Creates a record from its two identifiers
    pub fn new(molecule: &str, event: &str) -> Self {
        EventRecord {
            molecule: molecule.into(),
            event: event.into(),
        }
    }

    /// The molecule identifier
    pub fn molecule(&self) -> &MoleculeId {
        &self.molecule
    }

    /// The event identifier
    pub fn event(&self) -> &EventId {
        &self.event
    }
}

/// One data row of the results table: a molecule predicted to bind a target
///
/// The raw table also carries SMILES, affinity, p-value and max-Tc
/// columns; those are validated to be present but not consumed by the
/// enrichment pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    molecule: MoleculeId,
    target: TargetId,
    name: String,
    description: String,
}

impl ResultRecord {
    /// Creates a record from the consumed subset of columns
    pub fn new(molecule: &str, target: &str, name: &str, description: &str) -> Self {
        ResultRecord {
            molecule: molecule.into(),
            target: target.into(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// The molecule identifier
    pub fn molecule(&self) -> &MoleculeId {
        &self.molecule
    }

    /// The target identifier
    pub fn target(&self) -> &TargetId {
        &self.target
    }

    /// The display name and description columns
    pub fn info(&self) -> TargetInfo {
        TargetInfo::new(&self.name, &self.description)
    }
}

/// Reads the events table
///
/// Every row must have at least two fields: molecule identifier and event
/// identifier. There is no header row.
///
/// # Errors
///
/// [`EfaError::Csv`] on unreadable input, [`EfaError::MalformedRow`] on
/// rows with fewer than two fields.
pub fn read_events<R: Read>(reader: R) -> EfaResult<Vec<EventRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, row) in csv_reader.records().enumerate() {
        let row = row?;
        if row.len() < 2 {
            return Err(EfaError::MalformedRow {
                row: idx as u64 + 1,
                expected: 2,
                found: row.len(),
            });
        }
        records.push(EventRecord::new(&row[0], &row[1]));
    }
    Ok(records)
}

/// Reads the results table
///
/// The first row is a header; it is logged verbatim and skipped. Data
/// rows must have exactly the eight columns
/// `(molecule, smiles, target, affinity, pvalue, max_tc, name, description)`.
///
/// # Errors
///
/// [`EfaError::Csv`] on unreadable input, [`EfaError::MalformedRow`] on
/// rows with the wrong number of fields.
pub fn read_results<R: Read>(reader: R) -> EfaResult<Vec<ResultRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = csv_reader.records();
    if let Some(header) = rows.next() {
        let header = header?;
        info!("Skipping results header: {:?}", header.iter().collect::<Vec<_>>());
    }

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        let row = row?;
        if row.len() != RESULT_ROW_FIELDS {
            return Err(EfaError::MalformedRow {
                row: idx as u64 + 2,
                expected: RESULT_ROW_FIELDS,
                found: row.len(),
            });
        }
        records.push(ResultRecord::new(&row[0], &row[2], &row[6], &row[7]));
    }
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;

    const EVENTS: &str = "m1,nausea\nm2,nausea,extra,columns\nm2,rash\n";

    const RESULTS: &str = "\
compound_id,smiles,target_id,affinity,pvalue,maxtc,name,description
m1,CCO,P08908,10,1.2e-8,0.57,5-HT1A,serotonin receptor 1A
m2,CCN,P08908,10,3.1e-5,0.44,5-HT1A,serotonin receptor 1A
";

    #[test]
    fn events_rows_parse() {
        let records = read_events(EVENTS.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], EventRecord::new("m1", "nausea"));
        // extra columns are ignored
        assert_eq!(records[1], EventRecord::new("m2", "nausea"));
    }

    #[test]
    fn events_short_row_is_an_error() {
        let err = read_events("m1,nausea\nm2\n".as_bytes()).unwrap_err();
        match err {
            EfaError::MalformedRow { row, expected, found } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn results_header_is_skipped() {
        let records = read_results(RESULTS.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            ResultRecord::new("m1", "P08908", "5-HT1A", "serotonin receptor 1A")
        );
    }

    #[test]
    fn results_wrong_width_is_an_error() {
        let input = "h1,h2,h3,h4,h5,h6,h7,h8\nm1,CCO,P08908,10\n";
        let err = read_results(input.as_bytes()).unwrap_err();
        match err {
            EfaError::MalformedRow { row, expected, found } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 8);
                assert_eq!(found, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn results_empty_input_is_empty() {
        assert!(read_results("".as_bytes()).unwrap().is_empty());
    }
}
