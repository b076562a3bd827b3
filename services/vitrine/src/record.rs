//! Gallery record types

use serde::{Deserialize, Serialize};

/// One row of the project gallery table.
///
/// Field names match the hosted table's columns verbatim and round-trip
/// unchanged; `data` is an opaque date string, never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub nome: String,
    pub reacoes: i64,
    pub data: String,
    pub link: String,
}

/// Full ordered collection of rows fetched from the data table
pub type RecordSet = Vec<Record>;
