use calamine::{open_workbook_auto, Data, Reader};
use neuron_admin_error::{import::ImportError, ImportResult};
use neuron_admin_models::domain::prelude::RawTagRow;
use serde_json::{Map, Number, Value as Json};
use std::path::Path;
use tracing::{debug, instrument};

/// Largest float that still converts to an integer without loss.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Read the first worksheet of a tag sheet (`.xlsx`, `.xls`, `.ods`).
///
/// The first row of the used range is the header; its cells become the
/// lower-cased keys of every following row. Empty cells are left out and
/// rows without any value are skipped. Each row keeps its 1-based sheet row
/// number.
#[instrument(name = "read-tag-sheet", skip_all, fields(path = %path.as_ref().display()))]
pub fn read_tag_sheet<P: AsRef<Path>>(path: P) -> ImportResult<Vec<RawTagRow>> {
    let mut workbook =
        open_workbook_auto(path.as_ref()).map_err(|e| ImportError::Read(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Read("workbook has no worksheet".to_string()))?
        .map_err(|e| ImportError::Read(e.to_string()))?;

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or_default();
    let mut rows = range.rows();
    let header: Vec<Option<String>> = match rows.next() {
        Some(cells) => cells.iter().map(header_key).collect(),
        None => return Ok(Vec::new()),
    };

    let mut out = Vec::new();
    for (offset, cells) in rows.enumerate() {
        let mut values = Map::new();
        for (key, cell) in header.iter().zip(cells) {
            let Some(key) = key else { continue };
            if let Some(value) = cell_value(cell) {
                values.insert(key.clone(), value);
            }
        }
        if values.is_empty() {
            continue;
        }
        // +1 for the header, +1 for 1-based numbering
        out.push(RawTagRow::new(first_row + offset + 2, values));
    }

    debug!("Read {} tag row(s)", out.len());
    Ok(out)
}

fn header_key(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let key = s.trim().to_lowercase();
            (!key.is_empty()).then_some(key)
        }
        Data::Empty => None,
        other => Some(other.to_string().trim().to_lowercase()),
    }
}

fn cell_value(cell: &Data) -> Option<Json> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Json::String(s.clone())),
        Data::Int(i) => Some(Json::from(*i)),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Some(Json::Bool(*b)),
        Data::DateTime(dt) => float_value(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Json::String(s.clone())),
    }
}

fn float_value(f: f64) -> Option<Json> {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        Some(Json::from(f as i64))
    } else {
        Number::from_f64(f).map(Json::Number)
    }
}
