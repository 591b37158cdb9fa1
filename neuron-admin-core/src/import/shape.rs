use neuron_admin_error::{import::ImportError, ImportResult};
use neuron_admin_models::{constants::REQUIRED_TAG_COLUMNS, domain::prelude::RawTagRow};

/// Check that the table is non-empty and that its first row carries every
/// required column. Later rows are not inspected.
pub fn check_tag_table(rows: &[RawTagRow]) -> ImportResult<()> {
    let first = rows.first().ok_or(ImportError::EmptyTable)?;
    let missing: Vec<String> = REQUIRED_TAG_COLUMNS
        .iter()
        .filter(|column| !first.values.contains_key(**column))
        .map(|column| column.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MalformedTable { missing })
    }
}
