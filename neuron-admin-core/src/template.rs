use neuron_admin_error::{NAError, NAResult};
use neuron_admin_models::constants::TAG_TEMPLATE_COLUMNS;
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, XlsxError};
use std::path::Path;
use tracing::info;

const SAMPLE_ROW: [&str; 9] = [
    "group-1",
    "tag-1",
    "1!400001",
    "Read,Write",
    "INT16",
    "sample tag",
    "",
    "",
    "",
];

const COLUMN_WIDTH: f64 = 16.0;

fn spreadsheet_error(e: XlsxError) -> NAError {
    NAError::SpreadsheetError(e.to_string())
}

/// Write an empty tag sheet with the import header, optionally followed by
/// one sample row.
pub fn write_tag_template<P: AsRef<Path>>(path: P, sample: bool) -> NAResult<()> {
    let mut workbook = Workbook::new();
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xE6F7FF))
        .set_pattern(FormatPattern::Solid);
    let worksheet = workbook.add_worksheet();

    for (col, name) in TAG_TEMPLATE_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *name, &header)
            .map_err(spreadsheet_error)?;
        worksheet
            .set_column_width(col, COLUMN_WIDTH)
            .map_err(spreadsheet_error)?;
    }

    if sample {
        for (col, value) in SAMPLE_ROW.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(1, col as u16, *value)
                .map_err(spreadsheet_error)?;
        }
    }

    workbook.save(path.as_ref()).map_err(spreadsheet_error)?;
    info!("Tag template written to {}", path.as_ref().display());
    Ok(())
}
