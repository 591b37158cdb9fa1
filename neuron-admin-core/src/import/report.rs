use neuron_admin_error::import::{RejectReason, RowRejection};
use neuron_admin_models::{constants::FIRST_DATA_ROW, error_code::error_message};

pub const UPLOAD_SUCCESS: &str = "Tags uploaded successfully";

/// Message for a batch the gateway refused at `index` with `code`.
///
/// Index 0 means nothing of the batch was stored, so only the reason is
/// shown. Otherwise the 0-based index is mapped back to a sheet row.
pub fn partial_failure_message(index: usize, code: i64) -> String {
    let reason = error_message(code);
    if index == 0 {
        reason.to_string()
    } else {
        format!(
            "Partial upload failed at row {}: {reason}",
            index + FIRST_DATA_ROW
        )
    }
}

pub fn rejection_message(rejection: &RowRejection) -> String {
    let row = rejection.row;
    match &rejection.reason {
        reason if reason.is_row_data_error() => {
            format!("Row {row} data error, please check the table ({reason})")
        }
        RejectReason::TypeNotAllowed { allowed, .. } => format!(
            "Tag type error at row {row}, the plugin supports: {}",
            allowed.join(", ")
        ),
        RejectReason::StaticWithoutValue { name } => {
            format!("Row {row}: tag `{name}` has the static attribute and needs a numeric value")
        }
        reason => format!("Row {row}: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_index_maps_to_sheet_row() {
        assert_eq!(
            partial_failure_message(3, 2106),
            format!("Partial upload failed at row 5: {}", error_message(2106))
        );
        assert_eq!(partial_failure_message(0, 2106), error_message(2106));
    }

    #[test]
    fn device_codes_share_one_reason() {
        assert_eq!(
            partial_failure_message(1, 10744),
            partial_failure_message(1, 10701)
        );
        assert_eq!(partial_failure_message(0, 99999), "unknown");
    }

    #[test]
    fn rejection_messages_name_the_row() {
        let msg = rejection_message(&RowRejection::new(
            2,
            RejectReason::StaticWithoutValue { name: "t1".into() },
        ));
        assert!(msg.starts_with("Row 2:"));
        assert!(msg.contains("t1"));

        let msg = rejection_message(&RowRejection::new(
            7,
            RejectReason::UnknownType("float128".into()),
        ));
        assert!(msg.contains("Row 7 data error"));
    }
}
