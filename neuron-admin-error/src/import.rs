use crate::api::ApiError;
use thiserror::Error;

/// Why a single spreadsheet row was refused during tag import.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectReason {
    #[error("unrecognized attribute `{0}`")]
    UnknownAttribute(String),
    #[error("unrecognized tag type `{0}`")]
    UnknownType(String),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("tag type `{tag_type}` is not supported by the plugin (allowed: {})", .allowed.join(", "))]
    TypeNotAllowed {
        tag_type: String,
        allowed: Vec<String>,
    },
    #[error("tag `{name}` has the static attribute but no numeric value")]
    StaticWithoutValue { name: String },
}

impl RejectReason {
    /// `true` for the reasons reported to users as a generic row data error.
    #[inline]
    pub fn is_row_data_error(&self) -> bool {
        matches!(
            self,
            RejectReason::UnknownAttribute(_)
                | RejectReason::UnknownType(_)
                | RejectReason::MissingField(_)
        )
    }
}

/// A rejected row together with its 1-based spreadsheet row number.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {row}: {reason}")]
pub struct RowRejection {
    pub row: usize,
    pub reason: RejectReason,
}

impl RowRejection {
    #[inline]
    pub fn new(row: usize, reason: RejectReason) -> Self {
        Self { row, reason }
    }
}

/// Failure of one group batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupFailureCause {
    #[error("{0}")]
    Rejected(#[from] RowRejection),
    #[error("{0}")]
    Api(#[from] ApiError),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("group `{group}`: {cause}")]
pub struct GroupFailure {
    pub group: String,
    pub cause: GroupFailureCause,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("no valid rows in the uploaded table")]
    EmptyTable,
    #[error("malformed table, missing columns: {}", .missing.join(", "))]
    MalformedTable { missing: Vec<String> },
    #[error("{0}")]
    Rejected(#[from] RowRejection),
    #[error(
        "{} group(s) failed, {} succeeded, first: {}",
        .failures.len(),
        .succeeded.len(),
        .failures.first().map(|f| f.to_string()).unwrap_or_default()
    )]
    Groups {
        failures: Vec<GroupFailure>,
        succeeded: Vec<String>,
    },
    #[error("failed to read table: {0}")]
    Read(String),
}

impl ImportError {
    /// First failure in group order, if this error came out of batch submission.
    pub fn first_failure(&self) -> Option<&GroupFailure> {
        match self {
            ImportError::Groups { failures, .. } => failures.first(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_data_error_classification() {
        assert!(RejectReason::UnknownAttribute("rw".into()).is_row_data_error());
        assert!(RejectReason::UnknownType("float128".into()).is_row_data_error());
        assert!(RejectReason::MissingField("name").is_row_data_error());
        assert!(!RejectReason::StaticWithoutValue { name: "t".into() }.is_row_data_error());
        assert!(!RejectReason::TypeNotAllowed {
            tag_type: "BIT".into(),
            allowed: vec!["INT16".into()],
        }
        .is_row_data_error());
    }

    #[test]
    fn groups_error_reports_first_failure() {
        let err = ImportError::Groups {
            failures: vec![GroupFailure {
                group: "g2".into(),
                cause: RowRejection::new(4, RejectReason::MissingField("address")).into(),
            }],
            succeeded: vec!["g1".into()],
        };
        assert_eq!(
            err.to_string(),
            "1 group(s) failed, 1 succeeded, first: group `g2`: row 4: missing field `address`"
        );
        assert_eq!(err.first_failure().map(|f| f.group.as_str()), Some("g2"));
    }
}
