//! Gateway error code catalogue.
//!
//! Maps the numeric `error` field of API responses to a human readable
//! reason. Unknown codes resolve to the literal `"unknown"`.

/// Reason returned for codes outside the catalogue.
pub const UNKNOWN_REASON: &str = "unknown";

/// Device-side error codes that all share one reason.
pub const DEVICE_ERROR_RANGE: std::ops::RangeInclusive<i64> = 10701..=10744;

const ERROR_CODES: &[(i64, &str)] = &[
    (1001, "Internal error"),
    (1002, "Request body is invalid"),
    (1003, "Request parameter is invalid"),
    (1004, "Missing token"),
    (1005, "Failed to decode token"),
    (1006, "Token expired"),
    (1007, "Failed to validate token"),
    (1008, "Invalid token"),
    (1009, "Invalid username or password"),
    (1010, "Gateway is busy"),
    (1011, "File does not exist"),
    (2002, "Node already exists"),
    (2003, "Node does not exist"),
    (2004, "Node setting is invalid"),
    (2005, "Node setting not found"),
    (2006, "Node is not ready"),
    (2007, "Node is running"),
    (2008, "Node is not running"),
    (2009, "Node is stopped"),
    (2010, "Node name is too long"),
    (2011, "Node is not allowed to be deleted"),
    (2101, "Group already subscribed"),
    (2102, "Group not subscribed"),
    (2103, "Group already exists"),
    (2104, "Group parameter is invalid"),
    (2105, "Group is not allowed"),
    (2106, "Group does not exist"),
    (2107, "Group name is too long"),
    (2108, "Maximum number of groups reached"),
    (2201, "Tag does not exist"),
    (2202, "Tag name conflicts"),
    (2203, "Tag attribute is not supported"),
    (2204, "Tag type is not supported"),
    (2205, "Tag address format is invalid"),
    (2206, "Tag name is too long"),
    (2207, "Tag address is too long"),
    (2208, "Tag description is too long"),
    (2209, "Tag precision is invalid"),
    (2301, "Library not found"),
    (2302, "Library info is invalid"),
    (2303, "Library name conflicts"),
    (2304, "Failed to open library"),
    (2305, "Library module is invalid"),
    (2306, "Library is in use"),
    (2307, "System library cannot be deleted"),
    (3000, "Plugin read failure"),
    (3001, "Plugin write failure"),
    (3002, "Plugin is disconnected"),
    (3003, "Tag is not readable"),
    (3004, "Tag is not writable"),
    (3005, "Plugin does not support synchronous read"),
    (3006, "Plugin does not support writing tags"),
    (3007, "Tag value expired"),
    (3008, "Tag type mismatch"),
    (10701, "Device returned an error"),
];

/// Whether `code` is part of the catalogue (including the device range).
#[inline]
pub fn is_known_error_code(code: i64) -> bool {
    DEVICE_ERROR_RANGE.contains(&code) || ERROR_CODES.iter().any(|(c, _)| *c == code)
}

/// Human readable reason for a gateway error code.
pub fn error_message(code: i64) -> &'static str {
    let code = if DEVICE_ERROR_RANGE.contains(&code) {
        *DEVICE_ERROR_RANGE.start()
    } else {
        code
    };
    ERROR_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, msg)| *msg)
        .unwrap_or(UNKNOWN_REASON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_range_collapses_to_first_code() {
        let expected = error_message(10701);
        assert_ne!(expected, UNKNOWN_REASON);
        for code in 10701..=10744 {
            assert_eq!(error_message(code), expected, "code {code}");
            assert!(is_known_error_code(code));
        }
    }

    #[test]
    fn codes_outside_catalogue_are_unknown() {
        for code in [0, -1, 999, 10700, 10745, 99999] {
            assert_eq!(error_message(code), UNKNOWN_REASON, "code {code}");
            assert!(!is_known_error_code(code));
        }
    }

    #[test]
    fn known_code_has_specific_reason() {
        assert_eq!(error_message(2202), "Tag name conflicts");
        assert!(is_known_error_code(2202));
    }
}
