// Constants shared by the admin client crates

/// The default configuration file name.
/// Looked up in the current working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "neuron-admin.toml";

/// Environment prefix for configuration overrides (`NA__CLIENT__BASE_URL`).
pub const ENV_PREFIX: &str = "NA";

pub const API_PREFIX: &str = "/api/v2";

pub const BEARER_TOKEN: &str = "Bearer";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "neuron-admin.log";

/// Spreadsheet row number of the first data row (row 1 is the header).
pub const FIRST_DATA_ROW: usize = 2;

/// Separator between attribute labels in a tag sheet cell, e.g. `Read,Write`.
pub const TAG_ATTRIBUTE_SEPARATOR: char = ',';

/// Columns every tag sheet must carry.
pub const REQUIRED_TAG_COLUMNS: [&str; 5] = ["group", "name", "address", "attribute", "type"];

/// Full column order of the tag template.
pub const TAG_TEMPLATE_COLUMNS: [&str; 9] = [
    "group",
    "name",
    "address",
    "attribute",
    "type",
    "description",
    "decimal",
    "precision",
    "value",
];

/// Plugin schema keys that are not node configuration fields.
pub const SCHEMA_RESERVED_KEYS: [&str; 2] = ["tag_type", "params"];

/// Node setting key stripped before submission.
pub const TAG_REGEX_KEY: &str = "tag_regex";

pub const NODE_NAME_PLACEHOLDER: &str = "${node-name}";
pub const CLIENT_ID_PLACEHOLDER: &str = "{client-id}";

pub const DEFAULT_STATUS_REFRESH_SECS: u64 = 15;
pub const DEFAULT_PAGE_SIZE: u32 = 30;
