pub mod constants;
pub mod domain;
pub mod enums;
pub mod error_code;
pub mod settings;
