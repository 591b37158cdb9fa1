pub mod import;
pub mod node_config;
pub mod plugin;
pub mod south_driver;
pub mod template;

// Re-export commonly used types
pub use import::{ImportReport, TagImporter};
pub use node_config::NodeConfigService;
pub use plugin::PluginManager;
pub use south_driver::SouthDriverList;
pub use template::write_tag_template;
