pub mod common;
pub mod node;
pub mod plugin;
pub mod prelude;
pub mod tag;
