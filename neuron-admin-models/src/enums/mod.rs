pub mod node;
pub mod param;
pub mod tag;
