pub use super::common::*;
pub use super::node::*;
pub use super::plugin::*;
pub use super::tag::*;
