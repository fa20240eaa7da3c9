pub mod compile;
pub mod graph;
pub mod matcher;
pub mod validate;

pub use compile::{compile, load};
pub use graph::AutomatonModel;
