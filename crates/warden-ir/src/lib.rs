pub mod parse;
pub mod types;

pub use parse::{parse_file, parse_jff, parse_json};
