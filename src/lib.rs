mod browser;
mod classifier;
mod db;
mod error;
mod helpers;
mod literal;
mod os;
mod parser;
mod parser_data;
mod registry;
mod substitution;
mod types;

pub use classifier::{classify, classify_with_platform, shared, Classifier};
pub use error::{Error, Result};
pub use registry::Registry;
pub use types::*;
