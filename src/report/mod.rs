pub mod finding;
pub mod json;
pub mod merger;
pub mod parser;
pub mod terminal;
