pub mod types;
pub mod error;
pub mod parser;
pub mod validate;
pub mod dirstack;
pub mod config;
pub mod global;
pub mod builtin;
pub mod job;
pub mod eval;
