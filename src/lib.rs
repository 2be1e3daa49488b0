//! errproxy library: type-graph analysis and generation of error-transforming proxies.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod codegen;
pub mod domain;
