pub mod error;
pub mod types;
pub mod ports;
pub mod catalog;
pub mod walker;
pub mod classifier;
pub mod propagation;
pub mod naming;
pub mod synthesizer;
pub mod analysis;
