//! Mock implementations for integration tests.
#![allow(dead_code)]

use anyhow::{Result, anyhow};
use errproxy::domain::ports::UnitSink;
use errproxy::domain::synthesizer::OutputUnit;

/// In-memory sink that keeps every rendered unit.
#[derive(Default)]
pub struct MemorySink {
    pub prepared: bool,
    pub files: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(file_name, _)| file_name == name)
            .map(|(_, text)| text.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl UnitSink for MemorySink {
    fn prepare(&mut self, _units: &[OutputUnit]) -> Result<()> {
        self.prepared = true;
        Ok(())
    }

    fn write(&mut self, unit: &OutputUnit) -> Result<()> {
        if !self.prepared {
            return Err(anyhow!("write before prepare: {}", unit.file_name));
        }
        self.files.push((unit.file_name.clone(), unit.render()));
        Ok(())
    }
}
