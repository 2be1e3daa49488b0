use crate::domain::error::Result;
use crate::domain::synthesizer::OutputUnit;
use crate::domain::types::{MethodSelection, NamedType, TypeExpr};

/// Type-system query port (implemented by Infrastructure)
pub trait TypeQuery {
    /// Full method set of `ty`, promoted methods included, sorted by name.
    fn method_set(&self, ty: &TypeExpr) -> Result<Vec<MethodSelection>>;

    /// Underlying representation of a named type. Never itself a named type.
    fn underlying(&self, named: &NamedType) -> Result<TypeExpr>;

    /// Short package name for an import path (`example.com/shop` -> `shop`).
    fn package_name(&self, path: &str) -> Result<String>;
}

/// Destination for synthesized output units
pub trait UnitSink {
    /// Called once with every planned unit before the first one is written.
    /// Fails without side effects when any of them cannot be written.
    fn prepare(&mut self, units: &[OutputUnit]) -> anyhow::Result<()>;

    fn write(&mut self, unit: &OutputUnit) -> anyhow::Result<()>;
}
