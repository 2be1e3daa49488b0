use crate::codegen::GENERATED_HEADER;
use crate::domain::error::ProxyError;
use crate::domain::ports::UnitSink;
use crate::domain::synthesizer::OutputUnit;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File system sink for generated units.
///
/// Only files that start with the generated header are ever deleted or overwritten.
pub struct GeneratedDirWriter {
    dir: PathBuf,
}

impl GeneratedDirWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

/// True when `path` holds a previously generated unit.
pub fn is_generated(path: &Path) -> Result<bool> {
    let content = fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content.starts_with(GENERATED_HEADER.as_bytes()))
}

impl UnitSink for GeneratedDirWriter {
    fn prepare(&mut self, units: &[OutputUnit]) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create output directory: {}", self.dir.display())
            })?;
            info!(dir = %self.dir.display(), "created output directory");
            return Ok(());
        }

        // Nothing is touched until every planned target is known to be ours.
        for unit in units {
            let path = self.dir.join(&unit.file_name);
            if path.exists() && !is_generated(&path)? {
                return Err(ProxyError::ForeignFile(path).into());
            }
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list output directory: {}", self.dir.display()))?;
        let mut stale = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "go") {
                continue;
            }
            if is_generated(&path)? {
                stale.push(path);
            } else {
                warn!(file = %path.display(), "leaving non-generated file in output directory");
            }
        }

        for path in &stale {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        debug!(dir = %self.dir.display(), removed = stale.len(), "cleared generated units");
        Ok(())
    }

    fn write(&mut self, unit: &OutputUnit) -> Result<()> {
        let path = self.dir.join(&unit.file_name);
        if path.exists() && !is_generated(&path)? {
            return Err(ProxyError::ForeignFile(path).into());
        }

        fs::write(&path, unit.render())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(file = %path.display(), proxy = %unit.proxy_name, "wrote unit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ast::GoFile;
    use crate::codegen::GENERATED_COMMENT;

    fn unit(file_name: &str) -> OutputUnit {
        let mut file = GoFile::new("proxies");
        file.package_comment = Some(GENERATED_COMMENT.to_string());
        OutputUnit {
            file_name: file_name.to_string(),
            root_key: "example.com/shop.Cart".to_string(),
            proxy_name: "ShopCart".to_string(),
            variants: vec!["*example.com/shop.Cart".to_string()],
            file,
        }
    }

    #[test]
    fn test_prepare_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("proxies");
        let mut writer = GeneratedDirWriter::new(&dir);
        writer.prepare(&[unit("shop_cart.go")]).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_prepare_removes_only_generated_units() {
        let tmp = tempfile::tempdir().unwrap();
        let generated = tmp.path().join("shop_cart.go");
        let manual = tmp.path().join("helpers.go");
        let notes = tmp.path().join("notes.txt");
        fs::write(&generated, format!("{GENERATED_HEADER}\npackage proxies\n")).unwrap();
        fs::write(&manual, "package proxies\n").unwrap();
        fs::write(&notes, format!("{GENERATED_HEADER}\n")).unwrap();

        GeneratedDirWriter::new(tmp.path())
            .prepare(&[unit("shop_cart.go")])
            .unwrap();

        assert!(!generated.exists());
        assert!(manual.exists());
        assert!(notes.exists());
    }

    #[test]
    fn test_prepare_refuses_before_touching_anything() {
        let tmp = tempfile::tempdir().unwrap();
        let stale = tmp.path().join("shop_order.go");
        let manual = tmp.path().join("shop_cart.go");
        fs::write(&stale, format!("{GENERATED_HEADER}\npackage proxies\n")).unwrap();
        fs::write(&manual, "package proxies\n").unwrap();

        let mut writer = GeneratedDirWriter::new(tmp.path());
        let err = writer
            .prepare(&[unit("shop_order.go"), unit("shop_cart.go")])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProxyError>(),
            Some(ProxyError::ForeignFile(path)) if *path == manual
        ));

        assert!(stale.exists());
        assert_eq!(fs::read_to_string(&manual).unwrap(), "package proxies\n");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_write_refuses_to_clobber_hand_written_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("shop_cart.go"), "package proxies\n").unwrap();

        let mut writer = GeneratedDirWriter::new(tmp.path());
        let err = writer.write(&unit("shop_cart.go")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProxyError>(),
            Some(ProxyError::ForeignFile(_))
        ));
    }

    #[test]
    fn test_write_replaces_generated_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("shop_cart.go");
        fs::write(&path, format!("{GENERATED_HEADER}\npackage old\n")).unwrap();

        let mut writer = GeneratedDirWriter::new(tmp.path());
        writer.write(&unit("shop_cart.go")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(GENERATED_HEADER));
        assert!(content.contains("package proxies"));
    }
}
