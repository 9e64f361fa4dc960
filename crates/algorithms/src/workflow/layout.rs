//! Input and output directories under a base directory

use landex_core::Result;
use std::path::{Path, PathBuf};

/// `data/` holds per-country inputs, `processed/` receives outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub base: PathBuf,
    pub data: PathBuf,
    pub processed: PathBuf,
}

impl Layout {
    pub fn resolve<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref().to_path_buf();
        Self {
            data: base.join("data"),
            processed: base.join("processed"),
            base,
        }
    }

    /// Create both directories if missing. Safe to call repeatedly.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data)?;
        std::fs::create_dir_all(&self.processed)?;
        Ok(())
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data.join(name)
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.processed.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::resolve(dir.path());

        layout.ensure().unwrap();
        std::fs::write(layout.data_file("Laos.geojson"), "{}").unwrap();
        layout.ensure().unwrap();

        assert!(layout.processed.is_dir());
        assert!(layout.data_file("Laos.geojson").exists());
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn joins_names() {
        let layout = Layout::resolve("/srv/pv");
        assert_eq!(layout.data_file("Laos_EPSG.pkl"), PathBuf::from("/srv/pv/data/Laos_EPSG.pkl"));
        assert_eq!(
            layout.output_file("Laos_pv_exclusions.tif"),
            PathBuf::from("/srv/pv/processed/Laos_pv_exclusions.tif")
        );
    }
}
