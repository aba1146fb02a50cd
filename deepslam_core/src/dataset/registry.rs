// deepslam_core/src/dataset/registry.rs

use std::collections::HashMap;
use std::path::PathBuf;

use super::{DatasetError, DatasetKind, FrameSource, KittiRaw, NyuV2, ScanNet, TumRgbd};

/// Builds an adapter for a dataset rooted at the given directory.
pub type SourceConstructor = Box<dyn Fn(PathBuf) -> Box<dyn FrameSource> + Send + Sync>;

/// Maps dataset identifiers to adapter constructors. Resolved once at startup.
pub struct DatasetRegistry {
    constructors: HashMap<DatasetKind, SourceConstructor>,
}

impl DatasetRegistry {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A registry with an adapter for every [`DatasetKind`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(DatasetKind::Kitti, |root| Box::new(KittiRaw::new(root)));
        registry.register(DatasetKind::Nyu, |root| Box::new(NyuV2::new(root)));
        registry.register(DatasetKind::Scannet, |root| Box::new(ScanNet::new(root)));
        registry.register(DatasetKind::Tum, |root| Box::new(TumRgbd::new(root)));
        registry
    }

    /// Registers (or replaces) the constructor for `kind`.
    pub fn register<F>(&mut self, kind: DatasetKind, constructor: F)
    where
        F: Fn(PathBuf) -> Box<dyn FrameSource> + Send + Sync + 'static,
    {
        self.constructors.insert(kind, Box::new(constructor));
    }

    pub fn contains(&self, kind: DatasetKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Builds the adapter for `kind`.
    pub fn build(
        &self,
        kind: DatasetKind,
        root: impl Into<PathBuf>,
    ) -> Result<Box<dyn FrameSource>, DatasetError> {
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| DatasetError::Unsupported(kind.to_string()))?;
        Ok(constructor(root.into()))
    }

    /// Resolves a textual identifier such as `"tum"` and builds its adapter.
    pub fn open(
        &self,
        name: &str,
        root: impl Into<PathBuf>,
    ) -> Result<Box<dyn FrameSource>, DatasetError> {
        let kind: DatasetKind = name.parse()?;
        self.build(kind, root)
    }
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_kind() {
        let registry = DatasetRegistry::with_defaults();
        for kind in DatasetKind::ALL {
            assert!(registry.contains(kind));
            let source = registry.build(kind, "/data").unwrap();
            assert_eq!(source.kind(), kind);
            assert_eq!(source.root(), std::path::Path::new("/data"));
        }
    }

    #[test]
    fn test_open_unknown_name() {
        let registry = DatasetRegistry::with_defaults();
        assert!(matches!(
            registry.open("euroc", "/data"),
            Err(DatasetError::Unsupported(_))
        ));
    }

    #[test]
    fn test_unregistered_kind_is_unsupported() {
        let mut registry = DatasetRegistry::empty();
        registry.register(DatasetKind::Tum, |root| Box::new(TumRgbd::new(root)));
        assert!(registry.open("tum", "/data").is_ok());
        match registry.open("kitti", "/data") {
            Err(DatasetError::Unsupported(name)) => assert_eq!(name, "kitti"),
            Err(other) => panic!("expected Unsupported, got {:?}", other),
            Ok(_) => panic!("kitti should not be registered"),
        }
    }
}
