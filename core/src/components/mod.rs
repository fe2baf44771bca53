//! Global UI component manifest
//! Build-time only: maps component names to the module that defines them

pub mod dts;
pub mod registry;

pub use dts::render_dts;
pub use registry::{ComponentRegistry, ComponentSource, LibraryResolver, RegistryError};

use crate::config::ComponentsConfig;

/// Build the registry from `[components]` config.
///
/// With `scan` the local table comes from the component directories;
/// otherwise the built-in table is used. Configured library names are
/// added in both cases.
pub fn build_registry(config: &ComponentsConfig, scan: bool) -> Result<ComponentRegistry, RegistryError> {
    let mut registry = if scan {
        ComponentRegistry::scan(&config.root, &config.dirs)?
    } else {
        ComponentRegistry::builtin()
    };

    registry.add_library_components(&config.library, &LibraryResolver::ALL)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn scanned_registry_includes_configured_libraries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("components")).unwrap();
        std::fs::write(dir.path().join("components/Header.vue"), "<template/>").unwrap();

        let config = ComponentsConfig {
            root: dir.path().to_path_buf(),
            dirs: vec![PathBuf::from("components")],
            dts: dir.path().join("components.d.ts"),
            library: vec!["NLayout".to_string(), "RouterView".to_string()],
        };

        let registry = build_registry(&config, true).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.resolve("NLayout"),
            Some(&ComponentSource::package("naive-ui", "NLayout"))
        );
        assert!(registry.resolve("Header").is_some());
    }

    #[test]
    fn builtin_registry_when_not_scanning() {
        let registry = build_registry(&ComponentsConfig::default(), false).unwrap();
        assert_eq!(registry, ComponentRegistry::builtin());
    }
}
