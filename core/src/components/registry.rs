//! Component name resolution table

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Where a globally registered component is defined
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentSource {
    /// Single-file component, path relative to the manifest (`./components/Footer.vue`)
    Local { path: String },
    /// Named export of a package (`naive-ui` / `NButton`)
    Package { package: String, export: String },
}

impl ComponentSource {
    pub fn local(path: impl Into<String>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn package(package: impl Into<String>, export: impl Into<String>) -> Self {
        Self::Package {
            package: package.into(),
            export: export.into(),
        }
    }
}

/// Resolvers for third-party component libraries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryResolver {
    NaiveUi,
    VueRouter,
}

impl LibraryResolver {
    pub const ALL: [LibraryResolver; 2] = [LibraryResolver::NaiveUi, LibraryResolver::VueRouter];

    pub fn resolve(&self, name: &str) -> Option<ComponentSource> {
        match self {
            Self::NaiveUi => {
                let mut chars = name.chars();
                let prefixed = chars.next() == Some('N')
                    && chars.next().is_some_and(|c| c.is_ascii_uppercase());
                prefixed.then(|| ComponentSource::package("naive-ui", name))
            }
            Self::VueRouter => matches!(name, "RouterLink" | "RouterView")
                .then(|| ComponentSource::package("vue-router", name)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no library resolver knows component {0:?}")]
    Unresolved(String),

    #[error("failed to scan {path:?}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentSource>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component. Returns false and keeps the existing entry on a name collision.
    pub fn insert(&mut self, name: impl Into<String>, source: ComponentSource) -> bool {
        let name = name.into();
        if let Some(existing) = self.components.get(&name) {
            if *existing != source {
                tracing::warn!(
                    "Component {} already registered from {:?}, ignoring {:?}",
                    name,
                    existing,
                    source
                );
            }
            return false;
        }
        self.components.insert(name, source);
        true
    }

    pub fn resolve(&self, name: &str) -> Option<&ComponentSource> {
        self.components.get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Entries in manifest order (case-insensitive by name)
    pub fn entries(&self) -> Vec<(&str, &ComponentSource)> {
        let mut entries: Vec<_> = self
            .components
            .iter()
            .map(|(name, source)| (name.as_str(), source))
            .collect();
        entries.sort_by_key(|(name, _)| name.to_lowercase());
        entries
    }

    /// Discover `*.vue` files under `dirs` (relative to `root`)
    pub fn scan(root: &Path, dirs: &[PathBuf]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.scan_into(root, dirs)?;
        Ok(registry)
    }

    pub fn scan_into(&mut self, root: &Path, dirs: &[PathBuf]) -> Result<usize, RegistryError> {
        let mut added = 0;

        for dir in dirs {
            let base = root.join(dir);
            if !base.is_dir() {
                tracing::warn!("Component directory {:?} does not exist", base);
                continue;
            }

            let mut files = Vec::new();
            for entry in WalkDir::new(&base).sort_by_file_name() {
                let entry = entry.map_err(|e| RegistryError::Scan { path: base.clone(), source: e })?;
                let path = entry.path();
                if entry.file_type().is_file() && path.extension().and_then(|e| e.to_str()) == Some("vue") {
                    files.push(path.to_path_buf());
                }
            }

            for file in files {
                let Some(name) = file.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let Ok(relative) = file.strip_prefix(root) else {
                    continue;
                };
                let import = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                if self.insert(name, ComponentSource::local(format!("./{}", import))) {
                    added += 1;
                }
            }
        }

        tracing::debug!("Discovered {} local component(s)", added);
        Ok(added)
    }

    /// Register library components by name using the first resolver that accepts each
    pub fn add_library_components<S: AsRef<str>>(
        &mut self,
        names: &[S],
        resolvers: &[LibraryResolver],
    ) -> Result<usize, RegistryError> {
        let mut added = 0;
        for name in names {
            let name = name.as_ref();
            let source = resolvers
                .iter()
                .find_map(|r| r.resolve(name))
                .ok_or_else(|| RegistryError::Unresolved(name.to_string()))?;
            if self.insert(name, source) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Table of the file-preview application's globally registered components
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        for (name, path) in BUILTIN_LOCAL {
            registry.insert(*name, ComponentSource::local(*path));
        }
        for name in BUILTIN_NAIVE_UI {
            registry.insert(*name, ComponentSource::package("naive-ui", *name));
        }
        for name in ["RouterLink", "RouterView"] {
            registry.insert(name, ComponentSource::package("vue-router", name));
        }

        registry
    }
}

const BUILTIN_LOCAL: &[(&str, &str)] = &[
    ("Application", "./components/Application/Application.vue"),
    ("AudioPreview", "./components/Previews/AudioPreview.vue"),
    ("Download", "./components/Button/Download.vue"),
    ("FileDataTable", "./components/FileDataTable.vue"),
    ("Footer", "./components/Footer.vue"),
    ("Header", "./components/Header.vue"),
    ("ImagePreview", "./components/Previews/ImagePreview.vue"),
    ("MarkdownPreview", "./components/Previews/MarkdownPreview.vue"),
    ("MobileMenu", "./components/MobileMenu.vue"),
    ("OtherPreview", "./components/Previews/OtherPreview.vue"),
    ("PathTableNPopconfirm", "./components/PathTableNPopconfirm.vue"),
    ("PDFPreview", "./components/Previews/PDFPreview.vue"),
    ("PopMenu", "./components/PopMenu.vue"),
    ("TextPreview", "./components/Previews/TextPreview.vue"),
    ("VideoPreview", "./components/Previews/VideoPreview.vue"),
];

const BUILTIN_NAIVE_UI: &[&str] = &[
    "NAlert",
    "NAvatar",
    "NBreadcrumb",
    "NBreadcrumbItem",
    "NButton",
    "NCard",
    "NConfigProvider",
    "NDataTable",
    "NDescriptions",
    "NDescriptionsItem",
    "NDialogProvider",
    "NDivider",
    "NDropdown",
    "NForm",
    "NFormItem",
    "NGi",
    "NGrid",
    "NGridItem",
    "NIcon",
    "NImage",
    "NInput",
    "NInputGroupLabel",
    "NLayout",
    "NLayoutContent",
    "NLayoutFooter",
    "NLayoutHeader",
    "NLayoutSider",
    "NMessageProvider",
    "NNotificationProvider",
    "NNumberAnimation",
    "NP",
    "NPageHeader",
    "NPagination",
    "NPopconfirm",
    "NPopover",
    "NProgress",
    "NResult",
    "NScrollbar",
    "NSelect",
    "NSkeleton",
    "NSpace",
    "NSpin",
    "NStatistic",
    "NTag",
    "NText",
    "NUpload",
    "NUploadDragger",
];
