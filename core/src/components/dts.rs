//! `components.d.ts` generation

use std::fmt::Write;

use crate::components::registry::{ComponentRegistry, ComponentSource};

const HEADER: &str = "/* eslint-disable */
/* prettier-ignore */
// @ts-nocheck
// Generated by unplugin-vue-components
// Read more: https://github.com/vuejs/core/pull/3399
import '@vue/runtime-core'

export {}

declare module '@vue/runtime-core' {
  export interface GlobalComponents {
";

const FOOTER: &str = "  }
}
";

/// Render the global component typings consumed by the type checker
pub fn render_dts(registry: &ComponentRegistry) -> String {
    let mut out = String::from(HEADER);

    for (name, source) in registry.entries() {
        let line = match source {
            ComponentSource::Local { path } => {
                format!("    {}: typeof import('{}')['default']", name, path)
            }
            ComponentSource::Package { package, export } => {
                format!("    {}: typeof import('{}')['{}']", name, package, export)
            }
        };
        let _ = writeln!(out, "{}", line);
    }

    out.push_str(FOOTER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_source_kinds() {
        let mut registry = ComponentRegistry::new();
        registry.insert("NButton", ComponentSource::package("naive-ui", "NButton"));
        registry.insert("Footer", ComponentSource::local("./components/Footer.vue"));

        let dts = render_dts(&registry);
        assert!(dts.starts_with("/* eslint-disable */\n"));
        assert!(dts.contains("    Footer: typeof import('./components/Footer.vue')['default']\n"));
        assert!(dts.contains("    NButton: typeof import('naive-ui')['NButton']\n"));
        assert!(dts.find("Footer:").unwrap() < dts.find("NButton:").unwrap());
        assert!(dts.ends_with("  }\n}\n"));
    }

    #[test]
    fn builtin_manifest_matches_checked_in_file() {
        let expected = include_str!("../../tests/fixtures/components.d.ts");
        assert_eq!(render_dts(&ComponentRegistry::builtin()), expected);
    }

    #[test]
    fn empty_registry_still_declares_interface() {
        let dts = render_dts(&ComponentRegistry::new());
        assert!(dts.contains("export interface GlobalComponents {\n  }\n}\n"));
    }
}
