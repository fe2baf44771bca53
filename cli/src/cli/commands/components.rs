use std::path::PathBuf;

use filegate_core::components::{build_registry, render_dts};
use filegate_core::config::load_config;

pub fn run(
    config_path: Option<PathBuf>,
    scan: bool,
    json: bool,
    write: bool,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config.components, scan)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&registry)?);
        return Ok(());
    }

    let dts = render_dts(&registry);
    let out = if write { Some(config.components.dts.clone()) } else { out };
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, dts)?;
            println!("Wrote {} component(s) to {:?}", registry.len(), path);
        }
        None => print!("{}", dts),
    }

    Ok(())
}
