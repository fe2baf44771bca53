use std::path::PathBuf;

use filegate_core::config::load_config_with_source;

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, source) = load_config_with_source(config_path)?;

    println!("filegate Status");
    println!("===============");
    println!();
    println!("Configuration:");
    match &source {
        Some(path) => println!("  Config file: {:?}", path),
        None => println!("  Config file: none (built-in defaults)"),
    }
    println!();
    println!("Server settings:");
    println!("  Host: {}", config.server.bind_address());
    println!("  Port: {}", config.server.port);
    println!();
    println!("Upstream:");
    println!("  Mount: {}", config.upstream.mount);
    println!("  Target: {}", config.upstream.target);
    println!("  Change origin: {}", config.upstream.change_origin);
    for entry in &config.upstream.path_rewrite {
        println!("  Rewrite: {} -> {:?}", entry.pattern, entry.replacement);
    }
    println!();
    match &config.frontend.dist_dir {
        Some(dir) => println!("Front end: {:?}", dir),
        None => println!("Front end: disabled"),
    }

    // Check if server is reachable
    println!();
    let host = if config.server.allow_lan_access {
        "127.0.0.1"
    } else {
        config.server.host.as_str()
    };
    let url = format!("http://{}:{}/healthz", host, config.server.port);
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            println!("Server: RUNNING ✓");
        }
        _ => {
            println!("Server: NOT RUNNING");
        }
    }

    Ok(())
}
