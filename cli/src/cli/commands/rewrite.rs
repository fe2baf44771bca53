use std::path::PathBuf;

use filegate_core::config::load_config;
use filegate_core::proxy::ProxyRule;

pub fn run(config_path: Option<PathBuf>, request_path: &str) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let rule = ProxyRule::from_config(&config.upstream)?;

    let (path, query) = match request_path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (request_path, None),
    };

    if !rule.matches(path) {
        println!("{} is not proxied (mount prefix {})", path, rule.mount());
        return Ok(());
    }

    println!("{}", rule.target_url(path, query));
    if rule.change_origin {
        println!("  Host: {}", rule.upstream_host());
    }

    Ok(())
}
