//! List command - prints configured experiments

use crate::config::AppConfig;

/// Print every configured experiment with its parameter sets
pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    if config.experiments.is_empty() {
        tracing::warn!("No experiments configured");
        return Ok(());
    }

    for definition in &config.experiments {
        println!("{}", definition.name);
        println!("  (default) {}", serde_json::to_string(&definition.params)?);

        for (experiment_name, params) in &definition.named {
            println!("  {} {}", experiment_name, serde_json::to_string(params)?);
        }
    }

    Ok(())
}
