//! `herald-soak`: runs the randomised registry workload and prints a JSON
//! report.
//!
//! Exits non-zero if the registry fails an audit during the run.

use herald_center::{load_config, logging, run_soak};

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("HERALD_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("herald.toml"));

    let config = load_config(selected_config_path).expect("failed to load configuration");

    logging::init_tracing(&config.logging);

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    match run_soak(&config.soak) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("failed to serialise soak report: {}", e);
                std::process::exit(2);
            }
        },
        Err(e) => {
            tracing::error!("soak run failed: {}", e);
            std::process::exit(1);
        }
    }
}
