//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::HierarchyBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<BlueprintSummary>,
}

#[derive(Serialize)]
struct BlueprintSummary {
    version: String,
    unhandled_policy: &'static str,
    node_count: usize,
    root_count: usize,
    handler_count: usize,
    event_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating blueprint");

    let result = match super::load_blueprint(&args.config) {
        Ok(blueprint) => ValidationResult {
            valid: true,
            config_path: args.config.display().to_string(),
            error: None,
            warnings: collect_warnings(&blueprint),
            summary: Some(summarize(&blueprint)),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path: args.config.display().to_string(),
            error: Some(e.to_string()),
            warnings: Vec::new(),
            summary: None,
        },
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Blueprint validation failed")
    }
}

fn summarize(blueprint: &HierarchyBlueprint) -> BlueprintSummary {
    BlueprintSummary {
        version: format!("{:?}", blueprint.version),
        unhandled_policy: blueprint.dispatch.unhandled.as_str(),
        node_count: blueprint.nodes.len(),
        root_count: blueprint.roots().count(),
        handler_count: blueprint.handler_nodes().count(),
        event_count: blueprint.events.len(),
    }
}

/// Non-fatal issues: the blueprint loads but probably does not do what was meant
fn collect_warnings(blueprint: &HierarchyBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.handler_nodes().next().is_none() {
        warnings.push("No handlers configured - every event will bubble unhandled".to_string());
    }

    for (node, rule) in blueprint.handler_nodes() {
        if !rule.consume {
            warnings.push(format!(
                "Handler on '{}' never consumes - events always pass through it",
                node
            ));
        }
    }

    for (idx, event) in blueprint.events.iter().enumerate() {
        if !blueprint.predicts_handled(&event.kind, &event.start) {
            warnings.push(format!(
                "events[{}] '{}' at '{}' has no consuming handler on its ancestor chain",
                idx, event.kind, event.start
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Blueprint is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Unhandled policy: {}", summary.unhandled_policy);
            println!("  Nodes: {} ({} roots)", summary.node_count, summary.root_count);
            println!("  Handlers: {}", summary.handler_count);
            println!("  Events: {}", summary.event_count);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Blueprint is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::{ConfigFormat, ConfigLoader};

    const BLUEPRINT: &str = r#"
[[nodes]]
id = "root"

[[nodes]]
id = "panel"
parent = "root"
[nodes.handler]
kinds = ["tap"]

[[nodes]]
id = "label"
parent = "panel"
[nodes.handler]
consume = false

[[events]]
kind = "tap"
start = "label"

[[events]]
kind = "drag"
start = "label"
"#;

    #[test]
    fn test_collect_warnings() {
        let bp = ConfigLoader::load_from_str(BLUEPRINT, ConfigFormat::Toml).unwrap();
        let warnings = collect_warnings(&bp);

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("'label' never consumes"));
        assert!(warnings[1].contains("events[1] 'drag'"));
    }

    #[test]
    fn test_summarize() {
        let bp = ConfigLoader::load_from_str(BLUEPRINT, ConfigFormat::Toml).unwrap();
        let summary = summarize(&bp);

        assert_eq!(summary.node_count, 3);
        assert_eq!(summary.root_count, 1);
        assert_eq!(summary.handler_count, 2);
        assert_eq!(summary.unhandled_policy, "warn");
    }
}
