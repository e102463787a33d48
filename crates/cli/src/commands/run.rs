//! `run` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{HierarchyBlueprint, Outcome};

use crate::cli::RunArgs;
use crate::replay::{EventReport, ReplaySession, ReplayStats};

/// Replay output for JSON mode
#[derive(Serialize)]
struct ReplayOutput<'a> {
    policy: &'static str,
    events: &'a [EventReport],
    total: u64,
    handled: u64,
    unhandled: u64,
}

/// Execute the `run` command
pub fn run_replay(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading blueprint");

    let blueprint = super::load_blueprint(&args.config)
        .with_context(|| format!("Failed to load blueprint from {}", args.config.display()))?;

    info!(
        nodes = blueprint.nodes.len(),
        handlers = blueprint.handler_nodes().count(),
        events = blueprint.events.len(),
        "Blueprint loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - blueprint is valid, exiting");
        print_blueprint_summary(&blueprint);
        return Ok(());
    }

    let session = ReplaySession::from_blueprint(&blueprint, args.policy.map(Into::into));
    let mut stats = ReplayStats::new();
    let mut reports = Vec::new();

    let events = blueprint
        .events
        .iter()
        .enumerate()
        .filter(|(_, event)| args.kind.as_deref().map_or(true, |kind| event.kind == kind));

    for (index, event) in events {
        let report = match session.replay_event(index, event, &mut stats) {
            Ok(report) => report,
            Err(e) => {
                if !args.json {
                    stats.print_summary();
                }
                return Err(e.into());
            }
        };
        if !args.json {
            print_event_report(&report);
        }
        reports.push(report);
    }

    info!(
        replayed = reports.len(),
        elapsed_ms = stats.elapsed().as_millis() as u64,
        "Replay finished"
    );

    if args.json {
        let summary = stats.summary();
        let output = ReplayOutput {
            policy: session.policy().as_str(),
            events: &reports,
            total: summary.total,
            handled: summary.handled,
            unhandled: summary.unhandled,
        };
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialize replay output")?;
        println!("{}", json);
    } else {
        stats.print_summary();
    }

    Ok(())
}

fn print_event_report(report: &EventReport) {
    let path = report
        .visited
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" → ");

    match (report.outcome, &report.handled_by) {
        (Outcome::Handled, Some(node)) => println!(
            "✓ #{} {} @ {} handled by {} ({})",
            report.index, report.kind, report.start, node, path
        ),
        _ => println!(
            "✗ #{} {} @ {} unhandled ({}){}",
            report.index,
            report.kind,
            report.start,
            path,
            if report.cycle_detected { " [cycle]" } else { "" }
        ),
    }
}

fn print_blueprint_summary(blueprint: &HierarchyBlueprint) {
    println!("\n📋 Blueprint Summary");
    println!("   ├─ Unhandled policy: {}", blueprint.dispatch.unhandled.as_str());
    println!("   ├─ Nodes: {}", blueprint.nodes.len());
    println!("   ├─ Handlers: {}", blueprint.handler_nodes().count());
    println!("   └─ Events: {}", blueprint.events.len());
}
