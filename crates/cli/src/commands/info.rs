//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{HierarchyBlueprint, NodeId, ParentMap};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Blueprint info for JSON output
#[derive(Serialize)]
struct BlueprintInfo {
    version: String,
    unhandled_policy: &'static str,
    nodes: Vec<NodeInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<EventInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<Vec<TreeNode>>,
}

#[derive(Serialize)]
struct NodeInfo {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    handles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    consume: Option<bool>,
}

#[derive(Serialize)]
struct EventInfo {
    kind: String,
    start: String,
    predicted: &'static str,
}

#[derive(Serialize)]
struct TreeNode {
    id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading blueprint info");

    let blueprint = super::load_blueprint(&args.config)
        .with_context(|| format!("Failed to load blueprint from {}", args.config.display()))?;

    if args.json {
        let info = build_blueprint_info(&blueprint, args.tree);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize blueprint info")?;
        println!("{}", json);
    } else {
        print_blueprint_info(&blueprint, args.tree);
    }

    Ok(())
}

fn build_blueprint_info(blueprint: &HierarchyBlueprint, with_tree: bool) -> BlueprintInfo {
    let nodes = blueprint
        .nodes
        .iter()
        .map(|node| NodeInfo {
            id: node.id.to_string(),
            parent: node.parent.as_ref().map(NodeId::to_string),
            handles: node.handler.as_ref().map(|rule| rule.kinds.clone()),
            consume: node.handler.as_ref().map(|rule| rule.consume),
        })
        .collect();

    let events = blueprint
        .events
        .iter()
        .map(|event| EventInfo {
            kind: event.kind.clone(),
            start: event.start.to_string(),
            predicted: prediction(blueprint, &event.kind, &event.start),
        })
        .collect();

    let tree = with_tree.then(|| {
        let map = blueprint.to_parent_map();
        sorted(map.roots())
            .into_iter()
            .map(|root| build_tree(&map, root))
            .collect()
    });

    BlueprintInfo {
        version: format!("{:?}", blueprint.version),
        unhandled_policy: blueprint.dispatch.unhandled.as_str(),
        nodes,
        events,
        tree,
    }
}

fn build_tree(map: &ParentMap<NodeId>, node: &NodeId) -> TreeNode {
    TreeNode {
        id: node.to_string(),
        children: sorted(map.children_of(node))
            .into_iter()
            .map(|child| build_tree(map, child))
            .collect(),
    }
}

/// 父子表基于 HashMap，输出前排序保证稳定
fn sorted<'a>(nodes: impl Iterator<Item = &'a NodeId>) -> Vec<&'a NodeId> {
    let mut nodes: Vec<_> = nodes.collect();
    nodes.sort();
    nodes
}

fn prediction(blueprint: &HierarchyBlueprint, kind: &str, start: &NodeId) -> &'static str {
    if blueprint.predicts_handled(kind, start) {
        "handled"
    } else {
        "unhandled"
    }
}

fn print_blueprint_info(blueprint: &HierarchyBlueprint, with_tree: bool) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Bubbler Blueprint                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Dispatch");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!(
        "   └─ Unhandled policy: {}",
        blueprint.dispatch.unhandled.as_str()
    );

    println!("\n🧩 Nodes ({})", blueprint.nodes.len());
    for (i, node) in blueprint.nodes.iter().enumerate() {
        let prefix = branch(i, blueprint.nodes.len());
        let parent = node
            .parent
            .as_ref()
            .map_or_else(|| "root".to_string(), |p| format!("parent: {p}"));
        match &node.handler {
            Some(rule) if rule.kinds.is_empty() => {
                println!("   {} {} ({}) ✋ all kinds", prefix, node.id, parent)
            }
            Some(rule) => println!(
                "   {} {} ({}) ✋ {}{}",
                prefix,
                node.id,
                parent,
                rule.kinds.join(", "),
                if rule.consume { "" } else { " [pass]" }
            ),
            None => println!("   {} {} ({})", prefix, node.id, parent),
        }
    }

    if with_tree {
        let map = blueprint.to_parent_map();
        let roots = sorted(map.roots());
        println!("\n🌳 Hierarchy");
        for (i, root) in roots.iter().enumerate() {
            print_subtree(&map, root, "   ", i + 1 == roots.len());
        }
    }

    if !blueprint.events.is_empty() {
        println!("\n📨 Events ({})", blueprint.events.len());
        for (i, event) in blueprint.events.iter().enumerate() {
            println!(
                "   {} {} @ {} → {}",
                branch(i, blueprint.events.len()),
                event.kind,
                event.start,
                prediction(blueprint, &event.kind, &event.start)
            );
        }
    }

    println!();
}

fn print_subtree(map: &ParentMap<NodeId>, node: &NodeId, indent: &str, is_last: bool) {
    let prefix = if is_last { "└─" } else { "├─" };
    println!("{}{} {}", indent, prefix, node);

    let child_indent = format!("{}{}", indent, if is_last { "   " } else { "│  " });
    let children = sorted(map.children_of(node));
    for (i, child) in children.iter().enumerate() {
        print_subtree(map, child, &child_indent, i + 1 == children.len());
    }
}

fn branch(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        "└─"
    } else {
        "├─"
    }
}
