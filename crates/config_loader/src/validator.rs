//! 配置校验模块
//!
//! 校验规则：
//! - node id 非空且唯一
//! - parent 必须引用已声明的节点
//! - 父链无环 (层级必须是森林)
//! - event 的起始节点必须存在，kind 非空

use std::collections::{HashMap, HashSet};

use contracts::{ContractError, HierarchyBlueprint, NodeId};

/// 校验 HierarchyBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &HierarchyBlueprint) -> Result<(), ContractError> {
    validate_node_ids(blueprint)?;
    validate_parents(blueprint)?;
    validate_acyclic(blueprint)?;
    validate_events(blueprint)?;
    Ok(())
}

/// 校验 node id 非空且唯一
fn validate_node_ids(blueprint: &HierarchyBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, node) in blueprint.nodes.iter().enumerate() {
        if node.id.is_empty() {
            return Err(ContractError::config_validation(
                format!("nodes[{idx}].id"),
                "node id cannot be empty",
            ));
        }
        if !seen.insert(&node.id) {
            return Err(ContractError::config_validation(
                format!("nodes[id={}]", node.id),
                "duplicate node id",
            ));
        }
    }
    Ok(())
}

/// 校验 parent 引用
fn validate_parents(blueprint: &HierarchyBlueprint) -> Result<(), ContractError> {
    let ids: HashSet<&NodeId> = blueprint.nodes.iter().map(|n| &n.id).collect();
    for node in &blueprint.nodes {
        let Some(parent) = &node.parent else {
            continue;
        };
        if parent == &node.id {
            return Err(ContractError::config_validation(
                format!("nodes[id={}].parent", node.id),
                "node cannot be its own parent",
            ));
        }
        if !ids.contains(parent) {
            return Err(ContractError::config_validation(
                format!("nodes[id={}].parent", node.id),
                format!("unknown parent '{parent}'"),
            ));
        }
    }
    Ok(())
}

/// 校验父链无环
///
/// 从每个节点沿父链走；走过的节点数超过节点总数即说明有环。
/// 已确认能到达根的节点会被记住，整体线性。
fn validate_acyclic(blueprint: &HierarchyBlueprint) -> Result<(), ContractError> {
    let parents: HashMap<&NodeId, Option<&NodeId>> = blueprint
        .nodes
        .iter()
        .map(|n| (&n.id, n.parent.as_ref()))
        .collect();
    let mut reaches_root: HashSet<&NodeId> = HashSet::new();

    for node in &blueprint.nodes {
        let mut path: Vec<&NodeId> = Vec::new();
        let mut on_path: HashSet<&NodeId> = HashSet::new();
        let mut current = Some(&node.id);

        while let Some(id) = current {
            if reaches_root.contains(id) {
                break;
            }
            if !on_path.insert(id) {
                return Err(ContractError::config_validation(
                    format!("nodes[id={}].parent", node.id),
                    format!("parent cycle through '{id}'"),
                ));
            }
            path.push(id);
            current = parents.get(id).copied().flatten();
        }
        reaches_root.extend(path);
    }
    Ok(())
}

/// 校验事件
fn validate_events(blueprint: &HierarchyBlueprint) -> Result<(), ContractError> {
    for (idx, event) in blueprint.events.iter().enumerate() {
        if event.kind.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("events[{idx}].kind"),
                "event kind cannot be empty",
            ));
        }
        if blueprint.node(event.start.as_str()).is_none() {
            return Err(ContractError::config_validation(
                format!("events[{idx}].start"),
                format!("start node '{}' is not declared", event.start),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ConfigVersion, DispatchSettings, EventConfig, HandlerRule, NodeConfig,
    };

    fn node(id: &str, parent: Option<&str>) -> NodeConfig {
        NodeConfig {
            id: id.into(),
            parent: parent.map(NodeId::from),
            handler: None,
        }
    }

    fn event(kind: &str, start: &str) -> EventConfig {
        EventConfig {
            kind: kind.into(),
            start: start.into(),
            payload: serde_json::Value::Null,
        }
    }

    fn blueprint(nodes: Vec<NodeConfig>, events: Vec<EventConfig>) -> HierarchyBlueprint {
        HierarchyBlueprint {
            version: ConfigVersion::V1,
            dispatch: DispatchSettings::default(),
            nodes,
            events,
        }
    }

    fn field_of(err: ContractError) -> String {
        match err {
            ContractError::ConfigValidation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_tree() {
        let mut leaf = node("leaf", Some("mid"));
        leaf.handler = Some(HandlerRule {
            kinds: vec!["tap".into()],
            consume: true,
        });
        let bp = blueprint(
            vec![node("root", None), node("mid", Some("root")), leaf],
            vec![event("tap", "leaf")],
        );
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_forest_is_valid() {
        let bp = blueprint(
            vec![node("a", None), node("b", None), node("c", Some("b"))],
            vec![],
        );
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_empty_id() {
        let bp = blueprint(vec![node("", None)], vec![]);
        assert_eq!(field_of(validate(&bp).unwrap_err()), "nodes[0].id");
    }

    #[test]
    fn test_duplicate_id() {
        let bp = blueprint(vec![node("a", None), node("a", None)], vec![]);
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_unknown_parent() {
        let bp = blueprint(vec![node("a", Some("ghost"))], vec![]);
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("unknown parent 'ghost'"));
    }

    #[test]
    fn test_self_parent() {
        let bp = blueprint(vec![node("a", Some("a"))], vec![]);
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("own parent"));
    }

    #[test]
    fn test_cycle() {
        let bp = blueprint(
            vec![
                node("root", None),
                node("a", Some("c")),
                node("b", Some("a")),
                node("c", Some("b")),
            ],
            vec![],
        );
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("parent cycle"));
    }

    #[test]
    fn test_event_start_must_exist() {
        let bp = blueprint(vec![node("a", None)], vec![event("tap", "b")]);
        assert_eq!(field_of(validate(&bp).unwrap_err()), "events[0].start");
    }

    #[test]
    fn test_event_kind_not_blank() {
        let bp = blueprint(vec![node("a", None)], vec![event("  ", "a")]);
        assert_eq!(field_of(validate(&bp).unwrap_err()), "events[0].kind");
    }
}
