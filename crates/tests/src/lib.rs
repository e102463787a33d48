//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 冒泡分发的性质测试 (任意链长、任意处理位置)
//! - 具体场景测试
//! - 蓝图 -> 注册表 -> 分发 的端到端流程

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use contracts::{handler, Handler, NodeId, ParentMap};

    pub type CallLog = Arc<Mutex<Vec<NodeId>>>;

    /// 记录调用顺序的 handler
    pub fn recording(log: &CallLog, node: &NodeId, consumed: bool) -> Handler<&'static str> {
        let log = Arc::clone(log);
        let node = node.clone();
        handler(move |_: &&'static str| {
            log.lock().unwrap().push(node.clone());
            consumed
        })
    }

    /// `n0 -> n1 -> ... -> n{len-1}`, n0 是叶子
    pub fn chain(len: usize) -> (Vec<NodeId>, ParentMap<NodeId>) {
        let ids: Vec<NodeId> = (0..len).map(|i| NodeId::from(format!("n{i}"))).collect();
        let map = ParentMap::from_chain(&ids);
        (ids, map)
    }

    pub fn calls(log: &CallLog) -> Vec<NodeId> {
        log.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod property_tests {
    use super::support::*;
    use contracts::{handler, NodeId, Outcome};
    use dispatcher::{Dispatcher, HandlerRegistry};

    #[test]
    fn test_no_handler_on_chain_is_unhandled() {
        for len in 1..=6 {
            let (ids, map) = chain(len);
            let registry: HandlerRegistry<NodeId, &'static str> = HandlerRegistry::new();
            let dispatcher = Dispatcher::new(&map, &registry);

            for start in &ids {
                assert_eq!(
                    dispatcher.dispatch(&"evt", start.clone()),
                    Outcome::Unhandled,
                    "len={len} start={start}"
                );
            }
        }
    }

    #[test]
    fn test_handlers_off_chain_are_ignored() {
        let (ids, mut map) = chain(3);
        map.insert(NodeId::from("sibling"), ids[2].clone());

        let mut registry = HandlerRegistry::new();
        registry.register(NodeId::from("sibling"), handler(|_: &&'static str| true));

        let dispatcher = Dispatcher::new(&map, &registry);
        assert_eq!(dispatcher.dispatch(&"evt", ids[0].clone()), Outcome::Unhandled);
    }

    #[test]
    fn test_single_consumer_stops_the_walk() {
        for len in 1..=6 {
            for consumer in 0..len {
                let (ids, map) = chain(len);
                let log = CallLog::default();
                let mut registry = HandlerRegistry::new();
                // 其余节点都挂上不消费的 handler，用于观察是否越过消费者
                for (i, id) in ids.iter().enumerate() {
                    registry.register(id.clone(), recording(&log, id, i == consumer));
                }

                let dispatcher = Dispatcher::new(&map, &registry);
                let outcome = dispatcher.dispatch(&"evt", ids[0].clone());

                assert_eq!(outcome, Outcome::Handled);
                assert_eq!(calls(&log), ids[..=consumer].to_vec());
            }
        }
    }

    #[test]
    fn test_reregistering_same_handler_is_idempotent() {
        let (ids, map) = chain(2);
        let log = CallLog::default();
        let h = recording(&log, &ids[1], true);

        let mut once = HandlerRegistry::new();
        once.register(ids[1].clone(), h.clone());
        let mut twice = HandlerRegistry::new();
        twice.register(ids[1].clone(), h.clone());
        twice.register(ids[1].clone(), h);

        assert_eq!(once.len(), twice.len());

        let first = Dispatcher::new(&map, &once).dispatch_traced(&"evt", ids[0].clone());
        let second = Dispatcher::new(&map, &twice).dispatch_traced(&"evt", ids[0].clone());
        assert_eq!(first, second);
        assert_eq!(calls(&log), vec![ids[1].clone(), ids[1].clone()]);
    }

    #[test]
    fn test_unregister_hides_handler() {
        let (ids, map) = chain(3);
        let log = CallLog::default();
        let mut registry = HandlerRegistry::new();
        registry.register(ids[1].clone(), recording(&log, &ids[1], true));

        assert!(registry.unregister(&ids[1]).is_some());
        assert!(registry.handler_for(&ids[1]).is_none());

        let report = Dispatcher::new(&map, &registry).dispatch_traced(&"evt", ids[0].clone());
        assert_eq!(report.outcome, Outcome::Unhandled);
        assert!(report.invoked.is_empty());
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_declining_handlers_invoked_leaf_to_root() {
        let leaf = NodeId::from("leaf");
        let mid = NodeId::from("mid");
        let root = NodeId::from("root");
        let map = contracts::ParentMap::from_chain(&[leaf.clone(), mid.clone(), root.clone()]);

        let log = CallLog::default();
        let mut registry = HandlerRegistry::new();
        // 注册顺序与冒泡顺序无关
        for id in [&root, &leaf, &mid] {
            registry.register(id.clone(), recording(&log, id, false));
        }

        let outcome = Dispatcher::new(&map, &registry).dispatch(&"evt", leaf.clone());
        assert_eq!(outcome, Outcome::Unhandled);
        assert_eq!(calls(&log), vec![leaf, mid, root]);
    }
}

#[cfg(test)]
mod scenario_tests {
    use super::support::*;
    use contracts::{NodeId, Outcome, ParentMap, UnhandledPolicy};
    use dispatcher::{Dispatcher, DispatcherError, HandlerRegistry, SharedHandlerRegistry};

    #[test]
    fn test_middle_consumer_shields_root() {
        let [a, b, c] = ["A", "B", "C"].map(NodeId::from);
        let map = ParentMap::from_chain(&[a.clone(), b.clone(), c.clone()]);

        let log = CallLog::default();
        let mut registry = HandlerRegistry::new();
        registry.register(b.clone(), recording(&log, &b, true));
        registry.register(c.clone(), recording(&log, &c, true));

        let report = Dispatcher::new(&map, &registry).dispatch_traced(&"evt", a.clone());
        assert_eq!(report.outcome, Outcome::Handled);
        assert_eq!(report.visited, vec![a, b.clone()]);
        assert_eq!(report.handled_by, Some(b.clone()));
        assert_eq!(calls(&log), vec![b]);
    }

    #[test]
    fn test_empty_chain_consults_every_node() {
        let [a, b] = ["A", "B"].map(NodeId::from);
        let map = ParentMap::from_chain(&[a.clone(), b.clone()]);
        let registry: HandlerRegistry<NodeId, &'static str> = HandlerRegistry::new();

        let dispatcher = Dispatcher::new(&map, &registry);
        let report = dispatcher.dispatch_traced(&"evt", a.clone());
        assert_eq!(report.outcome, Outcome::Unhandled);
        assert_eq!(report.visited, vec![a, b]);

        let snapshot = dispatcher.metrics_snapshot();
        assert_eq!(snapshot.unhandled, 1);
        assert_eq!(snapshot.nodes_visited, 2);
    }

    #[test]
    fn test_trigger_fail_policy_on_shared_registry() {
        let [button, panel] = ["button", "panel"].map(NodeId::from);
        let map = ParentMap::from_chain(&[button.clone(), panel.clone()]);
        let registry = SharedHandlerRegistry::new();
        let log = CallLog::default();

        let dispatcher = Dispatcher::new(&map, registry.clone());
        let trigger = dispatcher.trigger_for(button.clone(), UnhandledPolicy::Fail);

        {
            let _guard = registry.scoped(panel.clone(), recording(&log, &panel, true));
            assert_eq!(trigger.trigger(&"click").unwrap(), Outcome::Handled);
        }

        let err = trigger.trigger(&"click").unwrap_err();
        assert!(matches!(err, DispatcherError::Unhandled { .. }));
        assert_eq!(calls(&log), vec![panel]);
    }
}

#[cfg(test)]
mod e2e_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{handler, EventEnvelope, NodeId, Outcome};
    use dispatcher::{Dispatcher, HandlerRegistry};
    use observability::{DispatchAggregator, DispatchSample};

    const BLUEPRINT_JSON: &str = r#"{
        "dispatch": { "unhandled": "ignore" },
        "nodes": [
            { "id": "app", "handler": { "kinds": ["quit"] } },
            { "id": "editor", "parent": "app", "handler": { "kinds": ["save", "quit"], "consume": false } },
            { "id": "buffer", "parent": "editor", "handler": { "kinds": ["save"] } },
            { "id": "cursor", "parent": "buffer" }
        ],
        "events": [
            { "kind": "save", "start": "cursor", "payload": { "path": "main.rs" } },
            { "kind": "quit", "start": "cursor" },
            { "kind": "zoom", "start": "editor" }
        ]
    }"#;

    /// End-to-end: blueprint -> HandlerRegistry -> Dispatcher -> aggregated summary
    #[test]
    fn test_blueprint_replay() {
        let blueprint = ConfigLoader::load_from_str(BLUEPRINT_JSON, ConfigFormat::Json).unwrap();

        let mut registry: HandlerRegistry<NodeId, EventEnvelope> = HandlerRegistry::new();
        for (node, rule) in blueprint.handler_nodes() {
            let rule = rule.clone();
            registry.register(
                node.clone(),
                handler(move |event: &EventEnvelope| rule.consumes(&event.kind)),
            );
        }

        let dispatcher = Dispatcher::new(blueprint.to_parent_map(), registry);
        let mut aggregator = DispatchAggregator::new();
        let mut handled_by = Vec::new();

        for event in &blueprint.events {
            let report = dispatcher.dispatch_traced(&event.to_envelope(), event.start.clone());
            assert_eq!(
                report.outcome.is_handled(),
                blueprint.predicts_handled(&event.kind, &event.start),
                "prediction disagrees for {}",
                event.kind
            );
            aggregator.update(&DispatchSample {
                kind: &event.kind,
                outcome: report.outcome,
                depth: report.depth(),
                handlers_invoked: report.invoked.len(),
                cycle_detected: report.cycle_detected,
            });
            handled_by.push(report.handled_by.map(|n| n.to_string()));
        }

        assert_eq!(
            handled_by,
            vec![Some("buffer".to_string()), Some("app".to_string()), None]
        );

        let summary = aggregator.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.handled, 2);
        assert_eq!(summary.unhandled_by_kind.get("zoom"), Some(&1));
        assert_eq!(blueprint.events[0].to_envelope().payload["path"], "main.rs");
        assert_eq!(dispatcher.dispatch(&EventEnvelope::new("quit"), "app".into()), Outcome::Handled);
    }
}
