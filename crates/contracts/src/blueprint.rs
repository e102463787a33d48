//! HierarchyBlueprint - Config Loader 输出
//!
//! 描述一棵完整的层级：节点、父子关系、脚本化 handler、待回放的事件，以及未处理事件的策略。

use serde::{Deserialize, Serialize};

use crate::{EventEnvelope, NodeId, ParentMap};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的层级配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 分发设置
    #[serde(default)]
    pub dispatch: DispatchSettings,

    /// 节点列表 (无 parent 的节点为根)
    pub nodes: Vec<NodeConfig>,

    /// 待回放的事件
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

/// 分发设置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// 事件冒泡到根仍未被处理时的策略
    #[serde(default)]
    pub unhandled: UnhandledPolicy,
}

/// Reaction to an event nobody consumed.
///
/// The dispatcher only reports `Outcome::Unhandled`; this is the caller's
/// choice of what to do about it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnhandledPolicy {
    /// Drop silently
    Ignore,
    /// Emit a warning
    #[default]
    Warn,
    /// Return an error to the caller
    Fail,
    /// Panic in debug builds, warn in release builds
    Assert,
}

impl UnhandledPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Warn => "warn",
            Self::Fail => "fail",
            Self::Assert => "assert",
        }
    }
}

impl std::str::FromStr for UnhandledPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "fail" => Ok(Self::Fail),
            "assert" => Ok(Self::Assert),
            other => Err(format!("unknown unhandled policy: {other}")),
        }
    }
}

/// 节点配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// 唯一标识符
    pub id: NodeId,

    /// 父节点 (None = 根)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    /// 挂载在该节点上的脚本化 handler (可选)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<HandlerRule>,
}

/// Scripted handler: consumes (or declines) events whose kind is listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerRule {
    /// Event kinds this handler looks at; empty means every kind
    #[serde(default)]
    pub kinds: Vec<String>,

    /// Value returned for matching events
    #[serde(default = "default_consume")]
    pub consume: bool,
}

fn default_consume() -> bool {
    true
}

impl HandlerRule {
    pub fn matches(&self, kind: &str) -> bool {
        self.kinds.is_empty() || self.kinds.iter().any(|k| k == kind)
    }

    /// Whether this rule consumes an event of `kind`.
    pub fn consumes(&self, kind: &str) -> bool {
        self.consume && self.matches(kind)
    }
}

/// 事件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// 事件类型
    pub kind: String,

    /// 起始节点
    pub start: NodeId,

    /// 负载 (TOML 无 null，空负载不序列化)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl EventConfig {
    pub fn to_envelope(&self) -> EventEnvelope {
        EventEnvelope::new(self.kind.clone()).with_payload(self.payload.clone())
    }
}

impl HierarchyBlueprint {
    /// Build the parent-link hierarchy described by `nodes`.
    pub fn to_parent_map(&self) -> ParentMap<NodeId> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.parent.clone()))
            .collect()
    }

    pub fn node(&self, id: &str) -> Option<&NodeConfig> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Nodes that carry a scripted handler.
    pub fn handler_nodes(&self) -> impl Iterator<Item = (&NodeId, &HandlerRule)> {
        self.nodes
            .iter()
            .filter_map(|node| node.handler.as_ref().map(|rule| (&node.id, rule)))
    }

    pub fn roots(&self) -> impl Iterator<Item = &NodeConfig> {
        self.nodes.iter().filter(|node| node.parent.is_none())
    }

    /// Whether any scripted handler on `start`'s ancestor chain would consume `kind`.
    ///
    /// Static prediction used for warnings; stops after `nodes.len()` steps
    /// so a malformed blueprint cannot loop.
    pub fn predicts_handled(&self, kind: &str, start: &NodeId) -> bool {
        let mut current = Some(start.clone());
        for _ in 0..self.nodes.len() {
            let Some(id) = current else {
                return false;
            };
            let Some(node) = self.node(id.as_str()) else {
                return false;
            };
            if node.handler.as_ref().is_some_and(|rule| rule.consumes(kind)) {
                return true;
            }
            current = node.parent.clone();
        }
        false
    }
}
