//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON 格式，解析与序列化对称。

use contracts::{ContractError, HierarchyBlueprint};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式 (大小写不敏感)
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }
}

fn parse_error<E>(format: ConfigFormat, err: E) -> ContractError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ContractError::ConfigParse {
        message: format!("{} parse error: {err}", format.label()),
        source: Some(Box::new(err)),
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<HierarchyBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| parse_error(ConfigFormat::Toml, e))
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<HierarchyBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| parse_error(ConfigFormat::Json, e))
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<HierarchyBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

/// 按格式序列化配置
pub fn serialize(
    blueprint: &HierarchyBlueprint,
    format: ConfigFormat,
) -> Result<String, ContractError> {
    let result = match format {
        ConfigFormat::Toml => toml::to_string_pretty(blueprint).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::to_string_pretty(blueprint).map_err(|e| e.to_string()),
    };
    result.map_err(|e| {
        ContractError::config_parse(format!("{} serialize error: {e}", format.label()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[[nodes]]
id = "window"

[[nodes]]
id = "dialog"
parent = "window"
[nodes.handler]
kinds = ["close"]

[[events]]
kind = "close"
start = "dialog"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.nodes.len(), 2);
        assert_eq!(bp.events.len(), 1);
        assert!(bp.nodes[1].handler.is_some());
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "dispatch": { "unhandled": "fail" },
            "nodes": [
                { "id": "root" },
                { "id": "leaf", "parent": "root", "handler": { "kinds": [], "consume": false } }
            ],
            "events": [{ "kind": "tap", "start": "leaf", "payload": { "x": 1 } }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.dispatch.unhandled, contracts::UnhandledPolicy::Fail);
        assert_eq!(bp.events[0].payload["x"], 1);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_unknown_policy_rejected() {
        let content = r#"
[dispatch]
unhandled = "explode"

[[nodes]]
id = "root"
"#;
        assert!(matches!(
            parse_toml(content),
            Err(ContractError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("JSON"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
