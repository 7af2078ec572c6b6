//! 属性值类型
//!
//! 遵循Nebula的Value类型设计模式：用带标签的枚举表示schema字段
//! 可承载的属性值，取代运行期的动态类型断言。LIST/DICT两种复合
//! 伪类型在DB侧以JSON字符串存储，这里保留结构化形式，编解码时
//! 经由serde_json桥接。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 可存储在vertex/edge属性中的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<PropValue>),
    Dict(BTreeMap<String, PropValue>),
}

impl PropValue {
    /// 检查值是否为null
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    /// 获取字符串值
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// 获取整数值
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// 值类型的简短名称，用于错误信息
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropValue::Null => "null",
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "int",
            PropValue::Float(_) => "float",
            PropValue::String(_) => "string",
            PropValue::List(_) => "list",
            PropValue::Dict(_) => "dict",
        }
    }

    /// 转换为serde_json::Value，用于LIST/DICT的JSON序列化
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PropValue::Null => serde_json::Value::Null,
            PropValue::Bool(b) => serde_json::Value::Bool(*b),
            PropValue::Int(i) => serde_json::Value::from(*i),
            PropValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            PropValue::String(s) => serde_json::Value::String(s.clone()),
            PropValue::List(items) => {
                serde_json::Value::Array(items.iter().map(|v| v.to_json()).collect())
            }
            PropValue::Dict(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropValue::Null,
            serde_json::Value::Bool(b) => PropValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropValue::Int(i)
                } else {
                    PropValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => PropValue::String(s),
            serde_json::Value::Array(items) => {
                PropValue::List(items.into_iter().map(PropValue::from).collect())
            }
            serde_json::Value::Object(map) => PropValue::Dict(
                map.into_iter().map(|(k, v)| (k, PropValue::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::String(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::String(s)
    }
}

impl From<i64> for PropValue {
    fn from(i: i64) -> Self {
        PropValue::Int(i)
    }
}

impl From<f64> for PropValue {
    fn from(f: f64) -> Self {
        PropValue::Float(f)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl std::fmt::Display for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::Null => write!(f, "NULL"),
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Int(i) => write!(f, "{}", i),
            PropValue::Float(fl) => write!(f, "{}", fl),
            PropValue::String(s) => write!(f, "\"{}\"", s),
            PropValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            PropValue::Dict(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": 1, "b": [true, "x"], "c": null}"#).unwrap();
        let val = PropValue::from(json.clone());
        assert_eq!(val.to_json(), json);
    }

    #[test]
    fn test_integer_number_maps_to_int() {
        let val = PropValue::from(serde_json::json!(42));
        assert_eq!(val, PropValue::Int(42));
        let val = PropValue::from(serde_json::json!(1.5));
        assert_eq!(val, PropValue::Float(1.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(PropValue::String("x".into()).to_string(), "\"x\"");
        assert_eq!(PropValue::Null.to_string(), "NULL");
        assert_eq!(
            PropValue::List(vec![PropValue::Int(1), PropValue::Int(2)]).to_string(),
            "[1, 2]"
        );
    }
}
