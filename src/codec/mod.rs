//! 值编解码器
//!
//! 在类型化的 [`PropValue`] 与nGQL文本字面量之间双向转换，
//! 依据字段类型声明的首个关键字分派。写入方向产出可直接嵌入
//! 语句的字面量文本；读取方向把表格结果中的字符串还原为值。
//!
//! 必须与engine的字面量/结果语法保持逐字节兼容：引号规则、
//! NULL哨兵文本、时间戳格式。

use crate::core::error::{AccessError, AccessResult};
use crate::core::schema::decl_keyword;
use crate::core::value::PropValue;
use chrono::NaiveDateTime;

/// engine结果中的NULL哨兵文本
pub const NULL_SENTINEL: &str = "__NULL__";
/// 未定义属性的哨兵，解码前归一化为NULL
pub const UNKNOWN_PROP: &str = "UNKNOWN_PROP";

/// engine返回的datetime文本格式（带小数秒）
const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// 本编解码器的规范datetime输出格式
const CANONICAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn keyword_of(field: &str, decl: &str) -> AccessResult<String> {
    decl_keyword(decl).ok_or_else(|| AccessError::UnsupportedType {
        field: field.to_string(),
        decl: decl.to_string(),
    })
}

fn type_mismatch(field: &str, decl: &str, val: &PropValue) -> AccessError {
    AccessError::TypeMismatch {
        field: field.to_string(),
        decl: decl.to_string(),
        got: val.kind_name().to_string(),
    }
}

/// 把一个时间类字符串包装成字面量构造语法，如`date("2024-01-01")`。
/// 空串或NULL值输出NULL字面量。
fn time_literal(ctor: &str, field: &str, decl: &str, val: &PropValue) -> AccessResult<String> {
    let raw = match val {
        PropValue::Null => "",
        PropValue::String(s) => s.trim(),
        other => return Err(type_mismatch(field, decl, other)),
    };
    if raw.is_empty() {
        return Ok("NULL".to_string());
    }
    Ok(format!("{}(\"{}\")", ctor, raw))
}

/// 把一个类型化的值编码为nGQL语句中的value字面量文本。
///
/// 除nebula原生类型外，支持LIST/DICT两种复合伪类型，
/// 它们被序列化为JSON字符串存入DB。
pub fn encode_value(field: &str, decl: &str, val: &PropValue) -> AccessResult<String> {
    let keyword = keyword_of(field, decl)?;
    match keyword.as_str() {
        "INT" | "INT64" | "INT32" | "INT16" | "INT8" => match val {
            PropValue::Int(i) => Ok(i.to_string()),
            other => Err(type_mismatch(field, decl, other)),
        },
        "FLOAT" | "DOUBLE" => match val {
            PropValue::Float(f) => Ok(f.to_string()),
            PropValue::Int(i) => Ok(i.to_string()),
            other => Err(type_mismatch(field, decl, other)),
        },
        "BOOL" => match val {
            PropValue::Bool(b) => Ok(b.to_string()),
            other => Err(type_mismatch(field, decl, other)),
        },
        "STRING" => match val {
            PropValue::String(s) => Ok(format!("\"{}\"", s)),
            other => Err(type_mismatch(field, decl, other)),
        },
        "DATE" => time_literal("date", field, decl, val),
        "TIME" => time_literal("time", field, decl, val),
        "DATETIME" => time_literal("datetime", field, decl, val),
        "TIMESTAMP" => match val {
            // 字符串视为已是正确的字面量文本，原样透传
            PropValue::String(s) => Ok(s.clone()),
            PropValue::Int(i) => Ok(i.to_string()),
            other => Err(type_mismatch(field, decl, other)),
        },
        "LIST" => {
            let empty = matches!(val, PropValue::Null)
                || matches!(val, PropValue::List(items) if items.is_empty());
            if empty {
                return Ok("'[]'".to_string());
            }
            let json = serde_json::to_string(&val.to_json()).map_err(|e| AccessError::Decode {
                field: field.to_string(),
                decl: decl.to_string(),
                reason: format!("illegal 'list' value: {}", e),
            })?;
            Ok(format!("'{}'", json))
        }
        "DICT" => {
            let empty = matches!(val, PropValue::Null)
                || matches!(val, PropValue::Dict(map) if map.is_empty());
            if empty {
                return Ok("'{}'".to_string());
            }
            let json = serde_json::to_string(&val.to_json()).map_err(|e| AccessError::Decode {
                field: field.to_string(),
                decl: decl.to_string(),
                reason: format!("illegal 'dict' value: {}", e),
            })?;
            // 再引用一层，使JSON文本可作为单个字符串字面量嵌入语句
            Ok(serde_json::to_string(&json).expect("quoting a string cannot fail"))
        }
        _ => Err(AccessError::UnsupportedType {
            field: field.to_string(),
            decl: decl.to_string(),
        }),
    }
}

/// 剥去一层包围的双引号
fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

fn decode_err(field: &str, decl: &str, reason: impl Into<String>) -> AccessError {
    AccessError::Decode {
        field: field.to_string(),
        decl: decl.to_string(),
        reason: reason.into(),
    }
}

/// 把查询结果中的字面量字符串解码为类型化的值。
///
/// NULL哨兵解码为对应类型的零值（0、""、false、空集合），
/// 而不是错误。
pub fn decode_value(field: &str, decl: &str, raw: &str) -> AccessResult<PropValue> {
    let keyword = keyword_of(field, decl)?;

    // 未定义的属性，归一化为NULL哨兵后再分派
    let raw = if raw == UNKNOWN_PROP { NULL_SENTINEL } else { raw };
    let is_null = raw == NULL_SENTINEL;

    match keyword.as_str() {
        "INT" | "INT64" => {
            if is_null {
                return Ok(PropValue::Int(0));
            }
            raw.parse::<i64>()
                .map(PropValue::Int)
                .map_err(|e| decode_err(field, decl, e.to_string()))
        }
        "INT32" => {
            if is_null {
                return Ok(PropValue::Int(0));
            }
            raw.parse::<i32>()
                .map(|i| PropValue::Int(i as i64))
                .map_err(|e| decode_err(field, decl, e.to_string()))
        }
        "INT16" => {
            if is_null {
                return Ok(PropValue::Int(0));
            }
            raw.parse::<i16>()
                .map(|i| PropValue::Int(i as i64))
                .map_err(|e| decode_err(field, decl, e.to_string()))
        }
        "INT8" => {
            if is_null {
                return Ok(PropValue::Int(0));
            }
            raw.parse::<i8>()
                .map(|i| PropValue::Int(i as i64))
                .map_err(|e| decode_err(field, decl, e.to_string()))
        }
        "FLOAT" => {
            if is_null {
                return Ok(PropValue::Float(0.0));
            }
            // FLOAT按单精度解析，与DB侧存储精度一致
            raw.parse::<f32>()
                .map(|f| PropValue::Float(f as f64))
                .map_err(|e| decode_err(field, decl, e.to_string()))
        }
        "DOUBLE" => {
            if is_null {
                return Ok(PropValue::Float(0.0));
            }
            raw.parse::<f64>()
                .map(PropValue::Float)
                .map_err(|e| decode_err(field, decl, e.to_string()))
        }
        "BOOL" => {
            if is_null {
                return Ok(PropValue::Bool(false));
            }
            raw.parse::<bool>()
                .map(PropValue::Bool)
                .map_err(|e| decode_err(field, decl, e.to_string()))
        }
        "STRING" | "DATE" | "TIME" => {
            if is_null {
                return Ok(PropValue::String(String::new()));
            }
            Ok(PropValue::String(strip_quotes(raw).to_string()))
        }
        "DATETIME" => {
            if is_null {
                return Ok(PropValue::String(String::new()));
            }
            let stripped = strip_quotes(raw);
            // 格式不匹配说明engine的wire格式变了，属于协议假设被
            // 破坏，直接终止而不是当作可恢复错误返回。
            let parsed = NaiveDateTime::parse_from_str(stripped, WIRE_DATETIME_FORMAT)
                .unwrap_or_else(|e| panic!("nebula datetime format changed: {}", e));
            Ok(PropValue::String(
                parsed.format(CANONICAL_DATETIME_FORMAT).to_string(),
            ))
        }
        "TIMESTAMP" => {
            if is_null {
                return Ok(PropValue::Int(0));
            }
            raw.parse::<i64>()
                .map(PropValue::Int)
                .map_err(|e| decode_err(field, decl, e.to_string()))
        }
        "LIST" => {
            if is_null {
                return Ok(PropValue::List(Vec::new()));
            }
            let stripped = strip_quotes(raw);
            let items: Vec<serde_json::Value> = serde_json::from_str(stripped)
                .map_err(|e| decode_err(field, decl, format!("data in nebula is not a list: {}", e)))?;
            Ok(PropValue::List(items.into_iter().map(PropValue::from).collect()))
        }
        "DICT" => {
            if is_null {
                return Ok(PropValue::Dict(Default::default()));
            }
            let stripped = strip_quotes(raw);
            let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(stripped)
                .map_err(|e| decode_err(field, decl, format!("data in nebula is not a dict: {}", e)))?;
            Ok(PropValue::Dict(
                map.into_iter().map(|(k, v)| (k, PropValue::from(v))).collect(),
            ))
        }
        _ => Err(AccessError::UnsupportedType {
            field: field.to_string(),
            decl: decl.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_encode_golden_literals() {
        // 每种类型的golden字面量，必须与engine接受的语法逐字一致
        assert_eq!(
            encode_value("f", "int", &PropValue::Int(42)).unwrap(),
            "42"
        );
        assert_eq!(
            encode_value("f", "double", &PropValue::Float(1.5)).unwrap(),
            "1.5"
        );
        assert_eq!(
            encode_value("f", "bool", &PropValue::Bool(true)).unwrap(),
            "true"
        );
        assert_eq!(
            encode_value("f", "string", &PropValue::String("x".into())).unwrap(),
            "\"x\""
        );
        assert_eq!(
            encode_value("f", "date", &PropValue::String("2024-01-01".into())).unwrap(),
            "date(\"2024-01-01\")"
        );
        assert_eq!(
            encode_value("f", "time", &PropValue::String(" 12:00:00 ".into())).unwrap(),
            "time(\"12:00:00\")"
        );
        assert_eq!(
            encode_value("f", "datetime", &PropValue::String("2024-01-01 00:00:00".into()))
                .unwrap(),
            "datetime(\"2024-01-01 00:00:00\")"
        );
        assert_eq!(
            encode_value("f", "list", &PropValue::List(vec![])).unwrap(),
            "'[]'"
        );
        assert_eq!(
            encode_value("f", "dict", &PropValue::Dict(BTreeMap::new())).unwrap(),
            "'{}'"
        );
    }

    #[test]
    fn test_encode_empty_time_is_null_literal() {
        assert_eq!(
            encode_value("f", "date", &PropValue::String("".into())).unwrap(),
            "NULL"
        );
        assert_eq!(encode_value("f", "datetime", &PropValue::Null).unwrap(), "NULL");
    }

    #[test]
    fn test_encode_timestamp_shapes() {
        // 字符串原样透传，整数输出十进制，其余形状报类型不匹配
        assert_eq!(
            encode_value("f", "timestamp", &PropValue::String("now()".into())).unwrap(),
            "now()"
        );
        assert_eq!(
            encode_value("f", "timestamp", &PropValue::Int(1700000000)).unwrap(),
            "1700000000"
        );
        let err = encode_value("f", "timestamp", &PropValue::Bool(true)).unwrap_err();
        assert!(matches!(err, AccessError::TypeMismatch { .. }));
    }

    #[test]
    fn test_encode_list_and_dict_json() {
        let list = PropValue::List(vec![PropValue::Int(1), PropValue::String("a".into())]);
        assert_eq!(encode_value("f", "list", &list).unwrap(), "'[1,\"a\"]'");

        let mut map = BTreeMap::new();
        map.insert("k".to_string(), PropValue::Int(1));
        let dict = PropValue::Dict(map);
        // DICT再引用一层，可作为单个字符串字面量嵌入
        assert_eq!(encode_value("f", "dict", &dict).unwrap(), "\"{\\\"k\\\":1}\"");

        assert_eq!(encode_value("f", "list", &PropValue::Null).unwrap(), "'[]'");
        assert_eq!(encode_value("f", "dict", &PropValue::Null).unwrap(), "'{}'");
    }

    #[test]
    fn test_encode_unknown_type() {
        let err = encode_value("f", "geo", &PropValue::Int(1)).unwrap_err();
        assert!(matches!(err, AccessError::UnsupportedType { .. }));
    }

    #[test]
    fn test_encode_modifiers_ignored() {
        assert_eq!(
            encode_value("f", "string NOT NULL DEFAULT \"\"", &PropValue::String("x".into()))
                .unwrap(),
            "\"x\""
        );
    }

    #[test]
    fn test_decode_round_trip_primitives() {
        assert_eq!(decode_value("f", "int", "42").unwrap(), PropValue::Int(42));
        assert_eq!(decode_value("f", "int8", "-7").unwrap(), PropValue::Int(-7));
        assert_eq!(
            decode_value("f", "double", "1.5").unwrap(),
            PropValue::Float(1.5)
        );
        assert_eq!(
            decode_value("f", "bool", "true").unwrap(),
            PropValue::Bool(true)
        );
        assert_eq!(
            decode_value("f", "string", "\"x\"").unwrap(),
            PropValue::String("x".into())
        );
        assert_eq!(
            decode_value("f", "timestamp", "1700000000").unwrap(),
            PropValue::Int(1700000000)
        );
    }

    #[test]
    fn test_decode_null_sentinel_zero_values() {
        assert_eq!(decode_value("f", "int", "__NULL__").unwrap(), PropValue::Int(0));
        assert_eq!(
            decode_value("f", "double", "__NULL__").unwrap(),
            PropValue::Float(0.0)
        );
        assert_eq!(
            decode_value("f", "bool", "__NULL__").unwrap(),
            PropValue::Bool(false)
        );
        assert_eq!(
            decode_value("f", "string", "__NULL__").unwrap(),
            PropValue::String(String::new())
        );
        assert_eq!(
            decode_value("f", "list", "__NULL__").unwrap(),
            PropValue::List(vec![])
        );
        assert_eq!(
            decode_value("f", "dict", "__NULL__").unwrap(),
            PropValue::Dict(Default::default())
        );
    }

    #[test]
    fn test_decode_unknown_prop_normalized() {
        assert_eq!(
            decode_value("f", "string", "UNKNOWN_PROP").unwrap(),
            PropValue::String(String::new())
        );
        assert_eq!(decode_value("f", "int", "UNKNOWN_PROP").unwrap(), PropValue::Int(0));
    }

    #[test]
    fn test_decode_datetime_reformat() {
        assert_eq!(
            decode_value("f", "datetime", "\"2024-03-01T08:30:00.000000\"").unwrap(),
            PropValue::String("2024-03-01 08:30:00".into())
        );
    }

    #[test]
    #[should_panic(expected = "nebula datetime format changed")]
    fn test_decode_datetime_format_drift_panics() {
        let _ = decode_value("f", "datetime", "\"01/03/2024\"");
    }

    #[test]
    fn test_decode_list_and_dict() {
        assert_eq!(
            decode_value("f", "list", "\"[1,2]\"").unwrap(),
            PropValue::List(vec![PropValue::Int(1), PropValue::Int(2)])
        );
        // engine返回的dict文本，剥一层外围引号后即为JSON
        let ok = decode_value("f", "dict", "\"{\"k\":1}\"").unwrap();
        let mut expected = BTreeMap::new();
        expected.insert("k".to_string(), PropValue::Int(1));
        assert_eq!(ok, PropValue::Dict(expected));
        // 非法JSON报DecodeError
        let bad = decode_value("f", "list", "\"not json\"").unwrap_err();
        assert!(matches!(bad, AccessError::Decode { .. }));
    }

    #[test]
    fn test_decode_width_checked() {
        assert!(decode_value("f", "int8", "300").is_err());
        assert!(decode_value("f", "int16", "70000").is_err());
        assert_eq!(decode_value("f", "int32", "70000").unwrap(), PropValue::Int(70000));
    }

    #[test]
    fn test_decode_error_names_field_and_type() {
        let err = decode_value("age", "int", "abc").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("age"), "错误信息应包含字段名: {msg}");
        assert!(msg.contains("int"), "错误信息应包含声明类型: {msg}");
    }
}
