//! 实体数据校验
//!
//! 校验vertex/edge数据记录中的标识字段是否存在且非空。

use crate::core::error::{AccessError, AccessResult};
use crate::core::schema::{Record, DST_VID_FIELD, SRC_VID_FIELD, VID_FIELD};

/// 校验tag名、edge type名、vid等命名字符串非空
pub fn validate_name(name: &str, what: &str) -> AccessResult<()> {
    if name.trim().is_empty() {
        return Err(AccessError::missing_value(what, "name must not be empty"));
    }
    Ok(())
}

/// 从数据记录中取出非空的字符串标识字段
pub fn require_id(data: &Record, field: &str, context: &str) -> AccessResult<String> {
    let id = data
        .get(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    if id.is_empty() {
        return Err(AccessError::missing_value(field, context));
    }
    Ok(id)
}

/// 校验vertex数据记录：必须携带非空vid
pub fn validate_vertex(data: &Record) -> AccessResult<String> {
    require_id(data, VID_FIELD, "vertex data")
}

/// 校验edge数据记录：必须携带非空的src_vid与dst_vid，返回(src, dst)
pub fn validate_edge(data: &Record) -> AccessResult<(String, String)> {
    let src = require_id(data, SRC_VID_FIELD, "edge data")?;
    let dst = require_id(data, DST_VID_FIELD, "edge data")?;
    Ok((src, dst))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::PropValue;

    #[test]
    fn test_validate_vertex_requires_vid() {
        let mut data = Record::new();
        assert!(validate_vertex(&data).is_err());

        data.insert(VID_FIELD.to_string(), PropValue::String("".to_string()));
        assert!(validate_vertex(&data).is_err());

        data.insert(VID_FIELD.to_string(), PropValue::String("v1".to_string()));
        assert_eq!(validate_vertex(&data).unwrap(), "v1");
    }

    #[test]
    fn test_validate_edge_requires_both_ends() {
        let mut data = Record::new();
        data.insert(SRC_VID_FIELD.to_string(), PropValue::String("a".to_string()));
        assert!(validate_edge(&data).is_err());

        data.insert(DST_VID_FIELD.to_string(), PropValue::String("b".to_string()));
        assert_eq!(validate_edge(&data).unwrap(), ("a".to_string(), "b".to_string()));
    }

    #[test]
    fn test_non_string_vid_rejected() {
        let mut data = Record::new();
        data.insert(VID_FIELD.to_string(), PropValue::Int(7));
        assert!(validate_vertex(&data).is_err());
    }
}
