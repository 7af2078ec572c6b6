//! 结果表解析
//!
//! engine以字符串表形式返回查询结果：首行为列名表头，其余行为
//! 数据。本模块按schema把字符串表还原为类型化的数据记录。

use crate::codec::decode_value;
use crate::core::error::{AccessError, AccessResult};
use crate::core::schema::{Record, Schema, DST_VID_FIELD, SRC_VID_FIELD, VID_FIELD};

/// engine返回的字符串表，首行为表头
pub type StringTable = Vec<Vec<String>>;

/// 语句投影产生的标识列名与其在数据记录中的字段名映射。
/// 标识列一律按string解码。
fn identity_field(index: usize, field: &str) -> Option<&'static str> {
    match (index, field) {
        (0, "VertexID") => Some(VID_FIELD),
        (0, "SrcVID") => Some(SRC_VID_FIELD),
        (1, "DstVID") => Some(DST_VID_FIELD),
        (_, "vid") => Some(VID_FIELD),
        (_, "edgeType") => Some("edgeType"),
        _ => None,
    }
}

/// 把字符串表解析为数据记录列表。
///
/// fields给出各列对应的字段名（与语句投影顺序一致），属性列的
/// 声明类型取自schema。表头行不参与解析，行数 ≤ 1 视为空结果。
/// 列数与fields长度不一致说明语句与解析脱节，报解码错误。
pub fn parse_string_table(
    table: &[Vec<String>],
    fields: &[String],
    schema: &Schema,
) -> AccessResult<Vec<Record>> {
    if table.len() <= 1 {
        return Ok(Vec::new());
    }

    // 预先确定每列的输出字段名与解码类型
    let mut columns = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        if let Some(name) = identity_field(i, field) {
            columns.push((name.to_string(), "string".to_string()));
            continue;
        }
        let decl = schema.get(field).ok_or_else(|| AccessError::Decode {
            field: field.clone(),
            decl: String::new(),
            reason: "field not found in schema".to_string(),
        })?;
        columns.push((field.clone(), decl.to_string()));
    }

    let mut records = Vec::with_capacity(table.len() - 1);
    for row in &table[1..] {
        if row.len() != columns.len() {
            return Err(AccessError::Decode {
                field: String::new(),
                decl: String::new(),
                reason: format!(
                    "row has {} columns but statement yields {} fields",
                    row.len(),
                    columns.len()
                ),
            });
        }
        let mut record = Record::new();
        for ((name, decl), cell) in columns.iter().zip(row.iter()) {
            record.insert(name.clone(), decode_value(name, decl, cell)?);
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::PropValue;

    fn person_schema() -> Schema {
        Schema::new().field("name", "string").field("age", "int")
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_empty_and_header_only_table() {
        let fields = vec!["VertexID".to_string()];
        assert!(parse_string_table(&[], &fields, &person_schema())
            .unwrap()
            .is_empty());
        let table = vec![row(&["VertexID"])];
        assert!(parse_string_table(&table, &fields, &person_schema())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_vertex_table_remaps_identity() {
        let fields = vec![
            "VertexID".to_string(),
            "age".to_string(),
            "name".to_string(),
        ];
        let table = vec![
            row(&["VertexID", "age", "name"]),
            row(&["\"v1\"", "30", "\"alice\""]),
        ];
        let records = parse_string_table(&table, &fields, &person_schema()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("vid"), Some(&PropValue::String("v1".to_string())));
        assert_eq!(records[0].get("age"), Some(&PropValue::Int(30)));
        assert_eq!(
            records[0].get("name"),
            Some(&PropValue::String("alice".to_string()))
        );
        // 表头列名VertexID不会以原名残留
        assert!(records[0].get("VertexID").is_none());
    }

    #[test]
    fn test_edge_table_remaps_both_ends() {
        let schema = Schema::new().field("since", "int");
        let fields = vec![
            "SrcVID".to_string(),
            "DstVID".to_string(),
            "since".to_string(),
        ];
        let table = vec![
            row(&["SrcVID", "DstVID", "since"]),
            row(&["\"a\"", "\"b\"", "2020"]),
        ];
        let records = parse_string_table(&table, &fields, &schema).unwrap();
        assert_eq!(
            records[0].get("src_vid"),
            Some(&PropValue::String("a".to_string()))
        );
        assert_eq!(
            records[0].get("dst_vid"),
            Some(&PropValue::String("b".to_string()))
        );
        assert_eq!(records[0].get("since"), Some(&PropValue::Int(2020)));
    }

    #[test]
    fn test_relation_table_identity_columns() {
        // GO关系查询的edgeType与vid列都按string解码，不查schema
        let fields = vec!["edgeType".to_string(), "vid".to_string()];
        let table = vec![
            row(&["edgeType", "vid"]),
            row(&["\"knows\"", "\"v2\""]),
        ];
        let records = parse_string_table(&table, &fields, &Schema::new()).unwrap();
        assert_eq!(
            records[0].get("edgeType"),
            Some(&PropValue::String("knows".to_string()))
        );
        assert_eq!(records[0].get("vid"), Some(&PropValue::String("v2".to_string())));
    }

    #[test]
    fn test_unknown_field_is_decode_error() {
        let fields = vec!["height".to_string()];
        let table = vec![row(&["height"]), row(&["180"])];
        let err = parse_string_table(&table, &fields, &person_schema()).unwrap_err();
        assert!(matches!(err, AccessError::Decode { .. }));
    }

    #[test]
    fn test_misaligned_row_is_decode_error() {
        let fields = vec!["VertexID".to_string(), "age".to_string()];
        let table = vec![row(&["VertexID", "age"]), row(&["\"v1\""])];
        let err = parse_string_table(&table, &fields, &person_schema()).unwrap_err();
        assert!(matches!(err, AccessError::Decode { .. }));
    }

    #[test]
    fn test_unknown_prop_decodes_to_zero_value() {
        let fields = vec!["VertexID".to_string(), "name".to_string()];
        let table = vec![
            row(&["VertexID", "name"]),
            row(&["\"v1\"", "UNKNOWN_PROP"]),
        ];
        let records = parse_string_table(&table, &fields, &person_schema()).unwrap();
        assert_eq!(
            records[0].get("name"),
            Some(&PropValue::String(String::new()))
        );
    }
}
