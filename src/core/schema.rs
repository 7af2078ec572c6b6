//! Schema定义与实体抽象
//!
//! Schema是字段名到字段类型声明的有序映射，附属于唯一的tag或
//! edge type。类型声明的第一个token（大写后）必须是已知的类型
//! 关键字，其余token为存储修饰符，编解码时忽略。
//!
//! [`GraphEntity`] 是实体的能力对：产出(类型名, schema)与产出
//! 扁平数据记录。语句构造只面向该trait，不依赖具体实体类型。

use crate::core::value::PropValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// vertex标识字段名
pub const VID_FIELD: &str = "vid";
/// edge起点标识字段名
pub const SRC_VID_FIELD: &str = "src_vid";
/// edge终点标识字段名
pub const DST_VID_FIELD: &str = "dst_vid";
/// 存在该字段时，查询结果默认按其升序排列
pub const CREATED_AT_FIELD: &str = "created_at";

/// 以数值形式存储的类型
pub const NUMBER_TYPES: &[&str] = &[
    "INT",
    "INT64",
    "INT32",
    "INT16",
    "INT8",
    "FLOAT",
    "DOUBLE",
    "BOOL",
    "TIMESTAMP",
];

/// 日期时间类型
pub const TIME_TYPES: &[&str] = &["DATE", "TIME", "DATETIME"];

/// 复合伪类型，DB侧以JSON字符串存储
pub const COMPLEX_TYPES: &[&str] = &["LIST", "DICT"];

/// 以字符串形式存储、可做前缀/等值文本搜索的类型
pub const SEARCHABLE_TYPES: &[&str] = &["STRING", "IPADDR", "LIST", "DICT"];

/// nGQL保留关键字，字段命名时应避开
pub const NGQL_KEYWORDS: &[&str] = &[
    "GO", "AS", "TO", "OR", "AND", "XOR", "USE", "SET", "FROM", "WHERE", "MATCH", "INSERT",
    "YIELD", "RETURN", "DESCRIBE", "DESC", "VERTEX", "VERTICES", "EDGE", "EDGES", "UPDATE",
    "UPSERT", "WHEN", "DELETE", "FIND", "LOOKUP", "ALTER", "STEPS", "STEP", "OVER", "UPTO",
    "REVERSELY", "INDEX", "INDEXES", "REBUILD", "BOOL", "INT8", "INT16", "INT32", "INT64",
    "INT", "FLOAT", "DOUBLE", "STRING", "FIXED_STRING", "TIMESTAMP", "DATE", "TIME",
    "DATETIME", "TAG", "TAGS", "UNION", "INTERSECT", "MINUS", "NO", "OVERWRITE", "SHOW",
    "ADD", "CREATE", "DROP", "REMOVE", "IF", "NOT", "EXISTS", "WITH", "CHANGE", "GRANT",
    "REVOKE", "ON", "BY", "IN", "NOT_IN", "DOWNLOAD", "GET", "OF", "ORDER", "INGEST",
    "COMPACT", "FLUSH", "SUBMIT", "ASC", "ASCENDING", "DESCENDING", "DISTINCT", "FETCH",
    "PROP", "BALANCE", "STOP", "LIMIT", "OFFSET", "IS", "NULL", "RECOVER", "EXPLAIN",
    "PROFILE", "FORMAT", "CASE",
];

/// 检查一个单词是否为nGQL保留关键字（大小写不敏感）
pub fn is_ngql_keyword(word: &str) -> bool {
    let upper = word.to_uppercase();
    NGQL_KEYWORDS.contains(&upper.as_str())
}

/// 提取字段类型声明的首个token并大写，即类型关键字
pub fn decl_keyword(decl: &str) -> Option<String> {
    decl.split_whitespace().next().map(|t| t.to_uppercase())
}

pub fn is_number_type(keyword: &str) -> bool {
    NUMBER_TYPES.contains(&keyword)
}

pub fn is_searchable_type(keyword: &str) -> bool {
    SEARCHABLE_TYPES.contains(&keyword)
}

pub fn is_complex_type(keyword: &str) -> bool {
    COMPLEX_TYPES.contains(&keyword)
}

/// 实体的扁平数据记录：字段名 -> 属性值
pub type Record = BTreeMap<String, PropValue>;

/// 一个tag或edge type的属性schema：字段名 -> 类型声明。
///
/// 底层使用BTreeMap，保证语句生成与YIELD投影的字段顺序确定，
/// 结果解析可按同一顺序对位。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: BTreeMap<String, String>,
}

impl Schema {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// 追加一个字段定义，便于链式构造
    pub fn field(mut self, name: impl Into<String>, decl: impl Into<String>) -> Self {
        self.fields.insert(name.into(), decl.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, decl: impl Into<String>) {
        self.fields.insert(name.into(), decl.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 按字段名顺序迭代 (字段名, 类型声明)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Schema {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 实体能力对：任何可写入DB的具体实体类型都要实现这两个方法。
pub trait GraphEntity {
    /// 产出实体类型名（vertex的tag / edge的edge type）与属性schema。
    /// schema仅含属性字段定义，不含vid/src_vid/dst_vid。
    fn schema(&self) -> (String, Schema);

    /// 产出可写入DB的扁平数据记录。
    /// vertex必须包含`vid`字段；edge必须包含`src_vid`、`dst_vid`两个字段。
    fn data(&self) -> Record;
}

/// 通用vertex实体，供无需自定义结构体的调用方使用
#[derive(Debug, Clone)]
pub struct VertexData {
    pub tag: String,
    pub schema: Schema,
    pub props: Record,
}

impl VertexData {
    pub fn new(tag: impl Into<String>, schema: Schema, vid: impl Into<String>) -> Self {
        let mut props = Record::new();
        props.insert(VID_FIELD.to_string(), PropValue::String(vid.into()));
        Self {
            tag: tag.into(),
            schema,
            props,
        }
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }
}

impl GraphEntity for VertexData {
    fn schema(&self) -> (String, Schema) {
        (self.tag.clone(), self.schema.clone())
    }

    fn data(&self) -> Record {
        self.props.clone()
    }
}

/// 通用edge实体
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub edge_type: String,
    pub schema: Schema,
    pub props: Record,
}

impl EdgeData {
    pub fn new(
        edge_type: impl Into<String>,
        schema: Schema,
        src_vid: impl Into<String>,
        dst_vid: impl Into<String>,
    ) -> Self {
        let mut props = Record::new();
        props.insert(SRC_VID_FIELD.to_string(), PropValue::String(src_vid.into()));
        props.insert(DST_VID_FIELD.to_string(), PropValue::String(dst_vid.into()));
        Self {
            edge_type: edge_type.into(),
            schema,
            props,
        }
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }
}

impl GraphEntity for EdgeData {
    fn schema(&self) -> (String, Schema) {
        (self.edge_type.clone(), self.schema.clone())
    }

    fn data(&self) -> Record {
        self.props.clone()
    }
}
