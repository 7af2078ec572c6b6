//! Schema语句构造
//!
//! 面向tag与edge type的CREATE/ALTER/DROP语句，以及配套的基础
//! 索引语句。ALTER通过对比新旧schema计算最小变更子句。

use crate::core::error::{AccessError, AccessResult};
use crate::core::schema::{decl_keyword, is_complex_type, Schema};
use crate::core::validate::validate_name;

/// 基础索引的固定后缀，索引名 = 实体类型名 + 后缀
pub const BASIC_INDEX_SUFFIX: &str = "_index_0";

/// 由实体类型名推导其基础索引名
pub fn basic_index_name(name: &str) -> String {
    format!("{}{}", name, BASIC_INDEX_SUFFIX)
}

/// schema语句作用的实体类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tag,
    Edge,
}

impl EntityKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            EntityKind::Tag => "TAG",
            EntityKind::Edge => "EDGE",
        }
    }
}

/// LIST/DICT伪类型在schema语句中重写为string存储
fn rewrite_complex_decl(decl: &str) -> String {
    let mut tokens: Vec<&str> = decl.split_whitespace().collect();
    if let Some(first) = tokens.first() {
        if is_complex_type(first.to_uppercase().as_str()) {
            tokens[0] = "string";
        }
    }
    tokens.join(" ")
}

/// 声明清洗：trim、大写、压缩空白。仅做token级整理，不做token
/// 重排或修饰符同义词归一化。
fn clean_decl(decl: &str) -> String {
    decl.split_whitespace()
        .map(|t| t.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 判断一个字段声明是否发生了变化（基于清洗后的文本比较）
fn decl_changed(old_decl: &str, new_decl: &str) -> bool {
    clean_decl(old_decl) != clean_decl(new_decl)
}

/// 构造CREATE TAG/EDGE语句。不允许空schema；LIST/DICT重写为string。
pub fn create_stmt(
    kind: EntityKind,
    name: &str,
    schema: &Schema,
    if_not_exists: bool,
) -> AccessResult<String> {
    validate_name(name, "name")?;
    if schema.is_empty() {
        return Err(AccessError::missing_value(
            "schema",
            format!("create {} '{}'", kind.keyword().to_lowercase(), name),
        ));
    }

    let mut stmt = format!("CREATE {} ", kind.keyword());
    if if_not_exists {
        stmt.push_str("IF NOT EXISTS ");
    }
    stmt.push_str(name);
    stmt.push('(');
    let mut defs = Vec::with_capacity(schema.len());
    for (field, decl) in schema.iter() {
        let field = field.trim();
        let decl = decl.trim();
        if field.is_empty() || decl.is_empty() {
            return Err(AccessError::missing_value(
                field,
                "schema field and declaration cannot be empty",
            ));
        }
        if decl_keyword(decl).is_none() {
            return Err(AccessError::UnsupportedType {
                field: field.to_string(),
                decl: decl.to_string(),
            });
        }
        defs.push(format!("{} {}", field, rewrite_complex_decl(decl)));
    }
    stmt.push_str(&defs.join(", "));
    stmt.push_str(");");
    Ok(stmt)
}

/// 构造基础索引的CREATE语句（幂等）
pub fn create_index_stmt(kind: EntityKind, name: &str) -> String {
    format!(
        "CREATE {} INDEX IF NOT EXISTS {} ON {}();",
        kind.keyword(),
        basic_index_name(name),
        name
    )
}

/// 构造DROP TAG/EDGE语句
pub fn drop_stmt(kind: EntityKind, name: &str, if_exists: bool) -> String {
    let mut stmt = format!("DROP {} ", kind.keyword());
    if if_exists {
        stmt.push_str("IF EXISTS ");
    }
    stmt.push_str(name);
    stmt.push(';');
    stmt
}

/// 构造索引DROP语句
pub fn drop_index_stmt(kind: EntityKind, index: &str) -> String {
    format!("DROP {} INDEX {};", kind.keyword(), index)
}

/// 列出全部索引的语句，用于drop前发现关联索引
pub fn show_indexes_stmt(kind: EntityKind) -> String {
    format!("SHOW {} INDEXES;", kind.keyword())
}

/// 对比新旧schema，构造最小变更的ALTER语句。
///
/// 字段划分为三组：仅新schema有的进ADD；两边都有但清洗后声明
/// 不同的进CHANGE；仅旧schema有的进DROP。三组皆空时返回None，
/// 表示无变更、不下发语句。
pub fn alter_stmt(
    kind: EntityKind,
    name: &str,
    old_schema: &Schema,
    new_schema: &Schema,
) -> Option<String> {
    let mut add_props = Vec::new();
    let mut change_props = Vec::new();
    let mut drop_props = Vec::new();

    for (field, new_decl) in new_schema.iter() {
        match old_schema.get(field) {
            None => add_props.push(format!("{} {}", field, rewrite_complex_decl(new_decl))),
            Some(old_decl) => {
                if decl_changed(old_decl, new_decl) {
                    change_props.push(format!("{} {}", field, rewrite_complex_decl(new_decl)));
                }
            }
        }
    }
    for (field, _) in old_schema.iter() {
        if !new_schema.contains(field) {
            drop_props.push(field.to_string());
        }
    }

    if add_props.is_empty() && change_props.is_empty() && drop_props.is_empty() {
        return None;
    }

    // 子句固定顺序：ADD、CHANGE、DROP，存在的子句间逗号连接
    let mut clauses = Vec::new();
    if !add_props.is_empty() {
        clauses.push(format!("ADD ({})", add_props.join(", ")));
    }
    if !change_props.is_empty() {
        clauses.push(format!("CHANGE ({})", change_props.join(", ")));
    }
    if !drop_props.is_empty() {
        clauses.push(format!("DROP ({})", drop_props.join(", ")));
    }
    Some(format!(
        "ALTER {} {} {};",
        kind.keyword(),
        name,
        clauses.join(", ")
    ))
}
