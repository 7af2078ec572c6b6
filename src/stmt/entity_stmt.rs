//! 实体语句构造
//!
//! INSERT/UPDATE/DELETE/FETCH/LOOKUP以及GO遍历语句的生成，
//! 包括分页与多值搜索查询。所有值文本经由 [`crate::codec`] 编码。

use crate::codec::encode_value;
use crate::core::error::{AccessError, AccessResult};
use crate::core::schema::{
    decl_keyword, is_number_type, is_searchable_type, Record, Schema, CREATED_AT_FIELD,
    DST_VID_FIELD, SRC_VID_FIELD, VID_FIELD,
};
use crate::core::validate::{validate_edge, validate_vertex};
use crate::core::value::PropValue;

/// 未指定页大小时的默认值
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// 结果默认排序子句（schema含created_at字段时追加）
const ORDER_BY_CREATED_AT: &str = " | ORDER BY $-.created_at ASC";

/// 分页参数。index为1起始的页号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: i64,
    pub size: i64,
}

impl Page {
    /// 非法取值回落默认：index ≤ 0 → 1，size ≤ 0 → 20
    pub fn normalize(self) -> Page {
        Page {
            index: if self.index <= 0 { 1 } else { self.index },
            size: if self.size <= 0 { DEFAULT_PAGE_SIZE } else { self.size },
        }
    }

    /// LIMIT偏移量 = (页号 - 1) * 页大小
    pub fn offset(self) -> i64 {
        let p = self.normalize();
        (p.index - 1) * p.size
    }

    /// 生成`| LIMIT offset, size`管道子句
    pub fn limit_clause(self) -> String {
        let p = self.normalize();
        format!(" | LIMIT {}, {}", p.offset(), p.size)
    }
}

/// 检查数据记录中的字段都在schema内（标识字段除外）
fn check_data_fields(
    data: &Record,
    schema: &Schema,
    id_fields: &[&str],
    context: &str,
) -> AccessResult<()> {
    for field in data.keys() {
        if id_fields.contains(&field.as_str()) {
            continue;
        }
        if !schema.contains(field) {
            return Err(AccessError::illegal_field(field.clone(), context.to_string()));
        }
    }
    Ok(())
}

/// 构造INSERT VERTEX语句。data中没有提供值的schema字段被省略
/// （允许部分写入）。
pub fn insert_vertex_stmt(tag: &str, schema: &Schema, data: &Record) -> AccessResult<String> {
    check_data_fields(
        data,
        schema,
        &[VID_FIELD],
        &format!("vertex insert on tag '{}'", tag),
    )?;
    let vid = validate_vertex(data)?;

    let mut names = Vec::new();
    let mut values = Vec::new();
    for (field, decl) in schema.iter() {
        let Some(val) = data.get(field) else {
            continue;
        };
        names.push(field.to_string());
        values.push(encode_value(field, decl, val)?);
    }
    Ok(format!(
        "INSERT VERTEX {}({}) VALUES \"{}\":({});",
        tag,
        names.join(", "),
        vid,
        values.join(", ")
    ))
}

/// 构造INSERT EDGE语句。字段名与值在同一次遍历中成对产出，
/// 部分写入时两个列表保持位置对齐。
pub fn insert_edge_stmt(edge: &str, schema: &Schema, data: &Record) -> AccessResult<String> {
    check_data_fields(
        data,
        schema,
        &[SRC_VID_FIELD, DST_VID_FIELD],
        &format!("edge insert on edge type '{}'", edge),
    )?;
    let (src, dst) = validate_edge(data)?;

    let mut names = Vec::new();
    let mut values = Vec::new();
    for (field, decl) in schema.iter() {
        let Some(val) = data.get(field) else {
            continue;
        };
        names.push(field.to_string());
        values.push(encode_value(field, decl, val)?);
    }
    Ok(format!(
        "INSERT EDGE {}({}) VALUES \"{}\"->\"{}\":({});",
        edge,
        names.join(", "),
        src,
        dst,
        values.join(", ")
    ))
}

/// 无属性edge的INSERT语句
pub fn insert_empty_edge_stmt(edge: &str, src: &str, dst: &str) -> String {
    format!("INSERT EDGE {}() VALUES '{}' -> '{}':();", edge, src, dst)
}

/// UPDATE语句的两种模式
#[derive(Debug, Clone, Copy)]
pub enum UpdateMode<'a> {
    /// 全量替换：遍历整个schema，跳过skip列表（如保护只读字段）
    /// 与data中缺失的字段
    Replace { skip: &'a [&'a str] },
    /// 局部更新：只更新显式给出的字段，字段不在schema或data中
    /// 缺值都是错误
    Partial { fields: &'a [&'a str] },
}

/// 构造UPDATE VERTEX语句
pub fn update_vertex_stmt(
    tag: &str,
    schema: &Schema,
    data: &Record,
    mode: UpdateMode<'_>,
) -> AccessResult<String> {
    let vid = validate_vertex(data)?;

    let mut assignments = Vec::new();
    match mode {
        UpdateMode::Replace { skip } => {
            check_data_fields(
                data,
                schema,
                &[VID_FIELD],
                &format!("vertex update on tag '{}'", tag),
            )?;
            for (field, decl) in schema.iter() {
                if skip.contains(&field) {
                    continue;
                }
                let Some(val) = data.get(field) else {
                    continue;
                };
                assignments.push(format!("{} = {}", field, encode_value(field, decl, val)?));
            }
        }
        UpdateMode::Partial { fields } => {
            if fields.is_empty() {
                return Err(AccessError::missing_value(
                    "update_fields",
                    "no field specified for partial update",
                ));
            }
            for field in fields {
                let decl = schema.get(field).ok_or_else(|| {
                    AccessError::illegal_field(*field, "found in param `update_fields`")
                })?;
                let val = data.get(*field).ok_or_else(|| {
                    AccessError::missing_value(*field, "partial vertex update")
                })?;
                assignments.push(format!("{} = {}", field, encode_value(field, decl, val)?));
            }
        }
    }
    if assignments.is_empty() {
        return Err(AccessError::missing_value(
            "data",
            format!("no updatable field for vertex '{}'", vid),
        ));
    }
    Ok(format!(
        "UPDATE VERTEX ON {} \"{}\" SET {};",
        tag,
        vid,
        assignments.join(", ")
    ))
}

/// 构造DELETE VERTEX语句
pub fn delete_vertex_stmt(vid: &str) -> String {
    format!("DELETE VERTEX \"{}\";", vid)
}

/// 构造DELETE EDGE语句：按(src, dst)有序对删除，作用域限定在
/// 一个edge type内
pub fn delete_edge_stmt(edge: &str, src: &str, dst: &str) -> String {
    format!("DELETE EDGE {} '{}' -> '{}';", edge, src, dst)
}

/// 属性投影的取值来源
#[derive(Debug, Clone, Copy)]
enum PropSource {
    /// FETCH/LOOKUP语句中的properties(vertex)
    Vertex,
    /// GO语句中远端节点的properties($$)
    FarEnd,
}

impl PropSource {
    fn expr(self) -> &'static str {
        match self {
            PropSource::Vertex => "properties(vertex)",
            PropSource::FarEnd => "properties($$)",
        }
    }
}

/// YIELD投影结果
struct Projection {
    /// 投影项列表，如`properties(vertex).age as age`；无投影时为空
    items: Vec<String>,
    /// 结果表的字段名顺序（含标识头字段），供结果解析对位
    fields: Vec<String>,
}

impl Projection {
    fn projected(&self) -> bool {
        !self.items.is_empty()
    }

    fn clause(&self) -> String {
        self.items.join(", ")
    }
}

/// 构造属性投影。show_fields为空投影整个schema；仅为["vid"]时
/// 不投影属性（只取标识）；否则按给定列表投影，schema含
/// created_at时自动补上以支撑排序。
fn build_projection(
    source: PropSource,
    schema: &Schema,
    show_fields: &[&str],
    head: &[&str],
) -> AccessResult<Projection> {
    let mut proj = Projection {
        items: Vec::new(),
        fields: head.iter().map(|f| f.to_string()).collect(),
    };

    if show_fields.is_empty() {
        for (field, _) in schema.iter() {
            proj.items
                .push(format!("{}.{} as {}", source.expr(), field, field));
            proj.fields.push(field.to_string());
        }
        return Ok(proj);
    }
    if show_fields == [VID_FIELD] {
        return Ok(proj);
    }

    let mut effective: Vec<&str> = show_fields.to_vec();
    if schema.contains(CREATED_AT_FIELD) && !effective.contains(&CREATED_AT_FIELD) {
        effective.push(CREATED_AT_FIELD);
    }
    for field in effective {
        if field == VID_FIELD {
            continue;
        }
        if !schema.contains(field) {
            return Err(AccessError::illegal_field(field, "invalid show field"));
        }
        proj.items
            .push(format!("{}.{} as {}", source.expr(), field, field));
        proj.fields.push(field.to_string());
    }
    Ok(proj)
}

/// 构造FETCH PROP语句，投影整个schema。
/// 返回(语句, 结果字段顺序)。
pub fn fetch_vertex_stmt(tag: &str, vid: &str, schema: &Schema) -> (String, Vec<String>) {
    let mut items = Vec::new();
    let mut fields = vec!["VertexID".to_string()];
    for (field, _) in schema.iter() {
        items.push(format!("properties(vertex).{} as {}", field, field));
        fields.push(field.to_string());
    }
    let stmt = format!(
        "FETCH PROP ON {} \"{}\" YIELD {};",
        tag,
        vid,
        items.join(", ")
    );
    (stmt, fields)
}

/// 仅用于存在性检查的FETCH语句（不投影属性）
pub fn fetch_exists_stmt(tag: &str, vid: &str) -> String {
    format!("FETCH PROP ON {} \"{}\"", tag, vid)
}

/// 查询一个vid关联的全部tag名称
pub fn fetch_tags_stmt(vid: &str) -> String {
    format!("FETCH PROP ON * '{}' YIELD tags(vertex) as tgs;", vid)
}

/// 构造LOOKUP语句：可选的等值过滤（字段间AND连接）、可选投影、
/// schema含created_at且有投影时追加排序。
/// 返回(语句, 结果字段顺序)。
pub fn lookup_stmt(
    tag: &str,
    schema: &Schema,
    filter: &Record,
    show_fields: &[&str],
) -> AccessResult<(String, Vec<String>)> {
    let mut stmt = format!("LOOKUP ON {}", tag);

    if !filter.is_empty() {
        let mut conds = Vec::new();
        for (field, val) in filter.iter() {
            let decl = schema
                .get(field)
                .ok_or_else(|| AccessError::illegal_field(field.clone(), "lookup filter"))?;
            conds.push(format!(
                "{}.{} == {}",
                tag,
                field,
                encode_value(field, decl, val)?
            ));
        }
        stmt.push_str(" WHERE ");
        stmt.push_str(&conds.join(" AND "));
    }

    let proj = build_projection(PropSource::Vertex, schema, show_fields, &["VertexID"])?;
    if proj.projected() {
        stmt.push_str(" YIELD ");
        stmt.push_str(&proj.clause());
        if schema.contains(CREATED_AT_FIELD) {
            stmt.push_str(ORDER_BY_CREATED_AT);
        }
    }
    stmt.push(';');
    Ok((stmt, proj.fields))
}

/// 分页、搜索、过滤查询描述。一次调用构造一个，不持久化。
///
/// 多个搜索值之间、多个搜索字段之间都是OR关系（OR of ORs）。
#[derive(Debug, Clone, Default)]
pub struct LookupQuery {
    /// 0表示不做分页
    pub page_size: i64,
    /// 1起始页号，分页时 ≤ 0 回落为1
    pub page_index: i64,
    /// 空表示不做搜索过滤
    pub search_fields: Vec<String>,
    pub search_values: Vec<String>,
    /// true采用`==`匹配，否则采用`STARTS WITH`前缀匹配
    /// （engine的lookup模糊匹配只支持STARTS WITH）
    pub explicit: bool,
}

/// 一次分页查询的执行计划：先跑count_stmt数总行数，再跑
/// page_stmt取当前页。engine没有count+slice合并原语，两次往返
/// 是正确性优先的取舍。
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub count_stmt: String,
    pub page_stmt: String,
    pub fields: Vec<String>,
}

impl LookupQuery {
    /// 单个搜索值的匹配条件文本
    fn match_cond(&self, tag: &str, field: &str, keyword: &str, literal: &str) -> String {
        if self.explicit || is_number_type(keyword) {
            format!("{}.{} == {}", tag, field, literal)
        } else {
            format!("{}.{} STARTS WITH {}", tag, field, literal)
        }
    }

    /// 把一个搜索值编码为字面量。数值类型的字段，搜索值文本
    /// 本身就是字面量；可搜索类型走codec编码。
    fn encode_search_value(field: &str, decl: &str, keyword: &str, value: &str) -> AccessResult<String> {
        if is_number_type(keyword) {
            Ok(value.to_string())
        } else {
            encode_value(field, decl, &PropValue::String(value.to_string()))
        }
    }

    /// 构造执行计划。不可搜索也非数值类型的字段被静默跳过。
    pub fn plan(&self, tag: &str, schema: &Schema, show_fields: &[&str]) -> AccessResult<QueryPlan> {
        let mut base = format!("LOOKUP ON {}", tag);

        if !self.search_fields.is_empty() {
            let mut groups = Vec::new();
            for field in &self.search_fields {
                let decl = schema.get(field).ok_or_else(|| {
                    AccessError::illegal_field(field.clone(), "param 'search_fields'")
                })?;
                let keyword = decl_keyword(decl).unwrap_or_default();
                if !is_number_type(&keyword) && !is_searchable_type(&keyword) {
                    continue;
                }

                let values: Vec<&str> = if self.search_values.is_empty() {
                    vec![""]
                } else {
                    self.search_values.iter().map(|s| s.as_str()).collect()
                };
                let mut conds = Vec::new();
                for value in values {
                    let literal = Self::encode_search_value(field, decl, &keyword, value)?;
                    conds.push(self.match_cond(tag, field, &keyword, &literal));
                }
                if conds.len() == 1 {
                    groups.push(conds.remove(0));
                } else {
                    groups.push(format!("({})", conds.join(" OR ")));
                }
            }
            if !groups.is_empty() {
                base.push_str(" WHERE ");
                base.push_str(&groups.join(" OR "));
            }
        }

        let proj = build_projection(PropSource::Vertex, schema, show_fields, &["VertexID"])?;
        if proj.projected() {
            base.push_str(" YIELD ");
            base.push_str(&proj.clause());
        }

        // 总数查询不排序不分页
        let count_stmt = format!("{};", base);

        let mut page_stmt = base;
        if proj.projected() && schema.contains(CREATED_AT_FIELD) {
            page_stmt.push_str(ORDER_BY_CREATED_AT);
        }
        if self.page_size > 0 {
            page_stmt.push_str(
                &Page {
                    index: self.page_index,
                    size: self.page_size,
                }
                .limit_clause(),
            );
        }
        page_stmt.push(';');

        Ok(QueryPlan {
            count_stmt,
            page_stmt,
            fields: proj.fields,
        })
    }
}

/// 构造edge的LOOKUP语句，结果为(起点, 终点)标识对。
/// 返回(语句, 结果字段顺序)。
pub fn lookup_edge_stmt(
    edge: &str,
    schema: &Schema,
    filter: &Record,
) -> AccessResult<(String, Vec<String>)> {
    let mut stmt = format!("LOOKUP ON {}", edge);
    if !filter.is_empty() {
        let mut conds = Vec::new();
        for (field, val) in filter.iter() {
            let decl = schema
                .get(field)
                .ok_or_else(|| AccessError::illegal_field(field.clone(), "edge lookup filter"))?;
            conds.push(format!(
                "{}.{} == {}",
                edge,
                field,
                encode_value(field, decl, val)?
            ));
        }
        stmt.push_str(" WHERE ");
        stmt.push_str(&conds.join(" AND "));
    }
    stmt.push_str(" YIELD src(edge) as SrcVID, dst(edge) as DstVID;");
    Ok((stmt, vec!["SrcVID".to_string(), "DstVID".to_string()]))
}

/// GO一跳（或n步）遍历，返回远端vertex属性数据的语句。
/// 要求远端vertex都关联给定schema的tag，否则string类型得到
/// UNKNOWN_PROP值、其他类型解码报错。
pub fn go_ends_stmt(
    start_vid: &str,
    over_edge: &str,
    steps: Option<u32>,
    schema: &Schema,
    show_fields: &[&str],
) -> AccessResult<(String, Vec<String>)> {
    let mut stmt = match steps {
        Some(n) => format!(
            "GO {} STEPS FROM \"{}\" OVER {} YIELD id($$) as VertexID",
            n.max(1),
            start_vid,
            over_edge
        ),
        None => format!(
            "GO FROM \"{}\" OVER {} YIELD id($$) as VertexID",
            start_vid, over_edge
        ),
    };
    let proj = build_projection(PropSource::FarEnd, schema, show_fields, &["VertexID"])?;
    if proj.projected() {
        stmt.push_str(", ");
        stmt.push_str(&proj.clause());
    }
    if schema.contains(CREATED_AT_FIELD) {
        stmt.push_str(ORDER_BY_CREATED_AT);
    }
    stmt.push(';');
    Ok((stmt, proj.fields))
}

/// GO一跳列出关联关系（边类型 + 远端标识 + 可选属性）的语句。
/// over为空表示沿全部edge type（`OVER *`）。
pub fn go_relations_stmt(
    start_vid: &str,
    over: &[&str],
    reverse: bool,
    schema: &Schema,
    show_fields: &[&str],
) -> AccessResult<(String, Vec<String>)> {
    let over_edge = if over.is_empty() {
        "*".to_string()
    } else {
        over.join(", ")
    };
    let reversely = if reverse { " REVERSELY" } else { "" };
    let mut stmt = format!(
        "GO FROM \"{}\" OVER {}{} YIELD type(edge) as edgeType, id($$) as vid",
        start_vid, over_edge, reversely
    );
    let mut fields = vec!["edgeType".to_string(), "vid".to_string()];
    for field in show_fields {
        if *field == VID_FIELD {
            continue;
        }
        if !schema.contains(field) {
            return Err(AccessError::illegal_field(*field, "invalid show field"));
        }
        stmt.push_str(&format!(", properties($$).{} as {}", field, field));
        fields.push(field.to_string());
    }
    stmt.push(';');
    Ok((stmt, fields))
}

/// 沿指定edge遍历并删除末端全部vertex的语句
pub fn go_delete_stmt(start_vid: &str, edge: &str, steps: Option<u32>) -> String {
    match steps {
        Some(n) => format!(
            "GO {} STEPS FROM \"{}\" OVER {} YIELD dst(edge) AS id | DELETE VERTEX $-.id;",
            n.max(1),
            start_vid,
            edge
        ),
        None => format!(
            "GO FROM \"{}\" OVER {} YIELD dst(edge) AS id | DELETE VERTEX $-.id;",
            start_vid, edge
        ),
    }
}

/// 末端/上游vertex存在性检查语句。LIMIT取threshold+1，调用方
/// 比较行数与threshold即可提前截断，避免大扇出下取全量。
pub fn go_exist_stmt(start_vid: &str, edge: &str, reverse: bool, threshold: usize) -> String {
    let reversely = if reverse { " REVERSELY" } else { "" };
    format!(
        "GO FROM \"{}\" OVER {}{} YIELD dst(edge) AS vid | LIMIT {};",
        start_vid,
        edge,
        reversely,
        threshold + 1
    )
}

/// tag下是否存在vertex的检查语句
pub fn lookup_exist_stmt(tag: &str, threshold: usize) -> String {
    format!("LOOKUP ON {} | LIMIT {};", tag, threshold + 1)
}

/// 按唯一性字段检查重复数据的语句（字段间OR连接）。
///
/// unique_fields为空属于调用方用法错误，直接panic。
pub fn duplicate_check_stmt(
    tag: &str,
    schema: &Schema,
    data: &Record,
    unique_fields: &[&str],
) -> AccessResult<String> {
    if unique_fields.is_empty() {
        panic!("duplicate_check_stmt: usage error, param 'unique_fields' should not be empty");
    }
    let mut conds = Vec::new();
    for field in unique_fields {
        let decl = schema
            .get(field)
            .ok_or_else(|| AccessError::illegal_field(*field, "param 'unique_fields'"))?;
        let val = data.get(*field).cloned().unwrap_or(PropValue::Null);
        conds.push(format!(
            "{}.{} == {}",
            tag,
            field,
            encode_value(field, decl, &val)?
        ));
    }
    Ok(format!("LOOKUP ON {} WHERE {};", tag, conds.join(" OR ")))
}
