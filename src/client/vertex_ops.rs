//! vertex操作
//!
//! 插入、更新、删除、FETCH/LOOKUP查询与GO遍历。查询结果统一
//! 经由结果表解析器还原为类型化的数据记录。

use crate::client::GraphClient;
use crate::core::error::{AccessError, AccessResult};
use crate::core::schema::{GraphEntity, Record, Schema};
use crate::core::validate::validate_vertex;
use crate::result::parse_string_table;
use crate::stmt::entity_stmt::{
    delete_vertex_stmt, duplicate_check_stmt, fetch_exists_stmt, fetch_tags_stmt,
    fetch_vertex_stmt, go_delete_stmt, go_ends_stmt, go_exist_stmt, go_relations_stmt,
    insert_vertex_stmt, lookup_exist_stmt, lookup_stmt, update_vertex_stmt, LookupQuery,
    UpdateMode,
};

impl GraphClient {
    /// 插入vertex。默认vid已存在即报AlreadyExists且不下发INSERT；
    /// allow_replace时直接覆盖写入。
    ///
    /// 存在性检查与插入是两条语句，非原子，并发写同一vid时为
    /// 尽力而为的保护。
    pub fn insert_vertex<E: GraphEntity>(&self, entity: &E, allow_replace: bool) -> AccessResult<()> {
        let (tag, schema) = entity.schema();
        let data = entity.data();
        let vid = validate_vertex(&data)?;

        if !allow_replace && self.vertex_exists(&tag, &vid)? {
            return Err(AccessError::AlreadyExists(vid));
        }
        let stmt = insert_vertex_stmt(&tag, &schema, &data)?;
        self.execute(&stmt)?;
        Ok(())
    }

    /// tag下指定vid的vertex是否存在
    pub fn vertex_exists(&self, tag: &str, vid: &str) -> AccessResult<bool> {
        let result = self.execute(&fetch_exists_stmt(tag, vid))?;
        Ok(!result.is_empty())
    }

    /// 按vid删除vertex（跨全部tag）
    pub fn delete_vertex(&self, vid: &str) -> AccessResult<()> {
        self.execute(&delete_vertex_stmt(vid))?;
        Ok(())
    }

    /// 全量替换vertex属性，skip_fields列出的字段保持原值
    pub fn replace_vertex<E: GraphEntity>(&self, entity: &E, skip_fields: &[&str]) -> AccessResult<()> {
        let (tag, schema) = entity.schema();
        let data = entity.data();
        let stmt = update_vertex_stmt(&tag, &schema, &data, UpdateMode::Replace { skip: skip_fields })?;
        self.execute(&stmt)?;
        Ok(())
    }

    /// 局部更新vertex，只写入显式列出的字段
    pub fn update_vertex<E: GraphEntity>(&self, entity: &E, fields: &[&str]) -> AccessResult<()> {
        let (tag, schema) = entity.schema();
        let data = entity.data();
        let stmt = update_vertex_stmt(&tag, &schema, &data, UpdateMode::Partial { fields })?;
        self.execute(&stmt)?;
        Ok(())
    }

    /// FETCH单个vertex的全部属性。未命中报NoData而不是空记录。
    pub fn fetch_vertex(&self, tag: &str, schema: &Schema, vid: &str) -> AccessResult<Record> {
        let (stmt, fields) = fetch_vertex_stmt(tag, vid, schema);
        let result = self.execute(&stmt)?;
        let mut records = parse_string_table(&result.table, &fields, schema)?;
        if records.is_empty() {
            return Err(AccessError::NoData(format!(
                "vertex '{}' of tag '{}'",
                vid, tag
            )));
        }
        Ok(records.remove(0))
    }

    /// LOOKUP查询：等值过滤 + 可选投影
    pub fn lookup_vertices(
        &self,
        tag: &str,
        schema: &Schema,
        filter: &Record,
        show_fields: &[&str],
    ) -> AccessResult<Vec<Record>> {
        let (stmt, fields) = lookup_stmt(tag, schema, filter, show_fields)?;
        let result = self.execute(&stmt)?;
        parse_string_table(&result.table, &fields, schema)
    }

    /// 分页/搜索查询，返回(当前页记录, 总行数)。
    ///
    /// 两次往返：先执行不分页的计数语句取总数，再执行分页语句
    /// 取当前页。engine没有count+slice合并原语。
    pub fn query_vertices(
        &self,
        tag: &str,
        schema: &Schema,
        query: &LookupQuery,
        show_fields: &[&str],
    ) -> AccessResult<(Vec<Record>, usize)> {
        let plan = query.plan(tag, schema, show_fields)?;
        let total = self.execute(&plan.count_stmt)?.row_count();
        let result = self.execute(&plan.page_stmt)?;
        let records = parse_string_table(&result.table, &plan.fields, schema)?;
        Ok((records, total))
    }

    /// GO遍历取远端vertex的属性数据
    pub fn go_ends(
        &self,
        start_vid: &str,
        over_edge: &str,
        steps: Option<u32>,
        schema: &Schema,
        show_fields: &[&str],
    ) -> AccessResult<Vec<Record>> {
        let (stmt, fields) = go_ends_stmt(start_vid, over_edge, steps, schema, show_fields)?;
        let result = self.execute(&stmt)?;
        parse_string_table(&result.table, &fields, schema)
    }

    /// GO遍历列出关联关系（边类型 + 远端标识 + 可选属性）
    pub fn go_relations(
        &self,
        start_vid: &str,
        over: &[&str],
        reverse: bool,
        schema: &Schema,
        show_fields: &[&str],
    ) -> AccessResult<Vec<Record>> {
        let (stmt, fields) = go_relations_stmt(start_vid, over, reverse, schema, show_fields)?;
        let result = self.execute(&stmt)?;
        parse_string_table(&result.table, &fields, schema)
    }

    /// 删除指定edge遍历可达的全部末端vertex
    pub fn go_delete_ends(&self, start_vid: &str, edge: &str, steps: Option<u32>) -> AccessResult<()> {
        self.execute(&go_delete_stmt(start_vid, edge, steps))?;
        Ok(())
    }

    /// 末端（reverse时为上游）vertex数量是否超过threshold
    pub fn ends_exceed(
        &self,
        start_vid: &str,
        edge: &str,
        reverse: bool,
        threshold: usize,
    ) -> AccessResult<bool> {
        let result = self.execute(&go_exist_stmt(start_vid, edge, reverse, threshold))?;
        Ok(result.row_count() > threshold)
    }

    /// tag下的vertex数量是否超过threshold
    pub fn tag_exceeds(&self, tag: &str, threshold: usize) -> AccessResult<bool> {
        let result = self.execute(&lookup_exist_stmt(tag, threshold))?;
        Ok(result.row_count() > threshold)
    }

    /// 按唯一性字段检查是否已有重复数据
    pub fn has_duplicate<E: GraphEntity>(
        &self,
        entity: &E,
        unique_fields: &[&str],
    ) -> AccessResult<bool> {
        let (tag, schema) = entity.schema();
        let stmt = duplicate_check_stmt(&tag, &schema, &entity.data(), unique_fields)?;
        let result = self.execute(&stmt)?;
        Ok(!result.is_empty())
    }

    /// 查询一个vid关联的全部tag名称
    pub fn tags_of_vertex(&self, vid: &str) -> AccessResult<Vec<String>> {
        let result = self.execute(&fetch_tags_stmt(vid))?;
        let mut tags = Vec::new();
        for row in result.table.iter().skip(1) {
            let Some(cell) = row.first() else { continue };
            let names: Vec<String> = serde_json::from_str(cell).map_err(|e| AccessError::Decode {
                field: "tgs".to_string(),
                decl: "list".to_string(),
                reason: format!("tags of vertex '{}' is not a list: {}", vid, e),
            })?;
            tags.extend(names);
        }
        Ok(tags)
    }
}
