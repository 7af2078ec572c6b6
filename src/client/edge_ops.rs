//! edge操作
//!
//! edge的插入、删除与LOOKUP查询。edge以(起点, 终点)有序对标识，
//! 作用域限定在一个edge type内。

use crate::client::GraphClient;
use crate::core::error::AccessResult;
use crate::core::schema::{GraphEntity, Record, Schema};
use crate::result::parse_string_table;
use crate::stmt::entity_stmt::{
    delete_edge_stmt, insert_edge_stmt, insert_empty_edge_stmt, lookup_edge_stmt,
};

impl GraphClient {
    /// 插入edge。同一(src, dst)对上重复插入为覆盖写。
    pub fn insert_edge<E: GraphEntity>(&self, entity: &E) -> AccessResult<()> {
        let (edge_type, schema) = entity.schema();
        let stmt = insert_edge_stmt(&edge_type, &schema, &entity.data())?;
        self.execute(&stmt)?;
        Ok(())
    }

    /// 插入无属性edge，仅建立两点间的连接关系
    pub fn insert_empty_edge(&self, edge_type: &str, src: &str, dst: &str) -> AccessResult<()> {
        self.execute(&insert_empty_edge_stmt(edge_type, src, dst))?;
        Ok(())
    }

    /// 按(src, dst)有序对删除edge
    pub fn delete_edge(&self, edge_type: &str, src: &str, dst: &str) -> AccessResult<()> {
        self.execute(&delete_edge_stmt(edge_type, src, dst))?;
        Ok(())
    }

    /// LOOKUP查询edge，返回携带src_vid/dst_vid的记录列表
    pub fn lookup_edges(
        &self,
        edge_type: &str,
        schema: &Schema,
        filter: &Record,
    ) -> AccessResult<Vec<Record>> {
        let (stmt, fields) = lookup_edge_stmt(edge_type, schema, filter)?;
        let result = self.execute(&stmt)?;
        parse_string_table(&result.table, &fields, schema)
    }
}
