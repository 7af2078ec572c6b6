//! schema管理操作
//!
//! tag/edge type的创建、变更与删除。创建与变更后都会确保基础
//! 索引存在；删除先清理该类型名下的全部索引再删类型本身，
//! 两类实体同样处理。

use crate::client::GraphClient;
use crate::codec::decode_value;
use crate::core::error::AccessResult;
use crate::core::schema::Schema;
use crate::stmt::schema_stmt::{
    alter_stmt, create_index_stmt, create_stmt, drop_index_stmt, drop_stmt, show_indexes_stmt,
    EntityKind,
};

impl GraphClient {
    /// 创建tag/edge type，可选地同时建立基础索引
    pub fn create_schema(
        &self,
        kind: EntityKind,
        name: &str,
        schema: &Schema,
        if_not_exists: bool,
        create_index: bool,
    ) -> AccessResult<()> {
        let stmt = create_stmt(kind, name, schema, if_not_exists)?;
        self.execute(&stmt)?;
        if create_index {
            self.execute(&create_index_stmt(kind, name))?;
        }
        Ok(())
    }

    /// 对比新旧schema下发ALTER。无变更时不执行任何语句，
    /// 返回是否实际发生了变更。
    pub fn apply_schema(
        &self,
        kind: EntityKind,
        name: &str,
        old_schema: &Schema,
        new_schema: &Schema,
    ) -> AccessResult<bool> {
        let Some(stmt) = alter_stmt(kind, name, old_schema, new_schema) else {
            log::debug!("schema of {} '{}' unchanged, skip alter", kind.keyword(), name);
            return Ok(false);
        };
        self.execute(&stmt)?;
        Ok(true)
    }

    /// 列出指定类别的全部索引，返回(索引名, 所属类型名)
    pub fn list_indexes(&self, kind: EntityKind) -> AccessResult<Vec<(String, String)>> {
        let result = self.execute(&show_indexes_stmt(kind))?;
        let mut indexes = Vec::new();
        for row in result.table.iter().skip(1) {
            if row.len() < 2 {
                continue;
            }
            let index = decode_value("Index Name", "string", &row[0])?;
            let on = decode_value("By", "string", &row[1])?;
            if let (Some(index), Some(on)) = (index.as_str(), on.as_str()) {
                indexes.push((index.to_string(), on.to_string()));
            }
        }
        Ok(indexes)
    }

    /// 删除tag/edge type。先删除其名下的全部索引，再删类型本身，
    /// 否则engine会因索引存在而拒绝删除。
    pub fn drop_schema(&self, kind: EntityKind, name: &str) -> AccessResult<()> {
        for (index, on) in self.list_indexes(kind)? {
            if on == name {
                self.execute(&drop_index_stmt(kind, &index))?;
            }
        }
        self.execute(&drop_stmt(kind, name, true))?;
        Ok(())
    }
}
