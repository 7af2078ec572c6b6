//! 执行网关
//!
//! [`GraphClient`] 持有校验过的配置与连接池，负责语句的实际下发：
//! 自动USE到目标space、单条与非原子批量执行、失败映射为结构化
//! 错误。高层的vertex/edge/schema操作也定义在本模块，组合纯函数
//! 式的语句构造器与结果解析器。

pub mod pool;

mod edge_ops;
mod schema_ops;
mod vertex_ops;

pub use pool::{ExecResponse, ResultSet, Session, SessionPool};

use crate::config::GraphConfig;
use crate::core::error::{AccessError, AccessResult};
use std::sync::Arc;

/// graph DB访问客户端。克隆开销低（池为Arc共享），可跨线程使用。
#[derive(Clone)]
pub struct GraphClient {
    config: GraphConfig,
    pool: Arc<dyn SessionPool>,
}

impl GraphClient {
    /// 构造客户端，配置在此一次性校验
    pub fn new(config: GraphConfig, pool: Arc<dyn SessionPool>) -> AccessResult<Self> {
        config.validate()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// 语句未显式USE时，前置USE到配置的space
    fn with_use(&self, stmt: &str) -> String {
        if stmt.trim_start().to_uppercase().starts_with("USE") {
            stmt.to_string()
        } else {
            format!("USE {}; {}", self.config.space, stmt)
        }
    }

    fn acquire(&self) -> AccessResult<Box<dyn Session>> {
        self.pool.acquire(&self.config.user, &self.config.password)
    }

    fn execute_on(&self, session: &mut dyn Session, stmt: &str) -> AccessResult<ResultSet> {
        let full = self.with_use(stmt);
        log::debug!("executing ngql: {}", full);
        let resp = session.execute(&full)?;
        if !resp.succeeded {
            log::warn!(
                "ngql failed. code: {}, msg: {}, stmt: {}",
                resp.error_code,
                resp.error_msg,
                full
            );
            return Err(AccessError::Statement {
                code: resp.error_code,
                message: resp.error_msg,
            });
        }
        Ok(ResultSet { table: resp.table })
    }

    /// 执行单条语句。每次调用独占一个session，结束即归还。
    pub fn execute(&self, stmt: &str) -> AccessResult<ResultSet> {
        let mut session = self.acquire()?;
        self.execute_on(session.as_mut(), stmt)
    }

    /// 顺序执行一批语句（共享一个session）。
    ///
    /// 批量不具备原子性：任意一条失败即停止，返回已成功的结果
    /// 与该错误，之前的语句不回滚。
    pub fn execute_batch(&self, stmts: &[String]) -> (Vec<ResultSet>, Option<AccessError>) {
        let mut session = match self.acquire() {
            Ok(s) => s,
            Err(e) => return (Vec::new(), Some(e)),
        };
        let mut results = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            match self.execute_on(session.as_mut(), stmt) {
                Ok(rs) => results.push(rs),
                Err(e) => return (results, Some(e)),
            }
        }
        (results, None)
    }
}
