//! 集成测试公共设施：脚本化的mock连接池。
//!
//! 预先排入响应队列，按执行顺序弹出；同时记录每条实际下发的
//! 语句文本，供断言USE前缀与语句内容。

use nebula_access::{
    AccessError, AccessResult, ExecResponse, GraphClient, GraphConfig, Session, SessionPool,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Default)]
struct ScriptState {
    responses: VecDeque<ExecResponse>,
    executed: Vec<String>,
}

/// 脚本化连接池。clone共享同一份脚本状态。
#[derive(Clone, Default)]
pub struct ScriptedPool {
    inner: Arc<Mutex<ScriptState>>,
}

impl ScriptedPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// 排入一条成功响应
    pub fn push_ok(&self, table: Vec<Vec<String>>) {
        self.inner.lock().responses.push_back(ExecResponse::ok(table));
    }

    /// 排入一条engine失败响应
    pub fn push_fail(&self, code: i32, msg: &str) {
        self.inner.lock().responses.push_back(ExecResponse::fail(code, msg));
    }

    /// 已下发的语句文本（含USE前缀），按执行顺序
    pub fn executed(&self) -> Vec<String> {
        self.inner.lock().executed.clone()
    }
}

impl SessionPool for ScriptedPool {
    fn acquire(&self, _user: &str, _password: &str) -> AccessResult<Box<dyn Session>> {
        Ok(Box::new(ScriptedSession {
            inner: self.inner.clone(),
        }))
    }
}

struct ScriptedSession {
    inner: Arc<Mutex<ScriptState>>,
}

impl Session for ScriptedSession {
    fn execute(&mut self, stmt: &str) -> AccessResult<ExecResponse> {
        let mut state = self.inner.lock();
        state.executed.push(stmt.to_string());
        state
            .responses
            .pop_front()
            .ok_or_else(|| AccessError::Connection("no scripted response left".to_string()))
    }
}

/// 构造字符串表，首行为表头
pub fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// 基于默认配置与给定mock池的客户端
pub fn test_client(pool: &ScriptedPool) -> GraphClient {
    let config = GraphConfig {
        space: "test_space".to_string(),
        ..Default::default()
    };
    GraphClient::new(config, Arc::new(pool.clone())).expect("test config should be valid")
}
