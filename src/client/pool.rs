//! 会话与连接池抽象
//!
//! 底层驱动（连接协议、TLS、鉴权、超时）通过这两个trait接入，
//! 本crate只面向抽象执行语句。session的释放由具体实现的Drop
//! 负责，调用方作用域结束即归还。

use crate::core::error::AccessResult;
use crate::result::StringTable;

/// 一次语句执行的原始响应
#[derive(Debug, Clone, Default)]
pub struct ExecResponse {
    pub succeeded: bool,
    /// 成功时的结果表，首行为表头
    pub table: StringTable,
    pub error_code: i32,
    pub error_msg: String,
}

impl ExecResponse {
    pub fn ok(table: StringTable) -> Self {
        Self {
            succeeded: true,
            table,
            ..Default::default()
        }
    }

    pub fn fail(error_code: i32, error_msg: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            error_code,
            error_msg: error_msg.into(),
            ..Default::default()
        }
    }
}

/// 一个已建立的会话。执行是同步阻塞的。
pub trait Session: Send {
    fn execute(&mut self, stmt: &str) -> AccessResult<ExecResponse>;
}

/// 会话连接池。acquire失败（耗尽、超时、网络不可达）由实现方
/// 映射为Connection错误，本层不做重试。
pub trait SessionPool: Send + Sync {
    fn acquire(&self, user: &str, password: &str) -> AccessResult<Box<dyn Session>>;
}

/// 一次成功执行的结果
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub table: StringTable,
}

impl ResultSet {
    /// 数据行数（不含表头行）
    pub fn row_count(&self) -> usize {
        self.table.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_count_excludes_header() {
        let rs = ResultSet { table: vec![] };
        assert_eq!(rs.row_count(), 0);
        assert!(rs.is_empty());

        let rs = ResultSet {
            table: vec![vec!["VertexID".to_string()]],
        };
        assert_eq!(rs.row_count(), 0);

        let rs = ResultSet {
            table: vec![vec!["VertexID".to_string()], vec!["\"v1\"".to_string()]],
        };
        assert_eq!(rs.row_count(), 1);
        assert!(!rs.is_empty());
    }
}
