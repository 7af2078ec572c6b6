//! 访问层错误类型
//!
//! 涵盖配置、连接、语句执行与编解码相关的错误。
//! 内部编程契约违规（如engine日期格式漂移、空的唯一字段列表）
//! 不在此列，它们属于调用方定义缺陷，直接panic终止进程。

use thiserror::Error;

/// 访问层操作结果类型别名
pub type AccessResult<T> = Result<T, AccessError>;

/// 访问层错误
#[derive(Error, Debug, Clone)]
pub enum AccessError {
    /// 连接参数缺失或非法，启动期致命
    #[error("invalid nebula config: {0}")]
    Config(String),

    /// 连接池获取session失败（耗尽/超时），不在本层重试
    #[error("nebula connecting error: {0}")]
    Connection(String),

    /// engine返回非成功响应，携带协议错误码与消息
    #[error("ngql executing failed. ErrorCode: {code}. ErrorMsg: {message}")]
    Statement { code: i32, message: String },

    /// 编码时值的形状与字段声明类型不匹配
    #[error("type mismatch for field '{field}' ({decl}): got {got}")]
    TypeMismatch {
        field: String,
        decl: String,
        got: String,
    },

    /// 字段声明使用了未知的类型关键字
    #[error("data type '{decl}' of field '{field}' not supported by this nebula client")]
    UnsupportedType { field: String, decl: String },

    /// 结果解码失败（数值解析、JSON反序列化等）
    #[error("failed to decode field '{field}' as {decl}: {reason}")]
    Decode {
        field: String,
        decl: String,
        reason: String,
    },

    /// 提供的数据字段不在schema中
    #[error("illegal field '{field}' for {context}")]
    IllegalField { field: String, context: String },

    /// 必要字段缺失或为空（vid、更新字段的值等）
    #[error("value for field '{field}' not provided ({context})")]
    MissingValue { field: String, context: String },

    /// vertex已存在且未指定allow_replace
    #[error("vid '{0}' already exist")]
    AlreadyExists(String),

    /// 查询正常执行但没有命中数据，区别于真正的错误
    #[error("no data found: {0}")]
    NoData(String),
}

impl AccessError {
    pub fn illegal_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        AccessError::IllegalField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub fn missing_value(field: impl Into<String>, context: impl Into<String>) -> Self {
        AccessError::MissingValue {
            field: field.into(),
            context: context.into(),
        }
    }

    /// 是否为"无数据"哨兵，调用方可据此与真实错误区分
    pub fn is_no_data(&self) -> bool {
        matches!(self, AccessError::NoData(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_error_carries_engine_code() {
        let err = AccessError::Statement {
            code: -1005,
            message: "SemanticError".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("-1005"), "错误信息应包含engine错误码: {msg}");
        assert!(msg.contains("SemanticError"));
    }

    #[test]
    fn test_no_data_sentinel() {
        let err = AccessError::NoData("vid 'v1'".to_string());
        assert!(err.is_no_data());
        assert!(!AccessError::Config("x".into()).is_no_data());
    }
}
