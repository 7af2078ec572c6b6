//! nebula-access - NebulaGraph数据访问层
//!
//! 将通用的vertex/edge数据模型（schema描述）翻译为nGQL语句文本，
//! 通过连接池执行，并把表格形式的字符串结果解析回类型化的值。
//!
//! 本crate不包含连接协议细节（TLS、鉴权握手），这些由底层的
//! 连接池/会话实现负责，通过 [`client::SessionPool`] trait接入。

pub mod client;
pub mod codec;
pub mod config;
pub mod core;
pub mod logging;
pub mod result;
pub mod stmt;

pub use client::{ExecResponse, GraphClient, ResultSet, Session, SessionPool};
pub use config::GraphConfig;
pub use core::error::{AccessError, AccessResult};
pub use core::schema::{EdgeData, GraphEntity, Record, Schema, VertexData};
pub use core::value::PropValue;
