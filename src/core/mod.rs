//! 核心数据模型：错误类型、属性值、schema定义与校验。

pub mod error;
pub mod schema;
pub mod validate;
pub mod value;

pub use error::{AccessError, AccessResult};
pub use schema::{EdgeData, GraphEntity, Record, Schema, VertexData};
pub use value::PropValue;
