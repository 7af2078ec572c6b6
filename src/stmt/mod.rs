//! nGQL语句构造
//!
//! 纯函数式的语句文本生成，不触达连接层：schema语句（CREATE/
//! ALTER/DROP与索引）与实体语句（INSERT/UPDATE/DELETE/FETCH/
//! LOOKUP/GO）。执行与日志由 [`crate::client`] 负责。

pub mod entity_stmt;
pub mod schema_stmt;

pub use entity_stmt::{LookupQuery, Page, QueryPlan, UpdateMode, DEFAULT_PAGE_SIZE};
pub use schema_stmt::{basic_index_name, EntityKind, BASIC_INDEX_SUFFIX};
