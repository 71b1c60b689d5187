pub mod audit_log;
pub mod kv;
pub mod trust_list;

pub use audit_log::AuditLog;
pub use kv::{FileKvStore, MemoryKvStore};
pub use trust_list::{TrustListEntry, TrustListStore};
