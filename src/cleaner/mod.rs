pub mod alternatives;
pub mod cache;
pub mod engine;
pub mod remover;
pub mod report;
pub mod repos;

pub use cache::{clear_cache, default_patterns, CachePattern};
pub use engine::{HostCleanup, HADOOP_GROUP, PACKAGES_BLACK_LIST};
pub use report::{ActionRecord, CleanupReport, RemovalResult};
pub use repos::REPOSITORY_BLACK_LIST;
