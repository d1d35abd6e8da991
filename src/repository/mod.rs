//! 数据库访问层

pub mod product_repo;
pub mod user_repo;

pub use product_repo::ProductRepository;
pub use user_repo::{CredentialStore, UserRepository};
