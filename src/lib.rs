pub mod config;
pub mod db;
pub mod error;
pub mod utils;

pub use error::ModelbookError;
pub use modelbook_schema as schema;
