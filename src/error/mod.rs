mod modelbook;

pub use modelbook::ModelbookError;
pub use modelbook_schema::SchemaError;
