pub const TABLE_NAME_ENV: &str = "TABLE_NAME";
pub const DEFAULT_TABLE_NAME: &str = "mce-dev-products";

pub fn table_name_from_env() -> String {
    resolve_table_name(std::env::var(TABLE_NAME_ENV).ok())
}

/// Only an unset variable falls back to the default; an empty value is kept.
pub fn resolve_table_name(configured: Option<String>) -> String {
    configured.unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string())
}
