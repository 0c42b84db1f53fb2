/// Limits and policy for catalogue loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Maximum number of definitions accepted from one file.
    pub max_definitions: usize,
    /// Maximum bytes read from a definition file.
    pub max_file_size: usize,
    /// When true, registering an existing tag replaces it instead of
    /// failing with `CatalogError::DuplicateType`.
    pub allow_overrides: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_definitions: 256,
            max_file_size: 256 * 1024,
            allow_overrides: false,
        }
    }
}
