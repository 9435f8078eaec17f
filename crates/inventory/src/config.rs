/// Settings handed to every service at construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Largest page window a listing may ask for.
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { max_page_size: 100 }
    }
}
