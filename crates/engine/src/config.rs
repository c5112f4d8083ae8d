use studioflow_core::project::DEFAULT_REVISIONS_TOTAL;

/// Engine settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Where developer-audience emails go. Without it those attempts are
    /// logged as failures.
    pub developer_email: Option<String>,
    /// Revision budget for projects created without an explicit one.
    pub default_revisions_total: u32,
}

impl EngineConfig {
    /// | Variable                  | Default |
    /// |---------------------------|---------|
    /// | `DEVELOPER_EMAIL`         | unset   |
    /// | `DEFAULT_REVISIONS_TOTAL` | `5`     |
    pub fn from_env() -> Self {
        Self {
            developer_email: std::env::var("DEVELOPER_EMAIL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            default_revisions_total: std::env::var("DEFAULT_REVISIONS_TOTAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &u32| n > 0)
                .unwrap_or(DEFAULT_REVISIONS_TOTAL),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            developer_email: None,
            default_revisions_total: DEFAULT_REVISIONS_TOTAL,
        }
    }
}
