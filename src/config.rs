use serde::Deserialize;

/// Tunables for the progress aggregation engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// Expected journal/insight cadence used for completion percentages.
    /// Four entries per child per month in the observed product.
    pub entries_per_child_per_month: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub progress: ProgressConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let progress = ProgressConfig {
            entries_per_child_per_month: std::env::var("PROGRESS_ENTRIES_PER_MONTH")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(crate::progress::DEFAULT_ENTRIES_PER_CHILD_PER_MONTH),
        };
        Ok(Self {
            database_url,
            progress,
        })
    }
}
