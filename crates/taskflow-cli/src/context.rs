use chrono::{DateTime, Utc};
use std::sync::Arc;
use taskflow_core::{AppConfig, Clock, FixedClock, SystemClock, TaskflowResult};
use taskflow_domain::{parse_timestamp, partition_records, BoardSession, TaskCollection};
use taskflow_persistence::JsonFileTaskStore;

pub struct CliContext {
    pub store: Arc<JsonFileTaskStore>,
    pub config: AppConfig,
    now: Option<DateTime<Utc>>,
}

impl CliContext {
    pub fn new(file_path: &str, now: Option<&str>) -> anyhow::Result<Self> {
        let now = match now {
            Some(raw) => Some(
                parse_timestamp(raw).ok_or_else(|| anyhow::anyhow!("Invalid --now value: {}", raw))?,
            ),
            None => None,
        };
        Ok(Self {
            store: Arc::new(JsonFileTaskStore::new(file_path)),
            config: AppConfig::load(),
            now,
        })
    }

    fn clock(&self) -> Arc<dyn Clock> {
        match self.now {
            Some(now) => Arc::new(FixedClock(now)),
            None => Arc::new(SystemClock),
        }
    }

    /// Load the task file into a fresh board session.
    pub async fn session(&self) -> TaskflowResult<BoardSession> {
        let (records, malformed) = self.store.load_records().await?;
        let (tasks, mut issues) = partition_records(records);
        issues.extend(malformed);

        Ok(BoardSession::new(TaskCollection::from_parts(tasks, issues))
            .with_config(&self.config)
            .with_clock(self.clock()))
    }
}
