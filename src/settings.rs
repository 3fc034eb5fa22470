use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::analytics::AggregationConfig;
use crate::scheduler::SchedulerConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorSettings {
    pub dispatch_interval_ms: u64,
    pub tick_interval_ms: u64,
    pub assumed_frame_rate: f64,
    pub top_pose_count: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            dispatch_interval_ms: 100,
            tick_interval_ms: 16,
            assumed_frame_rate: 30.0,
            top_pose_count: 3,
        }
    }
}

impl MonitorSettings {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            dispatch_interval: Duration::from_millis(self.dispatch_interval_ms),
        }
    }

    pub fn aggregation_config(&self) -> AggregationConfig {
        let defaults = AggregationConfig::default();
        AggregationConfig {
            assumed_frame_rate: if self.assumed_frame_rate > 0.0 {
                self.assumed_frame_rate
            } else {
                defaults.assumed_frame_rate
            },
            top_pose_count: self.top_pose_count,
        }
    }
}

/// Monitor settings backed by a JSON file.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<MonitorSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring malformed settings in {}: {err}", path.display());
                MonitorSettings::default()
            })
        } else {
            MonitorSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> MonitorSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: MonitorSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &MonitorSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
