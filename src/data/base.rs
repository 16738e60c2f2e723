//! Snapshot of operational data handed to the simulator: zones, per-zone metrics
//! and the service history. Read-only; the simulator never writes it back.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneMetric {
    pub zone_id: String,
    #[serde(default)]
    pub active_candidates: u32,
    #[serde(default)]
    pub open_positions: u32,
}

/// One scheduled service. `scheduled_at` is the appointment timestamp the monthly
/// demand series is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(alias = "fecha_hora_cita")]
    pub scheduled_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseData {
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub metrics: Vec<ZoneMetric>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
}

/// Calendar month key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl BaseData {
    pub fn zone_ids(&self) -> Vec<String> {
        self.zones.iter().map(|zone| zone.id.clone()).collect()
    }

    /// Number of services per calendar month, oldest first. Months with no
    /// services between the first and last observed month are not filled in.
    pub fn monthly_service_counts(&self) -> BTreeMap<YearMonth, usize> {
        let mut counts = BTreeMap::new();
        for service in &self.services {
            let key = YearMonth {
                year: service.scheduled_at.year(),
                month: service.scheduled_at.month(),
            };
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    /// Open positions across all zones, used as a demand hint.
    pub fn total_open_positions(&self) -> u32 {
        self.metrics.iter().map(|metric| metric.open_positions).sum()
    }
}

/// Load a base-data snapshot from a JSON file.
pub fn load_base_data(path: impl AsRef<Path>) -> Result<BaseData, DataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DataError::Parse {
        path: path.display().to_string(),
        source,
    })
}
