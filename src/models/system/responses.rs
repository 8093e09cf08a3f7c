use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub system_name: String,
    pub environment: String,
    pub version: String,
    pub uptime_secs: i64,
}
