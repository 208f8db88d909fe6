use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub schedule_path: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            schedule_path: env::var("SCHEDULE_PATH")
                .unwrap_or_else(|_| {
                    warn!("SCHEDULE_PATH not set, using default");
                    "./data/doctor_schedule.json".to_string()
                }),
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| {
                    warn!("PORT not set or invalid, using default");
                    3000
                }),
        }
    }
}
