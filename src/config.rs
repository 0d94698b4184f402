use std::time::Duration;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "casual_chess", version, about = "WebSocket bridge for a simplified browser chess game")]
pub struct Config {
    /// Address the WebSocket server listens on
    #[arg(long, default_value = "0.0.0.0:9977")]
    pub address: String,

    /// Pause before the computer answers a move
    #[arg(long, default_value_t = 500)]
    pub computer_delay_ms: u64,

    /// Used when LOG_LEVEL is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[arg(long, default_value_t = 60)]
    pub monitor_interval_secs: u64,
}

impl Config {
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }
}
