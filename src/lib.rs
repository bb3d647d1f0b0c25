// Public modules
pub mod config;
pub mod filter;
pub mod parsing;
pub mod probe;
pub mod runner;
pub mod slack;
pub mod types;

// Re-export commonly used items
pub use config::{
    resolve_config, resolve_webhook_url, ConfigError, EnvironmentProvider, MockEnvironment,
    SystemEnvironment, DEFAULT_THRESHOLD_DAYS,
};
pub use filter::select_targets;
pub use parsing::{format_expiry_date, parse_not_after, remaining_days};
pub use probe::{CertProber, ProbeError, TlsProber, DEFAULT_TLS_PORT, PROBE_TIMEOUT};
pub use runner::run;
pub use slack::{build_error_payload, build_expiry_payload, Notifier};
pub use types::*;
