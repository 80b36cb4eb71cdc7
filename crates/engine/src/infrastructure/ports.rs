//! Port traits for infrastructure boundaries.
//!
//! Ports exist only where tests need to substitute the real thing:
//! - Clock (session timestamps, memory recency)
//!
//! Entropy is injected through `gamemind_domain::RandomSource`.

use chrono::{DateTime, Utc};

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
