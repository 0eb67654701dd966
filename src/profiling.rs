//! # Logging and Profiling
//!
//! Rogue ECS logs through `tracing`. Soft failures (stale handles, double
//! removals, unregistered tags) are emitted at `debug`, generation counter
//! exhaustion at `warn`. Nothing is printed unless the host installs a
//! subscriber.
//!
//! ## Basic Usage
//!
//! Enable the `profiling` feature in your Cargo.toml to get span timing
//! around structural operations and the subscriber helpers below:
//!
//! ```toml
//! [dependencies]
//! rogue_ecs = { version = "0.1", features = ["profiling"] }
//! ```
//!
//! Then install a subscriber once at startup:
//!
//! ```ignore
//! rogue_ecs::profiling::init_tracing(tracing::Level::DEBUG);
//! ```
//!
//! Per-system spans follow the same pattern the world uses internally:
//!
//! ```ignore
//! use tracing::info_span;
//!
//! fn regen_system(world: &mut World) {
//!     #[cfg(feature = "profiling")]
//!     let span = info_span!("regen_system", entities = world.entity_count());
//!     #[cfg(feature = "profiling")]
//!     let _guard = span.enter();
//!
//!     for (health, _) in world.each_component::<Health>() {
//!         health.0 = (health.0 + 1).min(100);
//!     }
//! }
//! ```
//!
//! ## Performance Tips
//!
//! 1. Profile in release mode for accurate metrics
//! 2. Use `Level::TRACE` to see every allocation and recycle

#[cfg(feature = "profiling")]
pub use enabled::*;

#[cfg(feature = "profiling")]
mod enabled {
    use std::path::Path;

    use tracing::Level;
    use tracing_appender::non_blocking::WorkerGuard;

    /// Install a JSON subscriber writing to stdout.
    ///
    /// Returns false if a global subscriber was already set.
    pub fn init_tracing(max_level: Level) -> bool {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(max_level)
            .try_init()
            .is_ok()
    }

    /// Install a JSON subscriber appending to `directory/file_name`.
    ///
    /// Keep the returned guard alive for as long as logs should be flushed.
    /// Returns `None` if a global subscriber was already set.
    pub fn init_file_tracing(
        directory: impl AsRef<Path>,
        file_name: impl AsRef<Path>,
        max_level: Level,
    ) -> Option<WorkerGuard> {
        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .json()
            .with_max_level(max_level)
            .with_writer(writer)
            .try_init()
            .ok()
            .map(|_| guard)
    }
}
