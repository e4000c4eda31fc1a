//! Plugin session
//!
//! # Example
//!
//! ```ignore
//! use mirage::Session;
//!
//! let session = Session::load()?;
//! let events = session.events().clone();
//!
//! // Host hooks publish lifecycle events...
//! events.publish(HostEvent::ResourceReleased(handle));
//!
//! // ...and the host bridge ticks the session every frame
//! session.on_frame();
//!
//! session.shutdown();
//! ```

use std::sync::Arc;
use std::time::Instant;

use mirage_core::config::{ConfigResult, CoreConfig};
use mirage_core::events::HostEvents;
use mirage_core::resolver::{CacheIndexes, ResolutionCache};
use tracing::{info, trace, warn};

use crate::frame::{compaction_due, FrameStats};
use crate::logging::init_logging;

/// Everything owned by one load of the plugin
pub struct Session {
    config: CoreConfig,
    events: Arc<HostEvents>,
    cache: ResolutionCache,
    frames: FrameStats,
}

impl Session {
    /// Start a session with settings from `core.toml`
    pub fn load() -> ConfigResult<Self> {
        Ok(Self::start(CoreConfig::load()?))
    }

    /// Start a session with the given settings
    pub fn start(config: CoreConfig) -> Self {
        init_logging(config.debug);
        info!("Mirage session starting (config v{})", config.version);

        let events = Arc::new(HostEvents::new());
        let cache = ResolutionCache::attached(config.resolver.clone(), &events);

        Self {
            config,
            events,
            cache,
            frames: FrameStats::new(),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Bus the host hooks publish lifecycle events on
    pub fn events(&self) -> &Arc<HostEvents> {
        &self.events
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn frames(&self) -> &FrameStats {
        &self.frames
    }

    /// Per-frame maintenance
    ///
    /// Applies pending host events and runs a compaction pass every
    /// `compaction_interval_frames` frames.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn on_frame(&self) {
        let start = Instant::now();
        let frame = self.frames.next();

        let applied = self.cache.sync();
        if applied > 0 {
            trace!("Applied {} host event(s)", applied);
        }

        if compaction_due(frame, self.config.resolver.compaction_interval_frames) {
            let report = self.cache.compact();
            trace!("Compaction at frame {} removed {}", frame, report.total());
        }

        let elapsed = start.elapsed();
        self.frames.record(elapsed);

        if elapsed.as_micros() > u128::from(self.config.resolver.slow_frame_warn_us) {
            warn!("Frame maintenance took {}us (frame {})", elapsed.as_micros(), frame);
        }
    }

    /// Tear the session down
    #[tracing::instrument(skip(self))]
    pub fn shutdown(self) {
        let snapshot = self.cache.snapshot();
        info!(
            "Mirage session ending after {} frames ({} cached entries)",
            self.frames.count(),
            snapshot.entry_count()
        );
        self.cache.clear(CacheIndexes::all());
        info!("Mirage shutting down...");
    }
}
