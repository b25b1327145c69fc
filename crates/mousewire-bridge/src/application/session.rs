//! The bridge session loop: receive, decode, classify, decompose, write.
//!
//! One datagram is processed fully before the next is read. The device is a
//! single ordered stream, so interleaving the writes of two moves would
//! corrupt the emulated pointer trajectory; a single task owning both the
//! source and the sink makes the ordering guarantee structural. The only
//! suspension points are the datagram receive and the device writes.
//!
//! Per-sender state (sequence tracking and, in absolute mode, the pointer
//! position) is keyed by [`SenderId`] and mutated exclusively by this loop.
//! The map is bounded: when a new sender would exceed the configured cap,
//! the least recently seen sender's state is evicted.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use mousewire_core::{
    decode_report, DeviceRecord, PointerReport, PositionTracker, ProtocolMode, ScreenBounds,
    SenderId, SequenceGuard, SequenceVerdict,
};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Default cap on concurrently tracked senders.
pub const DEFAULT_MAX_SENDERS: usize = 64;

// ── Error types ───────────────────────────────────────────────────────────────

/// Errors from the datagram source. All of them end the session.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The listen socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// Receiving a datagram failed.
    #[error("datagram receive failed: {0}")]
    Recv(#[source] std::io::Error),
}

/// Errors from the device sink. All of them end the session: a half-written
/// movement leaves the emulated pointer in an unknown state, so there is no
/// recovery path.
#[derive(Debug, Error)]
pub enum DeviceWriteError {
    /// The device file could not be opened.
    #[error("failed to open device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A record write was rejected or truncated.
    #[error("device write failed: {0}")]
    Write(#[source] std::io::Error),
}

/// Fatal session outcome: one of the two external collaborators failed.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("datagram source failed: {0}")]
    Source(#[from] SourceError),
    #[error("device sink failed: {0}")]
    Device(#[from] DeviceWriteError),
}

// ── Collaborator traits ───────────────────────────────────────────────────────

/// Source of raw pointer datagrams.
///
/// Delivery is unordered and unreliable; the sender identity must be stable
/// for one physical sender within a session. The real implementation is a
/// UDP socket; tests script the datagrams directly.
#[async_trait]
pub trait DatagramSource: Send {
    /// Waits for the next datagram, returning its payload and sender.
    async fn recv(&mut self) -> Result<(Vec<u8>, SenderId), SourceError>;
}

/// Ordered sink for fixed-size device records.
///
/// Each call must put exactly one record's bytes on the device, in call
/// order, before returning. The real implementation is the HID device
/// file; tests record the writes.
#[async_trait]
pub trait RecordSink: Send {
    /// Writes one record through to the device.
    async fn write_record(&mut self, record: DeviceRecord) -> Result<(), DeviceWriteError>;
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Runtime parameters of one bridge session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Which wire variant the senders speak.
    pub mode: ProtocolMode,
    /// Screen bounds for clamping and rehoming; only consulted in absolute
    /// mode.
    pub bounds: ScreenBounds,
    /// Maximum magnitude of one device step.
    pub max_step: i32,
    /// Cap on concurrently tracked senders.
    pub max_senders: usize,
}

/// State kept per sender.
struct SenderState {
    guard: SequenceGuard,
    tracker: PositionTracker,
    last_seen: Instant,
}

impl SenderState {
    fn new(config: &SessionConfig) -> Self {
        Self {
            guard: SequenceGuard::new(),
            tracker: PositionTracker::new(config.bounds, config.max_step),
            last_seen: Instant::now(),
        }
    }
}

/// The bridge session: owns the datagram source, the device sink, and all
/// per-sender state.
pub struct BridgeSession<S, D> {
    config: SessionConfig,
    source: S,
    sink: D,
    senders: HashMap<SenderId, SenderState>,
}

impl<S: DatagramSource, D: RecordSink> BridgeSession<S, D> {
    /// Creates a session over the given source and sink.
    pub fn new(config: SessionConfig, source: S, sink: D) -> Self {
        Self {
            config,
            source,
            sink,
            senders: HashMap::new(),
        }
    }

    /// Returns how many senders currently have tracked state.
    pub fn tracked_senders(&self) -> usize {
        self.senders.len()
    }

    /// Runs the session until the datagram source or the device sink fails.
    ///
    /// In absolute mode the pointer is first walked to the origin so the
    /// per-sender trackers, which start at `(0, 0)`, agree with the device.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when either collaborator fails; the session
    /// must not continue past a failed device write.
    pub async fn run(mut self) -> Result<(), SessionError> {
        if self.config.mode == ProtocolMode::Absolute {
            self.home_pointer().await?;
        }
        loop {
            let (payload, sender) = self.source.recv().await?;
            self.process_datagram(&payload, sender).await?;
        }
    }

    /// Processes one datagram: decode, classify, apply, write.
    ///
    /// Undecodable datagrams and stale sequence numbers are logged and
    /// skipped; both leave the session healthy.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Device`] if a record write fails.
    pub async fn process_datagram(
        &mut self,
        payload: &[u8],
        sender: SenderId,
    ) -> Result<(), SessionError> {
        let report = match decode_report(self.config.mode, payload) {
            Ok(report) => report,
            Err(e) => {
                warn!(%sender, error = %e, "dropping undecodable datagram");
                return Ok(());
            }
        };

        let config = self.config;
        if self.senders.len() >= config.max_senders && !self.senders.contains_key(&sender) {
            self.evict_stalest();
        }
        let state = self.senders.entry(sender).or_insert_with(|| {
            debug!(%sender, "tracking new sender");
            SenderState::new(&config)
        });
        state.last_seen = Instant::now();

        match state.guard.observe(report.seq()) {
            SequenceVerdict::OutOfOrder { last } => {
                warn!(%sender, seq = report.seq(), last, "out-of-order report, skipping");
                return Ok(());
            }
            SequenceVerdict::Gap { last, size } => {
                warn!(%sender, seq = report.seq(), last, size, "sequence gap, applying newest");
            }
            SequenceVerdict::WrapReset => {
                info!(%sender, seq = report.seq(), "sequence wrap marker, tracking reset");
            }
            SequenceVerdict::InOrder => {}
        }

        match report {
            PointerReport::Absolute(r) => {
                let plan = state.tracker.plan_move(i32::from(r.x), i32::from(r.y), r.buttons);
                for record in &plan.records {
                    trace!(?record, "writing device record");
                    self.sink.write_record(*record).await?;
                }
                state.tracker.commit_move(&plan);
            }
            PointerReport::Relative(r) => {
                let record = DeviceRecord {
                    buttons: r.buttons,
                    dx: r.dx,
                    dy: r.dy,
                };
                trace!(?record, "writing device record");
                self.sink.write_record(record).await?;
            }
        }

        Ok(())
    }

    /// Walks the device pointer to the top-left corner.
    ///
    /// Runs once before any datagram is served, using the forced
    /// return-to-origin walk from the screen bounds, so every tracker's
    /// starting position of `(0, 0)` matches the physical pointer.
    async fn home_pointer(&mut self) -> Result<(), SessionError> {
        let tracker = PositionTracker::new(self.config.bounds, self.config.max_step);
        let plan = tracker.plan_move(0, 0, 0);
        info!(records = plan.records.len(), "homing pointer to top-left");
        for record in &plan.records {
            trace!(?record, "writing device record");
            self.sink.write_record(*record).await?;
        }
        Ok(())
    }

    /// Drops the state of the sender that has been silent the longest.
    fn evict_stalest(&mut self) {
        if let Some(stalest) = self
            .senders
            .iter()
            .min_by_key(|(_, state)| state.last_seen)
            .map(|(sender, _)| *sender)
        {
            warn!(sender = %stalest, "sender cap reached, evicting least recently seen");
            self.senders.remove(&stalest);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
