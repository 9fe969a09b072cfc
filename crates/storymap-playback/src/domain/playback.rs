//! Playback controller: the scene cursor and its dwell timer.
//!
//! `Playback` is a small `Copy` value and every transition returns a new
//! one. Time enters only through the `now` arguments; the host owns the real
//! clock and asks [`Playback::pending`] when to call back.
//!
//! # Invariants
//!
//! 1. `current_index <= last_index()` (0 for an empty story).
//! 2. At most one pending advance exists, and only while playing.
//! 3. Playing never rests on the last scene: arriving there pauses.

use chrono::{DateTime, TimeDelta, Utc};

/// Seconds a scene stays on screen before autoplay moves on.
pub const DEFAULT_DWELL_SECS: i64 = 3;

/// Identifies one scheduled auto-advance.
///
/// Every reschedule issues a new token, so a host callback carrying an old
/// token is recognisably stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// The single scheduled auto-advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    /// Token the host hands back to [`Playback::fire`].
    pub token: TimerToken,
    /// When the advance is due.
    pub due_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Paused,
    Playing(PendingAdvance),
}

/// Playback state for one story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    current_index: usize,
    scene_count: usize,
    transport: Transport,
    show_path: bool,
    dwell: TimeDelta,
    issued_tokens: u64,
}

impl Playback {
    /// Paused at the first scene with the path shown.
    #[must_use]
    pub fn new(scene_count: usize, dwell: TimeDelta) -> Self {
        Self {
            current_index: 0,
            scene_count,
            transport: Transport::Paused,
            show_path: true,
            dwell,
            issued_tokens: 0,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scene_count
    }

    /// Index of the final scene, or 0 when there are none.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.scene_count.saturating_sub(1)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self.transport, Transport::Playing(_))
    }

    #[must_use]
    pub fn show_path(&self) -> bool {
        self.show_path
    }

    #[must_use]
    pub fn dwell(&self) -> TimeDelta {
        self.dwell
    }

    /// The scheduled auto-advance, if playing.
    #[must_use]
    pub fn pending(&self) -> Option<PendingAdvance> {
        match self.transport {
            Transport::Playing(pending) => Some(pending),
            Transport::Paused => None,
        }
    }

    /// Starts playing. A no-op when already playing or on the last scene.
    #[must_use]
    pub fn play(self, now: DateTime<Utc>) -> Self {
        if self.is_playing() || self.current_index >= self.last_index() {
            return self;
        }
        self.schedule(now)
    }

    /// Stops playing and cancels the pending advance.
    #[must_use]
    pub fn pause(mut self) -> Self {
        self.transport = Transport::Paused;
        self
    }

    /// Play when paused, pause when playing.
    #[must_use]
    pub fn toggle(self, now: DateTime<Utc>) -> Self {
        if self.is_playing() {
            self.pause()
        } else {
            self.play(now)
        }
    }

    /// Back to the first scene, paused.
    #[must_use]
    pub fn reset(mut self) -> Self {
        self.current_index = 0;
        self.pause()
    }

    /// The document was replaced: paused at the first of `scene_count`
    /// scenes. Any pending advance is cancelled.
    #[must_use]
    pub fn reload(mut self, scene_count: usize) -> Self {
        self.scene_count = scene_count;
        self.reset()
    }

    /// Moves to the next scene if there is one.
    #[must_use]
    pub fn step_forward(self, now: DateTime<Utc>) -> Self {
        if self.current_index >= self.last_index() {
            return self;
        }
        self.move_to(self.current_index + 1, now)
    }

    /// Jumps to `index`, clamped into the story.
    #[must_use]
    pub fn seek(self, index: usize, now: DateTime<Utc>) -> Self {
        self.move_to(index.min(self.last_index()), now)
    }

    #[must_use]
    pub fn toggle_show_path(mut self) -> Self {
        self.show_path = !self.show_path;
        self
    }

    /// Performs every auto-advance due at or before `now`.
    ///
    /// Each following advance is due one dwell after the previous due time,
    /// so a late host catches up instead of drifting.
    #[must_use]
    pub fn tick(mut self, now: DateTime<Utc>) -> Self {
        while let Transport::Playing(pending) = self.transport {
            if pending.due_at > now {
                break;
            }
            self.current_index += 1;
            self = self.settle(pending.due_at);
        }
        self
    }

    /// Host callback for the timer issued with `token`.
    ///
    /// Stale tokens are ignored. A callback that arrives a little early is
    /// treated as arriving on time.
    #[must_use]
    pub fn fire(self, token: TimerToken, now: DateTime<Utc>) -> Self {
        match self.pending() {
            Some(pending) if pending.token == token => self.tick(now.max(pending.due_at)),
            _ => self,
        }
    }

    fn move_to(mut self, index: usize, now: DateTime<Utc>) -> Self {
        if index == self.current_index {
            return self;
        }
        self.current_index = index;
        if self.is_playing() {
            self.settle(now)
        } else {
            self
        }
    }

    /// Restarts the dwell from `since`, or pauses on the last scene.
    fn settle(self, since: DateTime<Utc>) -> Self {
        if self.current_index >= self.last_index() {
            self.pause()
        } else {
            self.schedule(since)
        }
    }

    /// Pauses instead when the deadline falls outside the representable range.
    fn schedule(mut self, since: DateTime<Utc>) -> Self {
        let Some(due_at) = since.checked_add_signed(self.dwell) else {
            tracing::warn!(
                dwell_secs = self.dwell.num_seconds(),
                "dwell overflows the clock; pausing"
            );
            return self.pause();
        };
        self.issued_tokens += 1;
        self.transport = Transport::Playing(PendingAdvance {
            token: TimerToken(self.issued_tokens),
            due_at,
        });
        self
    }
}
