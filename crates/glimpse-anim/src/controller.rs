//! Playback state machine for a loaded animation.
//!
//! ```text
//!            load                play
//!   Idle ──────────▶ Paused ◀──────────▶ Playing
//!     ▲    unload      │        pause       │
//!     └────────────────┴────────────────────┘
//! ```
//!
//! While playing, a [`Ticker`] thread posts ticks into a channel owned by
//! the controller. The host applies them on its own thread with
//! [`FrameController::pump`] or [`FrameController::wait_tick`], so the
//! frame index is only ever touched by the controller's owner.

use std::fmt;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::debug;

use crate::frame::{AnimationSet, FrameDescriptor, FrameSet};
use crate::ticker::{frame_interval, Tick, Ticker};

/// Playback rate used until [`FrameController::set_speed`] is called.
pub const DEFAULT_FPS: u32 = 10;
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackConfig {
    pub fps: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded.
    Idle,
    Paused,
    Playing,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Playing => write!(f, "playing"),
        }
    }
}

type Observer = Box<dyn FnMut(usize) + Send>;

/// Owns the current animation, its frame index and its timer.
///
/// At most one ticker exists at a time; every operation that replaces or
/// stops it waits for the old one to exit first.
pub struct FrameController {
    fps: u32,
    animation: Option<AnimationSet>,
    ticker: Option<Ticker>,
    generation: u64,
    tick_tx: Sender<Tick>,
    tick_rx: Receiver<Tick>,
    observer: Option<Observer>,
}

impl FrameController {
    pub fn new(config: PlaybackConfig) -> Self {
        let (tick_tx, tick_rx) = crossbeam_channel::unbounded();
        Self {
            fps: config.fps.clamp(MIN_FPS, MAX_FPS),
            animation: None,
            ticker: None,
            generation: 0,
            tick_tx,
            tick_rx,
            observer: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match &self.animation {
            None => PlaybackState::Idle,
            Some(animation) if animation.is_playing() => PlaybackState::Playing,
            Some(_) => PlaybackState::Paused,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    pub fn animation(&self) -> Option<&AnimationSet> {
        self.animation.as_ref()
    }

    pub fn frames(&self) -> Option<&FrameSet> {
        self.animation.as_ref().map(AnimationSet::frames)
    }

    /// Index of the current frame; `None` when idle or the set is empty.
    pub fn current_index(&self) -> Option<usize> {
        self.animation.as_ref().and_then(AnimationSet::current_index)
    }

    pub fn current_frame(&self) -> Option<FrameDescriptor<'_>> {
        self.animation.as_ref().and_then(AnimationSet::current_frame)
    }

    pub fn frames_per_second(&self) -> u32 {
        self.fps
    }

    /// Call `observer` with the new index every time the current frame changes.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Load a new frame set, paused at the first frame.
    pub fn load(&mut self, frames: FrameSet) {
        self.stop_ticker();
        debug!(frames = frames.len(), "animation loaded");
        self.animation = Some(AnimationSet::new(frames));
        self.notify();
    }

    /// Swap in a new frame set from the first frame, keeping the play state.
    ///
    /// Used when the same image is re-sliced, e.g. after a grid change.
    pub fn reload(&mut self, frames: FrameSet) {
        let was_playing = self.is_playing();
        self.load(frames);
        if was_playing {
            self.play();
        }
    }

    /// Drop the animation and stop its timer.
    pub fn unload(&mut self) {
        self.stop_ticker();
        if self.animation.take().is_some() {
            debug!("animation unloaded");
        }
    }

    pub fn play(&mut self) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        if animation.is_playing() {
            return;
        }
        animation.set_playing(true);
        self.start_ticker();
        debug!(fps = self.fps, "playing");
    }

    pub fn pause(&mut self) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        if !animation.is_playing() {
            return;
        }
        animation.set_playing(false);
        self.stop_ticker();
        debug!(index = ?self.current_index(), "paused");
    }

    pub fn toggle(&mut self) {
        match self.state() {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.play(),
            PlaybackState::Idle => {}
        }
    }

    /// Advance one frame if playing. Returns whether the index moved.
    pub fn tick(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.step(AnimationSet::advance)
    }

    /// Step forward with wrap-around, in any non-idle state.
    pub fn next(&mut self) -> bool {
        self.step(AnimationSet::advance)
    }

    /// Step backward with wrap-around, in any non-idle state.
    pub fn previous(&mut self) -> bool {
        self.step(AnimationSet::retreat)
    }

    /// Change the playback rate, clamped to `MIN_FPS..=MAX_FPS`.
    ///
    /// While playing, the running timer is replaced; the frame index is kept.
    pub fn set_speed(&mut self, fps: u32) {
        self.fps = fps.clamp(MIN_FPS, MAX_FPS);
        if self.is_playing() {
            self.start_ticker();
        }
        debug!(fps = self.fps, "speed changed");
    }

    /// Apply every timer tick received so far, without blocking.
    ///
    /// Returns the number of frames advanced.
    pub fn pump(&mut self) -> usize {
        let mut advanced = 0;
        while let Ok(tick) = self.tick_rx.try_recv() {
            if self.accepts(tick) && self.tick() {
                advanced += 1;
            }
        }
        advanced
    }

    /// Block until the next timer tick is applied or `timeout` passes.
    ///
    /// Returns `false` immediately when not playing.
    pub fn wait_tick(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_playing() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.tick_rx.recv_timeout(remaining) {
                Ok(tick) if self.accepts(tick) => return self.tick(),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }
        false
    }

    fn accepts(&self, tick: Tick) -> bool {
        self.ticker.is_some() && tick.generation == self.generation
    }

    fn step(&mut self, f: fn(&mut AnimationSet) -> bool) -> bool {
        let moved = self.animation.as_mut().is_some_and(f);
        if moved {
            self.notify();
        }
        moved
    }

    fn notify(&mut self) {
        let index = self.current_index();
        if let (Some(observer), Some(index)) = (self.observer.as_mut(), index) {
            observer(index);
        }
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();
        self.generation += 1;
        self.ticker = Some(Ticker::spawn(
            frame_interval(self.fps),
            self.generation,
            self.tick_tx.clone(),
        ));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        while self.tick_rx.try_recv().is_ok() {}
    }
}

impl Default for FrameController {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl fmt::Debug for FrameController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameController")
            .field("state", &self.state())
            .field("fps", &self.fps)
            .field("current_index", &self.current_index())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
