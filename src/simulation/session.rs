//! Session lifecycle around the frame loop.
//!
//! A session starts idle, runs frames on demand and stops for good once its
//! [`StopHandle`] fires. Stopping only prevents the next frame from being
//! scheduled; a frame in progress always completes.

use std::cell::Cell;
use std::rc::Rc;

use super::error::Result;
use super::geometry::WorldBounds;
use super::swarm::Swarm;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Started, no frame run yet.
    Idle,
    /// At least one frame has run.
    Running,
    /// Stopped; no further frames run.
    Stopped,
}

/// Cleanup handle returned by [`Session::start`].
///
/// Cloning shares the same signal.
#[derive(Debug, Clone)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    /// Requests the session to stop before its next frame.
    pub fn stop(&self) {
        self.0.set(true);
    }

    /// Whether a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Drives a [`Swarm`] frame by frame.
#[derive(Debug)]
pub struct Session {
    swarm: Swarm,
    stop: Rc<Cell<bool>>,
    state: SessionState,
}

impl Session {
    /// Starts a session over `swarm`.
    ///
    /// # Returns
    ///
    /// The idle session and the handle that stops it.
    pub fn start(swarm: Swarm) -> (Self, StopHandle) {
        let stop = Rc::new(Cell::new(false));
        log::info!(
            "session started: {} agents in {} groups",
            swarm.agents().len(),
            swarm.groups().len()
        );
        let session = Self {
            swarm,
            stop: Rc::clone(&stop),
            state: SessionState::Idle,
        };
        (session, StopHandle(stop))
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The simulated world.
    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    /// Mutable access to the world between frames.
    pub fn swarm_mut(&mut self) -> &mut Swarm {
        &mut self.swarm
    }

    /// Ends the session and hands the world back.
    pub fn into_swarm(self) -> Swarm {
        self.swarm
    }

    /// Queues new world bounds; they take effect at the next frame's refresh.
    pub fn resize(&mut self, bounds: WorldBounds) -> Result<()> {
        self.swarm.resize(bounds)?;
        log::info!("resize queued: {}x{}", bounds.width, bounds.height);
        Ok(())
    }

    /// Runs one frame unless the session was stopped.
    ///
    /// # Returns
    ///
    /// Whether a frame ran.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.state == SessionState::Stopped {
            return false;
        }
        if self.stop.get() {
            self.state = SessionState::Stopped;
            log::info!("session stopped after {} frames", self.swarm.frame());
            return false;
        }
        self.swarm.step(dt);
        self.state = SessionState::Running;
        true
    }

    /// Runs up to `frames` frames, stopping early if the session was stopped.
    ///
    /// # Returns
    ///
    /// Number of frames run by this call.
    pub fn run(&mut self, dt: f64, frames: u64) -> u64 {
        let mut ran = 0;
        while ran < frames && self.tick(dt) {
            ran += 1;
        }
        ran
    }

    /// Runs frames until the stop handle fires.
    ///
    /// `after_frame` sees the world after every frame. The loop holds the
    /// session, so the hook is where a caller fires the handle, typically
    /// through a clone captured by the closure.
    ///
    /// # Returns
    ///
    /// Number of frames run by this call.
    pub fn run_until_stopped<F>(&mut self, dt: f64, mut after_frame: F) -> u64
    where
        F: FnMut(&Swarm),
    {
        let mut ran = 0;
        while self.tick(dt) {
            ran += 1;
            after_frame(&self.swarm);
        }
        ran
    }
}
