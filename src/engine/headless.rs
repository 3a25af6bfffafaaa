//! Scripted backend with no terminal attached

use std::collections::VecDeque;

use tracing::trace;

use super::backend::Backend;
use super::surface::TextSurface;
use crate::input::EventRecord;

/// Replays scripted event batches, one batch per poll
///
/// Counts flips and teardowns and keeps the last flipped frame, so runs can
/// be asserted on without a terminal.
#[derive(Debug)]
pub struct HeadlessBackend {
    script: VecDeque<Vec<EventRecord>>,
    quit_when_exhausted: bool,
    quit_sent: bool,
    surface: TextSurface,
    last_frame: Vec<String>,
    polls: usize,
    flips: usize,
    teardowns: usize,
}

impl HeadlessBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            script: VecDeque::new(),
            quit_when_exhausted: false,
            quit_sent: false,
            surface: TextSurface::new(width, height),
            last_frame: Vec::new(),
            polls: 0,
            flips: 0,
            teardowns: 0,
        }
    }

    /// Appends a batch returned by a later poll
    pub fn with_batch(mut self, batch: impl IntoIterator<Item = EventRecord>) -> Self {
        self.push_batch(batch);
        self
    }

    /// Emits a single `Quit` record once the script runs out
    pub fn quit_when_exhausted(mut self) -> Self {
        self.quit_when_exhausted = true;
        self
    }

    pub fn push_batch(&mut self, batch: impl IntoIterator<Item = EventRecord>) {
        self.script.push_back(batch.into_iter().collect());
    }

    pub fn pending_batches(&self) -> usize {
        self.script.len()
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn flips(&self) -> usize {
        self.flips
    }

    pub fn teardowns(&self) -> usize {
        self.teardowns
    }

    /// Rows of the surface at the last flip
    pub fn last_frame(&self) -> &[String] {
        &self.last_frame
    }
}

impl Backend for HeadlessBackend {
    type Surface = TextSurface;

    fn poll(&mut self) -> anyhow::Result<Vec<EventRecord>> {
        self.polls += 1;
        if let Some(batch) = self.script.pop_front() {
            trace!(records = batch.len(), "Replaying scripted batch");
            return Ok(batch);
        }
        if self.quit_when_exhausted && !self.quit_sent {
            self.quit_sent = true;
            return Ok(vec![EventRecord::quit()]);
        }
        Ok(Vec::new())
    }

    fn surface(&mut self) -> &mut TextSurface {
        &mut self.surface
    }

    fn flip(&mut self) -> anyhow::Result<()> {
        self.flips += 1;
        self.last_frame = self.surface.rows().collect();
        Ok(())
    }

    fn teardown(&mut self) {
        self.teardowns += 1;
    }
}
