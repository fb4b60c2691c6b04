//! Landmark capture lifecycle.
//!
//! A [`LandmarkSource`] produces [`LandmarkFrame`]s on its own schedule and
//! pushes them into a shared queue. The frame loop drains that queue once
//! per frame. The session owns the source and stops it when dropped, so
//! every path out of tracking releases the camera.

use super::landmarks::LandmarkFrame;
use bevy::prelude::*;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("landmark source '{0}' is unavailable: {1}")]
    Unavailable(String, String),
    #[error("landmark queue is poisoned")]
    QueuePoisoned,
}

/// Producer-side handle onto the frame queue.
#[derive(Debug, Clone, Default)]
pub struct LandmarkSink(Arc<Mutex<Vec<LandmarkFrame>>>);

impl LandmarkSink {
    pub fn push(&self, frame: LandmarkFrame) -> Result<(), CaptureError> {
        let mut queue = self.0.lock().map_err(|_| CaptureError::QueuePoisoned)?;
        queue.push(frame);
        Ok(())
    }

    fn drain(&self) -> Vec<LandmarkFrame> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }
}

/// Anything that can deliver hand landmark frames.
pub trait LandmarkSource: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn start(&mut self, sink: LandmarkSink) -> Result<(), CaptureError>;
    fn stop(&mut self);
}

/// Landmarks computed by the web frontend and delivered over RPC. Frames
/// arrive through [`GestureTracker::push`], so starting only has to tell the
/// frontend, which the tracking systems do.
#[derive(Debug, Default)]
pub struct FrontendLandmarkSource;

impl LandmarkSource for FrontendLandmarkSource {
    fn name(&self) -> &str {
        "frontend"
    }

    fn start(&mut self, _sink: LandmarkSink) -> Result<(), CaptureError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

/// A started source together with its queue.
pub struct CaptureSession {
    source: Box<dyn LandmarkSource>,
    sink: LandmarkSink,
}

impl CaptureSession {
    pub fn start(mut source: Box<dyn LandmarkSource>) -> Result<Self, CaptureError> {
        let sink = LandmarkSink::default();
        source.start(sink.clone())?;
        info!("Landmark capture started ({})", source.name());
        Ok(Self { source, sink })
    }

    pub fn sink(&self) -> &LandmarkSink {
        &self.sink
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.source.stop();
        info!("Landmark capture stopped ({})", self.source.name());
    }
}

/// Resource owning the optional running capture session.
#[derive(Resource, Default)]
pub struct GestureTracker {
    session: Option<CaptureSession>,
}

impl GestureTracker {
    pub fn is_enabled(&self) -> bool {
        self.session.is_some()
    }

    /// Start capturing. Returns `Ok(false)` without touching `source` when
    /// already enabled.
    pub fn enable(&mut self, source: Box<dyn LandmarkSource>) -> Result<bool, CaptureError> {
        if self.session.is_some() {
            return Ok(false);
        }
        self.session = Some(CaptureSession::start(source)?);
        Ok(true)
    }

    /// Stop capturing. Returns false when already disabled.
    pub fn disable(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Queue a frame produced outside the source. Dropped while disabled.
    pub fn push(&self, frame: LandmarkFrame) -> bool {
        match &self.session {
            Some(session) => session.sink().push(frame).is_ok(),
            None => false,
        }
    }

    pub fn drain(&self) -> Vec<LandmarkFrame> {
        self.session
            .as_ref()
            .map(|session| session.sink.drain())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Counters {
        started: Arc<AtomicUsize>,
        stopped: Arc<AtomicUsize>,
    }

    struct CountingSource {
        counters: Counters,
        fail: bool,
    }

    impl LandmarkSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn start(&mut self, sink: LandmarkSink) -> Result<(), CaptureError> {
            if self.fail {
                return Err(CaptureError::Unavailable("counting".into(), "no camera".into()));
            }
            self.counters.started.fetch_add(1, Ordering::SeqCst);
            sink.push(LandmarkFrame::empty())
        }

        fn stop(&mut self) {
            self.counters.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn source(counters: &Counters) -> Box<dyn LandmarkSource> {
        Box::new(CountingSource {
            counters: counters.clone(),
            fail: false,
        })
    }

    #[test]
    fn enable_and_disable_are_idempotent() {
        let counters = Counters::default();
        let mut tracker = GestureTracker::default();

        assert!(tracker.enable(source(&counters)).unwrap());
        assert!(!tracker.enable(source(&counters)).unwrap());
        assert_eq!(counters.started.load(Ordering::SeqCst), 1);

        assert!(tracker.disable());
        assert!(!tracker.disable());
        assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_the_tracker_stops_the_source() {
        let counters = Counters::default();
        {
            let mut tracker = GestureTracker::default();
            tracker.enable(source(&counters)).unwrap();
        }
        assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_start_leaves_tracking_disabled() {
        let counters = Counters::default();
        let mut tracker = GestureTracker::default();
        let failing = Box::new(CountingSource {
            counters: counters.clone(),
            fail: true,
        });
        assert!(tracker.enable(failing).is_err());
        assert!(!tracker.is_enabled());
        assert_eq!(counters.stopped.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn frames_flow_only_while_enabled() {
        let counters = Counters::default();
        let mut tracker = GestureTracker::default();
        assert!(!tracker.push(LandmarkFrame::empty()));

        tracker.enable(source(&counters)).unwrap();
        assert!(tracker.push(LandmarkFrame::empty()));
        // one frame pushed by the source on start plus one from outside
        assert_eq!(tracker.drain().len(), 2);
        assert!(tracker.drain().is_empty());

        tracker.push(LandmarkFrame::empty());
        tracker.disable();
        assert!(tracker.drain().is_empty());
    }
}
