//! Continuous frame loop control.
//!
//! The host owns the actual pacing primitive (a window's redraw request, a
//! browser animation frame). [`FrameScheduler`] decides whether a tick runs
//! and asks the pacer for the next one, until stopped.

use crate::util::frame_timing::FrameTiming;

/// Host frame-pacing primitive, invoked once per tick to schedule the next.
pub trait FramePacer {
    /// Ask the host for another frame callback.
    fn request_frame(&mut self);
}

#[cfg(feature = "viewer")]
impl FramePacer for std::sync::Arc<winit::window::Window> {
    fn request_frame(&mut self) {
        self.request_redraw();
    }
}

/// Request-next-frame loop with a stop flag and an optional FPS cap.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    running: bool,
    timing: FrameTiming,
    frames: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FrameScheduler {
    /// Create a running scheduler capped at `target_fps` (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            running: true,
            timing: FrameTiming::new(target_fps),
            frames: 0,
        }
    }

    /// Whether ticks are still being scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resume scheduling and request the first frame.
    pub fn start(&mut self, pacer: &mut dyn FramePacer) {
        if !self.running {
            log::info!("frame loop resumed");
        }
        self.running = true;
        pacer.request_frame();
    }

    /// Stop requesting ticks. A readback already in flight still completes
    /// on the next poll and is validated against the scene generation.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("frame loop stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    /// Frames run so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.timing.fps()
    }

    /// Change the FPS cap.
    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.timing.set_target_fps(target_fps);
    }

    /// Host frame callback. Returns the step in seconds when a frame should
    /// run now; the next frame is requested either way while running.
    pub fn tick(&mut self, pacer: &mut dyn FramePacer) -> Option<f32> {
        if !self.running {
            return None;
        }
        pacer.request_frame();
        if !self.timing.should_render() {
            return None;
        }
        self.frames += 1;
        Some(self.timing.end_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingPacer {
        requests: usize,
    }

    impl FramePacer for CountingPacer {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    #[test]
    fn each_tick_requests_the_next() {
        let mut scheduler = FrameScheduler::default();
        let mut pacer = CountingPacer::default();
        for _ in 0..3 {
            let dt = scheduler.tick(&mut pacer).unwrap();
            assert!((0.0..=0.1).contains(&dt));
        }
        assert_eq!(pacer.requests, 3);
        assert_eq!(scheduler.frames(), 3);
    }

    #[test]
    fn stopped_scheduler_goes_quiet() {
        let mut scheduler = FrameScheduler::default();
        let mut pacer = CountingPacer::default();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.tick(&mut pacer), None);
        assert_eq!(pacer.requests, 0);

        scheduler.start(&mut pacer);
        assert_eq!(pacer.requests, 1);
        assert!(scheduler.tick(&mut pacer).is_some());
    }

    #[test]
    fn capped_scheduler_keeps_requesting_while_waiting() {
        let mut scheduler = FrameScheduler::new(1);
        let mut pacer = CountingPacer::default();
        // The first slot opens a full second after construction.
        assert_eq!(scheduler.tick(&mut pacer), None);
        assert_eq!(pacer.requests, 1);
        assert_eq!(scheduler.frames(), 0);
    }
}
