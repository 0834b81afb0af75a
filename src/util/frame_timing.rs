use web_time::{Duration, Instant};

/// Longest step handed to the cameras; larger gaps (window dragged, process
/// suspended) are treated as one slow frame.
const MAX_FRAME_DT: f32 = 0.1;

/// Frame timing with dt measurement, FPS smoothing, and optional frame
/// limiting.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            target_fps,
            min_frame_duration: Self::min_duration(target_fps),
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    fn min_duration(target_fps: u32) -> Duration {
        if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        }
    }

    /// Change the FPS cap (0 = unlimited).
    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.target_fps = target_fps;
        self.min_frame_duration = Self::min_duration(target_fps);
    }

    /// Current FPS cap.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Whether enough time has passed since the last frame to render.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.should_render_at(Instant::now())
    }

    fn should_render_at(&self, now: Instant) -> bool {
        self.target_fps == 0
            || now.duration_since(self.last_frame) >= self.min_frame_duration
    }

    /// Mark a frame as rendered. Returns the seconds since the previous
    /// frame, capped at 0.1.
    pub fn end_frame(&mut self) -> f32 {
        self.end_frame_at(Instant::now())
    }

    fn end_frame_at(&mut self, now: Instant) -> f32 {
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        frame_time.min(MAX_FRAME_DT)
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}
