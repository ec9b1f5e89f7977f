//! Sprite-strip animation playback.

use std::time::Duration;

use glam::Vec2;
use shamble_rendering::{Canvas, ImageHandle, PixelRect};

/// Playback state of an [`Animation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    /// Not advancing; rewound by [`Animation::stop`].
    Stopped,
    /// Advancing once through the strip, then stopping on the last frame.
    Playing,
    /// Advancing and wrapping back to the first frame.
    Looping,
    /// Holding the current frame until playback is restarted.
    Paused,
}

/// Horizontal strip of equally sized frames played back on a timer.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    image: Option<ImageHandle>,
    frame_width: u32,
    frame_height: u32,
    frame_count: u32,
    current_frame: u32,
    frame_delay: Duration,
    elapsed: Duration,
    state: AnimationState,
}

impl Animation {
    /// Creates a stopped animation over `image`.
    ///
    /// The frame count is the number of whole frames that fit in the image
    /// width; a missing image has no frames and draws nothing.
    #[must_use]
    pub fn new(
        image: Option<ImageHandle>,
        frame_delay: Duration,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let frame_count = image
            .and_then(|image| image.width().checked_div(frame_width))
            .unwrap_or(0);
        Self {
            image,
            frame_width,
            frame_height,
            frame_count,
            current_frame: 0,
            frame_delay,
            elapsed: Duration::ZERO,
            state: AnimationState::Stopped,
        }
    }

    /// Image the frames are cut from.
    #[must_use]
    pub const fn image(&self) -> Option<ImageHandle> {
        self.image
    }

    /// Number of frames in the strip.
    #[must_use]
    pub const fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Index of the frame drawn by [`Animation::render`].
    #[must_use]
    pub const fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Current playback state.
    #[must_use]
    pub const fn state(&self) -> AnimationState {
        self.state
    }

    /// Reports whether the frame timer is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.state, AnimationState::Playing | AnimationState::Looping)
    }

    /// Plays the strip once, optionally replacing the frame delay.
    pub fn play(&mut self, frame_delay: Option<Duration>) {
        self.start(AnimationState::Playing, frame_delay);
    }

    /// Plays the strip repeatedly, optionally replacing the frame delay.
    pub fn start_looping(&mut self, frame_delay: Option<Duration>) {
        self.start(AnimationState::Looping, frame_delay);
    }

    /// Stops playback and rewinds to the first frame.
    pub fn stop(&mut self) {
        self.state = AnimationState::Stopped;
        self.current_frame = 0;
        self.elapsed = Duration::ZERO;
    }

    /// Freezes a running animation on its current frame.
    pub fn pause(&mut self) {
        if self.is_playing() {
            self.state = AnimationState::Paused;
        }
    }

    /// Advances the frame timer by `dt`.
    pub fn update(&mut self, dt: Duration) {
        if !self.is_playing() || self.frame_count == 0 || self.frame_delay.is_zero() {
            return;
        }

        self.elapsed += dt;
        while self.elapsed >= self.frame_delay {
            self.elapsed -= self.frame_delay;
            self.current_frame += 1;
            if self.current_frame < self.frame_count {
                continue;
            }

            if self.state == AnimationState::Looping {
                self.current_frame -= self.frame_count;
            } else {
                self.current_frame = self.frame_count - 1;
                self.state = AnimationState::Stopped;
                self.elapsed = Duration::ZERO;
                return;
            }
        }
    }

    /// Draws the current frame with its upper-left corner at `position`.
    pub fn render(&self, canvas: &mut dyn Canvas, position: Vec2, flip_x: bool) {
        self.draw_frame(canvas, self.current_frame, position, flip_x);
    }

    /// Draws the frame found at `progress` (`0.0..=1.0`) through the strip.
    pub fn render_progress(
        &self,
        canvas: &mut dyn Canvas,
        position: Vec2,
        progress: f32,
        flip_x: bool,
    ) {
        if self.frame_count == 0 {
            return;
        }
        let frame = (progress.clamp(0.0, 1.0) * self.frame_count as f32).floor() as u32;
        self.draw_frame(canvas, frame.min(self.frame_count - 1), position, flip_x);
    }

    fn start(&mut self, state: AnimationState, frame_delay: Option<Duration>) {
        self.state = state;
        if let Some(frame_delay) = frame_delay {
            self.frame_delay = frame_delay;
        }
        self.elapsed = Duration::ZERO;
    }

    fn draw_frame(&self, canvas: &mut dyn Canvas, frame: u32, position: Vec2, flip_x: bool) {
        let Some(image) = self.image else {
            return;
        };
        if self.frame_count == 0 {
            return;
        }

        let width = self.frame_width as f32;
        let height = self.frame_height as f32;
        let source = PixelRect::new(frame as f32 * width, 0.0, width, height);
        let dest = PixelRect::from_origin_and_size(position, Vec2::new(width, height));
        canvas.draw_image(image, source, dest, flip_x);
    }
}
