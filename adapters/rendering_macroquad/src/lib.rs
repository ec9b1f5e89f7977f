#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Windowed frontend for Shamble built on macroquad.
//!
//! Opens the window, turns key presses into [`InputCommand`]s, streams the
//! texture manifest in one image per frame and hands each frame to a
//! [`FrameHandler`]. Macroquad is pulled in without its `audio` feature;
//! the game makes no sound.

mod textures;

pub use self::textures::default_manifest_path;

use self::textures::TextureStore;
use anyhow::{Context, Result};
use macroquad::{
    color::WHITE,
    input::{is_key_pressed, KeyCode},
    math::{vec2, Rect},
    texture::DrawTextureParams,
};
use shamble_core::InputCommand;
use shamble_rendering::{
    Canvas, Color, FrameHandler, ImageHandle, PixelRect, Presentation, RenderingBackend,
};
use std::{
    path::PathBuf,
    time::Duration,
};

const KEY_BINDINGS: [(KeyCode, InputCommand); 9] = [
    (KeyCode::Left, InputCommand::Left),
    (KeyCode::A, InputCommand::Left),
    (KeyCode::Up, InputCommand::Up),
    (KeyCode::W, InputCommand::Up),
    (KeyCode::Right, InputCommand::Right),
    (KeyCode::D, InputCommand::Right),
    (KeyCode::Down, InputCommand::Down),
    (KeyCode::S, InputCommand::Down),
    (KeyCode::Space, InputCommand::Skip),
];

/// Maps a keyboard key onto the movement command it triggers.
#[must_use]
pub fn command_for_key(key: KeyCode) -> Option<InputCommand> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, command)| *command)
}

/// Snapshot of edge-triggered keyboard input observed during a single frame.
#[derive(Clone, Debug, Default)]
struct KeyboardInput {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    commands: Vec<InputCommand>,
}

impl KeyboardInput {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let commands = KEY_BINDINGS
            .iter()
            .filter(|(key, _)| is_key_pressed(*key))
            .map(|(_, command)| *command)
            .collect();

        Self {
            quit_requested,
            commands,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    manifest_path: Option<PathBuf>,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            manifest_path: Some(default_manifest_path()),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Selects the texture manifest to load, or `None` to run on flat colors.
    #[must_use]
    pub fn with_manifest_path(mut self, manifest_path: Option<PathBuf>) -> Self {
        self.manifest_path = manifest_path;
        self
    }
}

/// Counts rendered frames and reports the total once per second.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Counts one frame that took `dt`. Returns the frame count of the
    /// second that just closed, if this frame closed one.
    fn tick(&mut self, dt: Duration) -> Option<u32> {
        self.frames = self.frames.saturating_add(1);
        self.elapsed += dt;
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        self.elapsed = Duration::ZERO;
        Some(std::mem::take(&mut self.frames))
    }
}

/// Canvas drawing straight into macroquad's immediate-mode batcher.
struct MacroquadCanvas<'a> {
    textures: &'a TextureStore,
}

impl Canvas for MacroquadCanvas<'_> {
    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        macroquad::shapes::draw_rectangle(
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            to_macroquad_color(color),
        );
    }

    fn draw_image(&mut self, image: ImageHandle, source: PixelRect, dest: PixelRect, flip_x: bool) {
        let Some(texture) = self.textures.texture(image) else {
            return;
        };

        let params = DrawTextureParams {
            dest_size: Some(vec2(dest.width, dest.height)),
            source: Some(Rect::new(source.x, source.y, source.width, source.height)),
            flip_x,
            ..DrawTextureParams::default()
        };
        macroquad::texture::draw_texture_ex(texture, dest.x, dest.y, WHITE, params);
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<H>(self, presentation: Presentation, handler: H) -> Result<()>
    where
        H: FrameHandler + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            manifest_path,
        } = self;

        let textures = match &manifest_path {
            Some(path) => textures::read_manifest(path)?,
            None => Vec::new(),
        };

        let Presentation {
            window_title,
            clear_color,
            viewport_width,
            viewport_height,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(viewport_width)
                .context("viewport width exceeds the platform window limits")?,
            window_height: i32::try_from(viewport_height)
                .context("viewport height exceeds the platform window limits")?,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        tracing::info!(
            width = viewport_width,
            height = viewport_height,
            textures = textures.len(),
            "opening window"
        );

        macroquad::Window::from_config(config, async move {
            let mut handler = handler;
            let mut store = TextureStore::new(textures);
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            let mut viewport = (
                macroquad::window::screen_width(),
                macroquad::window::screen_height(),
            );
            handler.on_resize(viewport.0, viewport.1);

            loop {
                let keyboard = KeyboardInput::poll();
                if keyboard.quit_requested {
                    break;
                }
                for command in keyboard.commands {
                    handler.on_input(command);
                }

                let current = (
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                if current != viewport {
                    viewport = current;
                    handler.on_resize(current.0, current.1);
                }

                let _ = store.load_next(textures::default_loader);

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                {
                    let mut canvas = MacroquadCanvas { textures: &store };
                    handler.frame(frame_dt, &mut canvas, &store);
                }

                if let Some(fps) = fps_counter.tick(frame_dt) {
                    if show_fps {
                        tracing::info!(fps, "frames in the last second");
                    }
                }

                macroquad::window::next_frame().await;
            }

            tracing::info!("window closed");
        });

        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
