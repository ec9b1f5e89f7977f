#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Shamble adapters.
//!
//! Frontends implement [`Canvas`], [`ResourceProvider`] and
//! [`RenderingBackend`]; the simulation implements [`FrameHandler`] and never
//! learns which backend is drawing it.

use anyhow::Result as AnyResult;
use glam::Vec2;
use shamble_core::InputCommand;
use std::{collections::BTreeMap, error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl PixelRect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from vector origin and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }
}

/// Opaque reference to an image owned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    id: u32,
    width: u32,
    height: u32,
}

impl ImageHandle {
    /// Creates a handle for the image with the provided backend id and pixel size.
    #[must_use]
    pub const fn new(id: u32, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Backend-specific identifier.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Immediate-mode drawing surface. Calls are fire-and-forget.
pub trait Canvas {
    /// Fills the rectangle with a solid, possibly translucent, color.
    fn fill_rect(&mut self, rect: PixelRect, color: Color);

    /// Copies `source` out of `image` into `dest`, mirroring horizontally when `flip_x` is set.
    fn draw_image(&mut self, image: ImageHandle, source: PixelRect, dest: PixelRect, flip_x: bool);
}

/// Named image resources that may still be loading.
pub trait ResourceProvider {
    /// Reports whether every requested resource is available.
    fn is_fully_loaded(&self) -> bool;

    /// Fraction of resources loaded so far, in `0.0..=1.0`.
    fn progress(&self) -> f32;

    /// Looks up a loaded resource by name.
    fn resource(&self, name: &str) -> Option<ImageHandle>;
}

/// Resources that are known up front and therefore always loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceTable {
    images: BTreeMap<String, ImageHandle>,
}

impl ResourceTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an image under `name`, replacing any previous entry.
    pub fn insert<T>(&mut self, name: T, image: ImageHandle)
    where
        T: Into<String>,
    {
        let _ = self.images.insert(name.into(), image);
    }

    /// Number of registered images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Reports whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ResourceProvider for ResourceTable {
    fn is_fully_loaded(&self) -> bool {
        true
    }

    fn progress(&self) -> f32 {
        1.0
    }

    fn resource(&self, name: &str) -> Option<ImageHandle> {
        self.images.get(name).copied()
    }
}

/// Frame-driven client of a rendering backend.
pub trait FrameHandler {
    /// Delivers a command read from the input devices.
    fn on_input(&mut self, command: InputCommand);

    /// Notifies the handler that the drawable area changed size.
    fn on_resize(&mut self, width: f32, height: f32);

    /// Advances the handler by `dt` and draws one frame.
    fn frame(&mut self, dt: Duration, canvas: &mut dyn Canvas, resources: &dyn ResourceProvider);
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Initial drawable width in pixels.
    pub viewport_width: u32,
    /// Initial drawable height in pixels.
    pub viewport_height: u32,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if viewport_width == 0 || viewport_height == 0 {
            return Err(RenderingError::InvalidViewport {
                width: viewport_width,
                height: viewport_height,
            });
        }

        Ok(Self {
            window_title: window_title.into(),
            clear_color,
            viewport_width,
            viewport_height,
        })
    }
}

/// Rendering backend capable of presenting a [`FrameHandler`].
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// Each frame the backend delivers pending input and resize notifications
    /// to `handler`, then calls [`FrameHandler::frame`] exactly once.
    fn run<H>(self, presentation: Presentation, handler: H) -> AnyResult<()>
    where
        H: FrameHandler + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The viewport must have a positive area.
    InvalidViewport {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport must be non-empty (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
