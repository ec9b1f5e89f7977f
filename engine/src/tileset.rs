//! Map tile drawing.

use glam::Vec2;
use shamble_core::TileKind;
use shamble_rendering::{Canvas, Color, ImageHandle, PixelRect};

/// Draws tiles from a horizontal strip image, falling back to flat colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tileset {
    image: Option<ImageHandle>,
    tile_width: u32,
    tile_height: u32,
}

impl Tileset {
    /// Creates a tileset cutting `tile_width` x `tile_height` tiles from `image`.
    #[must_use]
    pub const fn new(image: Option<ImageHandle>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            image,
            tile_width,
            tile_height,
        }
    }

    /// Image the tiles are cut from.
    #[must_use]
    pub const fn image(&self) -> Option<ImageHandle> {
        self.image
    }

    /// Draws `kind` with its upper-left corner at `position`.
    ///
    /// Kinds without a tile in the image are filled with [`tile_color`];
    /// [`TileKind::Invalid`] draws nothing.
    pub fn draw_tile(&self, canvas: &mut dyn Canvas, kind: TileKind, position: Vec2) {
        let Some(index) = kind.tileset_index() else {
            return;
        };

        let width = self.tile_width as f32;
        let height = self.tile_height as f32;
        let dest = PixelRect::from_origin_and_size(position, Vec2::new(width, height));

        match self.image {
            Some(image) if index < self.tiles_in(image) => {
                let source = PixelRect::new(index as f32 * width, 0.0, width, height);
                canvas.draw_image(image, source, dest, false);
            }
            _ => {
                if let Some(color) = tile_color(kind) {
                    canvas.fill_rect(dest, color);
                }
            }
        }
    }

    fn tiles_in(&self, image: ImageHandle) -> u32 {
        image.width().checked_div(self.tile_width).unwrap_or(0)
    }
}

/// Flat color used for `kind` when no tile image is available.
#[must_use]
pub const fn tile_color(kind: TileKind) -> Option<Color> {
    match kind {
        TileKind::Interior => Some(Color::from_rgb_u8(0xFF, 0xFF, 0xFF)),
        TileKind::Wall => Some(Color::from_rgb_u8(0x7D, 0x00, 0x00)),
        TileKind::Road => Some(Color::from_rgb_u8(0x88, 0x88, 0x88)),
        TileKind::Pavement => Some(Color::from_rgb_u8(0xBB, 0xBB, 0xBB)),
        TileKind::Grass => Some(Color::from_rgb_u8(0x00, 0xBB, 0x00)),
        TileKind::Hedge => Some(Color::from_rgb_u8(0x00, 0x88, 0x00)),
        TileKind::Invalid => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Draw {
        Fill(PixelRect, Color),
        Image(PixelRect, PixelRect),
    }

    #[derive(Default)]
    struct Log(Vec<Draw>);

    impl Canvas for Log {
        fn fill_rect(&mut self, rect: PixelRect, color: Color) {
            self.0.push(Draw::Fill(rect, color));
        }

        fn draw_image(
            &mut self,
            _image: ImageHandle,
            source: PixelRect,
            dest: PixelRect,
            _flip_x: bool,
        ) {
            self.0.push(Draw::Image(source, dest));
        }
    }

    #[test]
    fn tiles_are_cut_by_index() {
        let tileset = Tileset::new(Some(ImageHandle::new(1, 192, 32)), 32, 32);
        let mut canvas = Log::default();
        tileset.draw_tile(&mut canvas, TileKind::Pavement, Vec2::new(64.0, 0.0));

        assert_eq!(
            canvas.0,
            vec![Draw::Image(
                PixelRect::new(96.0, 0.0, 32.0, 32.0),
                PixelRect::new(64.0, 0.0, 32.0, 32.0)
            )]
        );
    }

    #[test]
    fn missing_tiles_fall_back_to_colors() {
        let narrow = Tileset::new(Some(ImageHandle::new(1, 64, 32)), 32, 32);
        let mut canvas = Log::default();
        narrow.draw_tile(&mut canvas, TileKind::Hedge, Vec2::ZERO);
        Tileset::new(None, 32, 32).draw_tile(&mut canvas, TileKind::Wall, Vec2::ZERO);

        let rect = PixelRect::new(0.0, 0.0, 32.0, 32.0);
        assert_eq!(
            canvas.0,
            vec![
                Draw::Fill(rect, Color::from_rgb_u8(0, 0x88, 0)),
                Draw::Fill(rect, Color::from_rgb_u8(0x7D, 0, 0)),
            ]
        );
    }

    #[test]
    fn invalid_tiles_draw_nothing() {
        let mut canvas = Log::default();
        Tileset::new(None, 32, 32).draw_tile(&mut canvas, TileKind::Invalid, Vec2::ZERO);
        assert!(canvas.0.is_empty());
    }
}
