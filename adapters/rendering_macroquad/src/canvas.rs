use std::{fs, io, path::PathBuf};

use glam::Vec2;
use image::ImageFormat;
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    text,
    texture::{self, DrawTextureParams, FilterMode, Texture2D},
    window,
};
use pharcobial_core::{GraphicCatalog, GraphicKey};
use pharcobial_rendering::{
    Canvas, Color, GraphicError, GraphicSource, GraphicsCache, TextPosition, TextStyle,
};

/// Texture plus the orientation it is drawn with.
#[derive(Clone, Copy, Debug)]
pub struct TextureGraphic {
    /// GPU texture.
    pub texture: Texture2D,
    /// Whether the texture is drawn flipped horizontally.
    pub flipped: bool,
}

/// Decoded RGBA pixels ready for upload.
#[derive(Debug)]
struct Pixels {
    width: u16,
    height: u16,
    rgba: Vec<u8>,
}

/// Loads `<directory>/<id>.png` files as textures.
#[derive(Clone, Debug)]
pub struct TextureSource {
    directory: PathBuf,
}

impl TextureSource {
    /// Creates a source reading from `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Reads and decodes `<directory>/<id>.png`.
    fn read(&self, id: &str) -> Result<Pixels, GraphicError> {
        let path = self.directory.join(format!("{id}.png"));
        let invalid = |reason: String| GraphicError::Invalid {
            id: id.to_owned(),
            reason: format!("{}: {reason}", path.display()),
        };

        let bytes = fs::read(&path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => GraphicError::NotFound { id: id.to_owned() },
            _ => invalid(error.to_string()),
        })?;
        let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .map_err(|error| invalid(error.to_string()))?
            .to_rgba8();

        let (Ok(width), Ok(height)) = (u16::try_from(image.width()), u16::try_from(image.height()))
        else {
            return Err(invalid(format!(
                "{}x{} is too large for a texture",
                image.width(),
                image.height()
            )));
        };
        Ok(Pixels {
            width,
            height,
            rgba: image.into_raw(),
        })
    }
}

impl GraphicSource for TextureSource {
    type Graphic = TextureGraphic;

    fn load(&mut self, id: &str) -> Result<TextureGraphic, GraphicError> {
        let Pixels {
            width,
            height,
            rgba,
        } = self.read(id)?;
        let texture = Texture2D::from_rgba8(width, height, &rgba);
        texture.set_filter(FilterMode::Nearest);
        log::debug!("loaded graphic `{id}`");
        Ok(TextureGraphic {
            texture,
            flipped: false,
        })
    }

    fn mirror(&mut self, graphic: &TextureGraphic) -> TextureGraphic {
        TextureGraphic {
            flipped: !graphic.flipped,
            ..*graphic
        }
    }
}

/// Canvas drawing through macroquad's immediate-mode API.
#[derive(Debug)]
pub struct MacroquadCanvas {
    cache: GraphicsCache<TextureSource>,
    scale: f32,
}

impl MacroquadCanvas {
    /// Creates a canvas presenting logical pixels at `scale`.
    #[must_use]
    pub fn new(source: TextureSource, scale: f32) -> Self {
        Self {
            cache: GraphicsCache::new(source),
            scale: if scale > 0.0 { scale } else { 1.0 },
        }
    }

    /// Frees every loaded texture, returning how many were freed.
    ///
    /// Mirrored variants share their base texture and are only forgotten.
    pub fn release(&mut self) -> usize {
        let mut released = 0;
        for (key, graphic) in self.cache.drain() {
            if !key.is_mirrored() {
                graphic.texture.delete();
                released += 1;
            }
        }
        released
    }
}

impl GraphicCatalog for MacroquadCanvas {
    fn contains(&mut self, key: &GraphicKey) -> bool {
        self.cache.contains(key)
    }
}

impl Canvas for MacroquadCanvas {
    fn clear(&mut self, color: Color) {
        window::clear_background(to_macroquad_color(color));
    }

    fn draw_graphic(&mut self, key: &GraphicKey, position: Vec2) -> Result<(), GraphicError> {
        let TextureGraphic { texture, flipped } = self.cache.get(key)?;
        let dest_size = MacroquadVec2::new(
            texture.width() * self.scale,
            texture.height() * self.scale,
        );

        texture::draw_texture_ex(
            texture,
            position.x * self.scale,
            position.y * self.scale,
            WHITE,
            DrawTextureParams {
                dest_size: Some(dest_size),
                flip_x: flipped,
                ..DrawTextureParams::default()
            },
        );
        Ok(())
    }

    fn draw_text(&mut self, line: &str, style: TextStyle, position: TextPosition) {
        let font_size = style.size * self.scale;
        let color = to_macroquad_color(style.color);

        // Macroquad anchors text at its baseline.
        let TextPosition::At(at) = position;
        text::draw_text(
            line,
            at.x * self.scale,
            at.y * self.scale + font_size,
            font_size,
            color,
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pharcobial-{name}-{}", process::id()));
        fs::create_dir_all(&dir).expect("scratch dir should be creatable");
        dir
    }

    #[test]
    fn missing_file_is_not_found() {
        let source = TextureSource::new(scratch_dir("missing"));

        assert!(matches!(
            source.read("wizard"),
            Err(GraphicError::NotFound { ref id }) if id == "wizard"
        ));
    }

    #[test]
    fn non_png_file_is_invalid() {
        let dir = scratch_dir("invalid");
        fs::write(dir.join("bush.png"), b"GIF89a").expect("fixture should be writable");
        let source = TextureSource::new(&dir);

        assert!(matches!(
            source.read("bush"),
            Err(GraphicError::Invalid { ref id, .. }) if id == "bush"
        ));
    }

    #[test]
    fn truncated_png_body_is_invalid() {
        let dir = scratch_dir("truncated");
        let mut bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
        bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0]);
        fs::write(dir.join("road.png"), &bytes).expect("fixture should be writable");
        let source = TextureSource::new(&dir);

        assert!(matches!(
            source.read("road"),
            Err(GraphicError::Invalid { ref id, .. }) if id == "road"
        ));
    }

    #[test]
    fn png_is_decoded_to_rgba() {
        let dir = scratch_dir("valid");
        let pixels = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        pixels
            .save_with_format(dir.join("grass.png"), ImageFormat::Png)
            .expect("fixture should be writable");
        let source = TextureSource::new(&dir);

        let decoded = source.read("grass").expect("grass should decode");

        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(&decoded.rgba, pixels.as_raw());
    }

    #[test]
    fn bundled_graphics_decode_at_block_size() {
        let source =
            TextureSource::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/gfx"));

        for id in [
            "grass",
            "road",
            "pharma",
            "pharma-walk-1",
            "pharma-walk-2",
            "wizard",
            "guard",
            "bush",
            "bush-monster",
            "bubble",
        ] {
            let pixels = source
                .read(id)
                .unwrap_or_else(|error| panic!("{id} should decode: {error}"));
            assert_eq!((pixels.width, pixels.height), (32, 32), "{id}");
        }
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::from_rgb_u8(255, 0, 51));

        assert_eq!(converted, macroquad::color::Color::new(1.0, 0.0, 0.2, 1.0));
    }
}
