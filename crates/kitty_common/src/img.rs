//! Image loading and rectangle hit-testing.
//!
//! Images are PNG files named `<name>.png` inside an `img/` directory. Games
//! keep their own images next to their code ([`AssetSource::Local`], usually
//! built with [`local_assets!`]) and can still pick up the stock images that
//! ship with this crate ([`AssetSource::Common`]).

use std::path::{Path, PathBuf};

use anyhow::Result;
use typed_builder::TypedBuilder;

use crate::color::Color;
use crate::error::Error;
use crate::rect::Rect;
use crate::screen::Screen;

const IMG_DIR: &str = "img";
const IMG_EXT: &str = "png";

/// Stock images, compiled into the library so binaries keep them wherever
/// they are installed.
const COMMON_IMAGES: &[(&str, &[u8])] = &[(
    "title_card",
    include_bytes!("../img/title_card.png"),
)];

/// Builds an [`AssetSource::Local`] rooted at the invoking crate's manifest
/// directory, so its images are looked up in that crate's `img/`.
#[macro_export]
macro_rules! local_assets {
    () => {
        $crate::img::AssetSource::Local(::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")))
    };
}

/// Where an image is looked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// `img/` under the given base directory, normally the calling crate's.
    Local(PathBuf),
    /// Images bundled with this library. They are embedded at compile time;
    /// `img_dir` only names the source directory they were read from.
    Common,
}

impl AssetSource {
    pub fn local(base: impl Into<PathBuf>) -> Self {
        AssetSource::Local(base.into())
    }

    pub fn img_dir(&self) -> PathBuf {
        match self {
            AssetSource::Local(base) => base.join(IMG_DIR),
            AssetSource::Common => Path::new(env!("CARGO_MANIFEST_DIR")).join(IMG_DIR),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.img_dir().join(format!("{}.{}", name, IMG_EXT))
    }

    pub fn load_bitmap(&self, name: &str) -> Result<Bitmap> {
        let path = self.path_for(name);
        match self {
            AssetSource::Local(_) => Bitmap::open(&path),
            AssetSource::Common => match COMMON_IMAGES.iter().find(|(n, _)| *n == name) {
                Some((_, bytes)) => Bitmap::from_png_bytes(bytes, &path),
                None => Err(Error::AssetNotFound {
                    path,
                    reason: "not bundled with kitty_common".to_string(),
                }
                .into()),
            },
        }
    }
}

/// A decoded RGBA image.
#[derive(Clone, Debug)]
pub struct Bitmap {
    pixels: image::RgbaImage,
}

impl Bitmap {
    pub fn open(path: &Path) -> Result<Bitmap> {
        if !path.is_file() {
            return Err(Error::AssetNotFound {
                path: path.to_path_buf(),
                reason: "no such file".to_string(),
            }
            .into());
        }
        let img = image::open(path).map_err(|e| Error::AssetNotFound {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Bitmap {
            pixels: img.to_rgba8(),
        })
    }

    /// Decodes an in-memory PNG. `origin` only labels errors.
    pub fn from_png_bytes(bytes: &[u8], origin: &Path) -> Result<Bitmap> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png).map_err(
            |e| Error::AssetNotFound {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            },
        )?;
        Ok(Bitmap {
            pixels: img.to_rgba8(),
        })
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Bitmap {
        Bitmap {
            pixels: image::RgbaImage::from_pixel(width, height, image::Rgba(color.into())),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Raw pixel rows, four bytes per pixel in RGBA order.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pitch(&self) -> usize {
        self.width() as usize * 4
    }
}

/// Placement of a loaded image.
#[derive(TypedBuilder, Clone, Debug)]
pub struct LoadOptions {
    /// Where the anchor goes before shifting.
    #[builder(default)]
    pub position: (i32, i32),
    /// Multiples of the image width and height added to `position`; `(-0.5,
    /// -0.5)` centers the image on `position`, `(-1.0, 0.0)` right-aligns it.
    #[builder(default)]
    pub shift: (f32, f32),
    pub source: AssetSource,
}

/// Something that can draw itself and answer hit tests.
pub trait Factory {
    fn draw(&self, screen: &mut dyn Screen) -> Result<()>;
    fn collidepoint(&self, pos: (i32, i32)) -> bool;
}

/// A factory bounded by a rectangle.
pub trait RectFactory: Factory {
    fn rect(&self) -> Rect;
    fn rect_mut(&mut self) -> &mut Rect;

    fn move_by(&mut self, delta: (i32, i32)) {
        self.rect_mut().move_ip(delta);
    }

    fn colliderect(&self, other: &Rect) -> bool {
        self.rect().colliderect(other)
    }
}

/// Factories that can be created from a named image asset.
pub trait FromAsset: Sized {
    fn from_asset(name: &str, options: LoadOptions) -> Result<Self>;
}

/// A bitmap drawn at its anchor rectangle.
#[derive(Clone, Debug)]
pub struct PngFactory {
    bitmap: Bitmap,
    rect: Rect,
}

impl PngFactory {
    pub fn from_bitmap(bitmap: Bitmap, position: (i32, i32), shift: (f32, f32)) -> Self {
        let size = bitmap.size();
        let rect = Rect::from_point_size(anchor(position, shift, size), size);
        PngFactory { bitmap, rect }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

impl FromAsset for PngFactory {
    fn from_asset(name: &str, options: LoadOptions) -> Result<Self> {
        let bitmap = options.source.load_bitmap(name)?;
        log::debug!(
            "Loaded {} from {:?} ({}x{})",
            name,
            options.source,
            bitmap.width(),
            bitmap.height()
        );
        Ok(PngFactory::from_bitmap(
            bitmap,
            options.position,
            options.shift,
        ))
    }
}

impl Factory for PngFactory {
    fn draw(&self, screen: &mut dyn Screen) -> Result<()> {
        screen.blit(&self.bitmap, self.rect.topleft())
    }

    fn collidepoint(&self, pos: (i32, i32)) -> bool {
        self.rect.collidepoint(pos)
    }
}

impl RectFactory for PngFactory {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn rect_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

/// Top-left corner of an image of `size` placed at `position` and shifted by
/// `shift` multiples of its size. Fractional offsets truncate toward zero.
fn anchor(position: (i32, i32), shift: (f32, f32), (w, h): (u32, u32)) -> (i32, i32) {
    (
        position.0 + (w as f32 * shift.0) as i32,
        position.1 + (h as f32 * shift.1) as i32,
    )
}

pub fn load(name: &str, options: LoadOptions) -> Result<PngFactory> {
    load_as(name, options)
}

pub fn load_as<F: FromAsset>(name: &str, options: LoadOptions) -> Result<F> {
    F::from_asset(name, options)
}
