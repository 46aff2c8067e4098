use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::File,
    io::{Error as IoError, Read},
    path::{Path, PathBuf},
};

use glyph_brush::ab_glyph::FontArc;
use palette::{LinSrgba, Srgba};
use sash::{Bitmap, GlyphFont};

pub type BufReader = std::io::BufReader<File>;
pub type BufWriter = std::io::BufWriter<File>;

// Debug: expect working dir to be cargo project, so look for assets relative to that
#[cfg(debug_assertions)]
pub fn base_path() -> PathBuf {
    PathBuf::new()
}

// Release: always look for assets relative to the executable
#[cfg(not(debug_assertions))]
pub fn base_path() -> PathBuf {
    let mut dir = std::env::current_exe().unwrap_or_default();
    dir.pop();
    dir
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("error reading {}: {source}", .path.display())]
    Read { path: PathBuf, source: IoError },
    // A NotFound while writing means a parent directory is missing.
    #[error("error writing {}: {source}", .path.display())]
    Write { path: PathBuf, source: IoError },
    #[error("invalid yaml in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yml::Error,
    },
    #[error("invalid png {}: {source}", .path.display())]
    Png {
        path: PathBuf,
        source: png::DecodingError,
    },
    #[error("unsupported png layout in {}: {detail}", .path.display())]
    PngLayout { path: PathBuf, detail: String },
    #[error("invalid font {}", .path.display())]
    Font { path: PathBuf },
}

impl AssetError {
    pub fn path(&self) -> &Path {
        match self {
            AssetError::Read { path, .. }
            | AssetError::Write { path, .. }
            | AssetError::Yaml { path, .. }
            | AssetError::Png { path, .. }
            | AssetError::PngLayout { path, .. }
            | AssetError::Font { path } => path,
        }
    }
    pub fn not_found(&self) -> bool {
        match self {
            AssetError::Read { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            AssetError::Png {
                source: png::DecodingError::IoError(source),
                ..
            } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;

pub fn get_path(prefix: &str, asset_path: &str) -> PathBuf {
    let mut file_path = base_path();
    file_path.push(prefix);
    file_path.push(asset_path);
    file_path
}
pub fn open_reader(path: &Path) -> Result<BufReader> {
    log::info!("Reading {}", path.display());
    let file = File::open(path).map_err(|source| AssetError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(BufReader::new(file))
}
pub fn open_writer(path: &Path) -> Result<BufWriter> {
    log::info!("Writing {}", path.display());
    let file = File::create(path).map_err(|source| AssetError::Write {
        path: path.to_owned(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

pub fn create_dir(dir: &str) -> Result<()> {
    let mut dir_path = base_path();
    dir_path.push(dir);
    if !dir_path.exists() {
        log::info!("Creating directory {}", dir_path.display());
        std::fs::create_dir(&dir_path).map_err(|source| AssetError::Write {
            path: dir_path,
            source,
        })?;
    }
    Ok(())
}

pub fn load_yaml_file<T>(prefix: &str, file: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let path = get_path(prefix, file);
    let reader = open_reader(&path)?;
    serde_yml::from_reader(reader).map_err(|source| AssetError::Yaml { path, source })
}
pub fn load_yaml_file_or_default<T>(prefix: &str, file: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let path = get_path(prefix, file);
    if path.exists() {
        load_yaml_file(prefix, file)
    } else {
        log::info!("{} does not exist, using defaults instead", path.display());
        Ok(Default::default())
    }
}
pub fn save_yaml_file<T>(prefix: &str, file: &str, value: &T) -> Result<()>
where
    T: Serialize,
{
    let path = get_path(prefix, file);
    let writer = open_writer(&path)?;
    serde_yml::to_writer(writer, value).map_err(|source| AssetError::Yaml { path, source })
}

/// Decodes a PNG into a bitmap, expanding palette, grayscale and RGB images to
/// RGBA.
pub fn load_png_file(prefix: &str, file: &str) -> Result<Bitmap> {
    let path = get_path(prefix, file);
    let reader = open_reader(&path)?;
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut image_reader = decoder.read_info().map_err(|source| AssetError::Png {
        path: path.clone(),
        source,
    })?;
    let mut buffer = vec![0; image_reader.output_buffer_size()];
    let info = image_reader
        .next_frame(&mut buffer)
        .map_err(|source| AssetError::Png {
            path: path.clone(),
            source,
        })?;
    buffer.truncate(info.buffer_size());
    decode_pixels(&buffer, info.color_type, info.width, info.height)
        .ok_or_else(|| AssetError::PngLayout {
            detail: format!("{:?} {}x{}", info.color_type, info.width, info.height),
            path,
        })
}

fn decode_pixels(
    buffer: &[u8],
    color_type: png::ColorType,
    width: u32,
    height: u32,
) -> Option<Bitmap> {
    let channels = match color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => return None,
    };
    let pixels = buffer
        .chunks_exact(channels)
        .map(|px| -> LinSrgba {
            let (r, g, b, a) = match *px {
                [v] => (v, v, v, 255),
                [v, a] => (v, v, v, a),
                [r, g, b] => (r, g, b, 255),
                [r, g, b, a] => (r, g, b, a),
                _ => unreachable!("chunks_exact yields {channels} bytes"),
            };
            Srgba::new(r, g, b, a).into_linear()
        })
        .collect();
    Bitmap::from_pixels(width, height, pixels)
}

pub fn load_font_file(prefix: &str, file: &str) -> Result<FontArc> {
    let path = get_path(prefix, file);
    let mut reader = open_reader(&path)?;
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|source| AssetError::Read {
            path: path.clone(),
            source,
        })?;
    FontArc::try_from_vec(buf).map_err(|_| AssetError::Font { path })
}

/// Loads a font file and fixes it at `px_size` pixels.
pub fn load_font(prefix: &str, file: &str, px_size: f32) -> Result<GlyphFont> {
    Ok(GlyphFont::new(load_font_file(prefix, file)?, px_size))
}
