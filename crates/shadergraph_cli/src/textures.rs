// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loading of the images behind `texture2D` properties.

use futures::future::try_join_all;
use shadergraph::port::DataType;
use shadergraph::{PropertyDescriptor, ValueData};
use std::path::{Path, PathBuf};

/// A decoded texture ready for upload
#[derive(Debug, Clone)]
pub struct LoadedTexture {
    /// Property the texture is bound to
    pub name: String,
    /// Resolved file path
    pub path: PathBuf,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA8 pixels
    pub pixels: Vec<u8>,
}

/// Errors that can occur while loading textures
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The property value is not a location
    #[error("Texture property '{0}' has no location")]
    UnknownValue(String),

    /// Reading the file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not a decodable image
    #[error("Failed to decode {path}: {source}")]
    Decode {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: image::ImageError,
    },
}

/// Result type for texture loading
pub type Result<T> = std::result::Result<T, TextureError>;

/// Resolve a texture location against the material's directory
pub fn resolve_location(location: &str, base: &Path) -> PathBuf {
    let location = location.strip_prefix("file://").unwrap_or(location);
    let path = Path::new(location);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Load every texture property concurrently. The first failure aborts the
/// whole set.
pub async fn load_textures(properties: &[PropertyDescriptor], base: &Path) -> Result<Vec<LoadedTexture>> {
    let loads = properties
        .iter()
        .filter(|p| p.data_type == DataType::Texture2D)
        .map(|p| load_texture(p, base));

    try_join_all(loads).await
}

async fn load_texture(property: &PropertyDescriptor, base: &Path) -> Result<LoadedTexture> {
    let ValueData::Text(location) = &property.value else {
        return Err(TextureError::UnknownValue(property.name.clone()));
    };

    let path = resolve_location(location, base);
    let data = tokio::fs::read(&path).await.map_err(|source| TextureError::Io {
        path: path.clone(),
        source,
    })?;

    let image = image::load_from_memory(&data).map_err(|source| TextureError::Decode {
        path: path.clone(),
        source,
    })?;

    let rgba = image.to_rgba8();
    tracing::debug!(
        "Loaded texture '{}' from {} ({}x{})",
        property.name,
        path.display(),
        rgba.width(),
        rgba.height()
    );

    Ok(LoadedTexture {
        name: property.name.clone(),
        path,
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture_property(name: &str, location: &str) -> PropertyDescriptor {
        PropertyDescriptor {
            name: name.to_string(),
            data_type: DataType::Texture2D,
            value: ValueData::Text(location.to_string()),
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shadergraph-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resolve_location() {
        let base = Path::new("/materials");
        assert_eq!(resolve_location("albedo.png", base), PathBuf::from("/materials/albedo.png"));
        assert_eq!(
            resolve_location("file://textures/albedo.png", base),
            PathBuf::from("/materials/textures/albedo.png")
        );
        assert_eq!(resolve_location("/abs/albedo.png", base), PathBuf::from("/abs/albedo.png"));
    }

    #[tokio::test]
    async fn test_loads_images_and_skips_other_properties() {
        let dir = scratch_dir("load");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
            .save(dir.join("red.png"))
            .unwrap();

        let properties = vec![
            texture_property("albedo", "red.png"),
            PropertyDescriptor {
                name: "strength".into(),
                data_type: DataType::Float,
                value: ValueData::Number(1.0),
            },
        ];

        let textures = load_textures(&properties, &dir).await.unwrap();
        assert_eq!(textures.len(), 1);
        assert_eq!((textures[0].width, textures[0].height), (4, 2));
        assert_eq!(textures[0].pixels.len(), 4 * 2 * 4);
        assert_eq!(&textures[0].pixels[..4], &[255, 0, 0, 255]);
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let dir = scratch_dir("missing");
        let properties = vec![texture_property("albedo", "nope.png")];

        let result = load_textures(&properties, &dir).await;
        assert!(matches!(result, Err(TextureError::Io { .. })));
    }

    #[tokio::test]
    async fn test_non_text_value_fails() {
        let properties = vec![PropertyDescriptor {
            name: "albedo".into(),
            data_type: DataType::Texture2D,
            value: ValueData::Number(3.0),
        }];

        let result = load_textures(&properties, Path::new(".")).await;
        assert!(matches!(result, Err(TextureError::UnknownValue(name)) if name == "albedo"));
    }
}
