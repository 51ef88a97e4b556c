use crate::engine::core::errors::{ProfileError, ProfileResult};
use bevy::asset::RenderAssetUsages;
use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use std::path::Path;

/// Decode a radargram into a single channel texture. Columns map to samples
/// along the track, rows to depth.
pub fn load_profile_image(path: &Path) -> ProfileResult<Image> {
    if !path.is_file() {
        return Err(ProfileError::FileNotFound(path.to_path_buf()));
    }

    let decoded = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(err) => ProfileError::from_io(path, err),
        source => ProfileError::ImageDecode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let luma = decoded.to_luma8();
    let size = Extent3d {
        width: luma.width(),
        height: luma.height(),
        depth_or_array_layers: 1,
    };

    let mut image = Image::new(
        size,
        TextureDimension::D2,
        luma.into_raw(),
        TextureFormat::R8Unorm,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::linear();
    Ok(image)
}

/// Warn when an image does not carry one column per sample.
pub fn check_image_columns(name: &str, image: &Image, sample_count: usize) -> bool {
    let width = image.width() as usize;
    if width != sample_count {
        warn!(
            "Profile {name}: image has {width} columns for {sample_count} samples, texture will stretch"
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_grey_tiff_to_r8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s_01_tiff.tif");
        image::GrayImage::from_fn(4, 3, |x, y| image::Luma([(x * 60 + y) as u8]))
            .save(&path)
            .unwrap();

        let image = load_profile_image(&path).unwrap();
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
        assert_eq!(image.texture_descriptor.format, TextureFormat::R8Unorm);
        assert!(check_image_columns("s_01", &image, 4));
        assert!(!check_image_columns("s_01", &image, 5));
    }

    #[test]
    fn missing_and_corrupt_images_fail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none_tiff.tif");
        assert!(matches!(
            load_profile_image(&missing),
            Err(ProfileError::FileNotFound(_))
        ));

        let corrupt = dir.path().join("bad_tiff.tif");
        std::fs::write(&corrupt, b"not a tiff").unwrap();
        assert!(matches!(
            load_profile_image(&corrupt),
            Err(ProfileError::ImageDecode { .. })
        ));
    }
}
