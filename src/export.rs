use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, ImageFormat, ImageResult, Luma, RgbImage};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ControlError;
use crate::traits::Observations;

pub const PREVIEW_JPEG_QUALITY: u8 = 85;
pub const FRAME_JPEG_QUALITY: u8 = 75;

pub type DepthImage = ImageBuffer<Luma<u16>, Vec<u16>>;

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(image)?;
    Ok(bytes)
}

/// JPEG preview embedded as a data URI
pub fn encode_preview(image: &RgbImage) -> ImageResult<String> {
    let jpeg = encode_jpeg(image, PREVIEW_JPEG_QUALITY)?;
    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(jpeg)))
}

/// Scale metric depth and truncate to u16. Out-of-range values saturate.
pub fn quantize_depth(depth: &[f32], scale: f64) -> Vec<u16> {
    let scale = scale as f32;
    depth.iter().map(|&d| (d * scale) as u16).collect()
}

/// Paths written for one saved frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFrame {
    pub color: PathBuf,
    pub depth: PathBuf,
}

/// Writes color/depth frame pairs named by zero-padded frame index
#[derive(Debug, Clone)]
pub struct FrameExporter {
    dir: PathBuf,
    depth_scale: f64,
}

impl FrameExporter {
    pub fn new(dir: impl Into<PathBuf>, depth_scale: f64) -> Self {
        Self {
            dir: dir.into(),
            depth_scale,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn color_path(&self, frame_index: u64) -> PathBuf {
        self.dir.join(format!("frame{:06}.jpg", frame_index))
    }

    pub fn depth_path(&self, frame_index: u64) -> PathBuf {
        self.dir.join(format!("depth{:06}.png", frame_index))
    }

    pub fn save(&self, frame_index: u64, obs: &Observations) -> Result<SavedFrame, ControlError> {
        fs::create_dir_all(&self.dir).map_err(ControlError::persist(&self.dir))?;

        let color = self.color_path(frame_index);
        let jpeg = encode_jpeg(&obs.color, FRAME_JPEG_QUALITY)?;
        fs::write(&color, jpeg).map_err(ControlError::persist(&color))?;

        let depth = self.depth_path(frame_index);
        let depth_image = DepthImage::from_raw(
            obs.width(),
            obs.height(),
            quantize_depth(&obs.depth, self.depth_scale),
        )
        .ok_or_else(|| {
            ControlError::Render(anyhow::anyhow!(
                "depth buffer has {} values, expected {}x{}",
                obs.depth.len(),
                obs.width(),
                obs.height()
            ))
        })?;
        depth_image.save_with_format(&depth, ImageFormat::Png)?;

        debug!("Saved frame {} to {:?} and {:?}", frame_index, color, depth);
        Ok(SavedFrame { color, depth })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn observations(w: u32, h: u32, depth: f32) -> Observations {
        Observations {
            color: RgbImage::from_pixel(w, h, Rgb([10, 200, 30])),
            depth: vec![depth; (w * h) as usize],
        }
    }

    #[test]
    fn test_frame_names_are_zero_padded() {
        let exporter = FrameExporter::new("out", 1000.0);
        assert_eq!(exporter.color_path(7), Path::new("out/frame000007.jpg"));
        assert_eq!(exporter.depth_path(123456), Path::new("out/depth123456.png"));
    }

    #[test]
    fn test_quantize_depth_truncates() {
        assert_eq!(quantize_depth(&[0.0, 1.0, 0.5], 6553.5), vec![0, 6553, 3276]);
    }

    #[test]
    fn test_quantize_depth_saturates() {
        assert_eq!(quantize_depth(&[100.0, -1.0, f32::NAN], 6553.5), vec![u16::MAX, 0, 0]);
    }

    #[test]
    fn test_preview_is_jpeg_data_uri() {
        let uri = encode_preview(&RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]))).unwrap();
        let payload = uri.strip_prefix("data:image/jpeg;base64,").expect("prefix");
        let bytes = BASE64.decode(payload).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_save_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FrameExporter::new(dir.path().join("results"), 1000.0);

        let saved = exporter.save(3, &observations(6, 4, 2.5)).unwrap();
        assert!(saved.color.exists());
        assert!(saved.depth.exists());

        let depth = image::open(&saved.depth).unwrap().into_luma16();
        assert_eq!(depth.dimensions(), (6, 4));
        assert_eq!(depth.get_pixel(0, 0)[0], 2500);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_reports_full_disk() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FrameExporter::new(dir.path().join("results"), 1000.0);
        fs::create_dir_all(exporter.dir()).unwrap();
        std::os::unix::fs::symlink("/dev/full", exporter.color_path(1)).unwrap();

        let err = exporter.save(1, &observations(4, 4, 1.0)).unwrap_err();
        assert!(matches!(err, ControlError::Persist { .. }), "got {}", err);
        assert!(!exporter.depth_path(1).exists());
    }

    #[test]
    fn test_save_rejects_mismatched_depth() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FrameExporter::new(dir.path(), 1000.0);
        let mut obs = observations(4, 4, 1.0);
        obs.depth.pop();
        assert!(exporter.save(1, &obs).is_err());
    }
}
