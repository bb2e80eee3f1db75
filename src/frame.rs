// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/frame.rs - 解码图像与 NCHW 张量定义
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::{DynamicImage, Rgb, RgbImage};
use thiserror::Error;

pub const RGB_CHANNELS: usize = 3;
pub const RGBA_CHANNELS: usize = 4;

/// 模型输入边长
pub const MODEL_INPUT_SIDE: u32 = 128;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
  #[error("图像尺寸无效: {width}x{height}")]
  InvalidSize { width: u32, height: u32 },
  #[error("不支持的通道数: {0}")]
  UnsupportedChannels(usize),
  #[error("数据长度不匹配: 期望长度 {expected}, 实际长度 {actual}")]
  LengthMismatch { expected: usize, actual: usize },
}

/// 已解码的图像，每个通道 8 位，行优先，原点在左上角。
///
/// 通道数为 3 (RGB) 或 4 (RGBA)，构造时即保证
/// `data.len() == width * height * channels`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
  width: u32,
  height: u32,
  channels: usize,
  data: Box<[u8]>,
}

impl DecodedImage {
  pub fn new(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self, ImageError> {
    if width == 0 || height == 0 {
      return Err(ImageError::InvalidSize { width, height });
    }
    if channels != RGB_CHANNELS && channels != RGBA_CHANNELS {
      return Err(ImageError::UnsupportedChannels(channels));
    }

    let expected = (width as usize)
      .checked_mul(height as usize)
      .and_then(|n| n.checked_mul(channels))
      .ok_or(ImageError::InvalidSize { width, height })?;
    if data.len() != expected {
      return Err(ImageError::LengthMismatch {
        expected,
        actual: data.len(),
      });
    }

    Ok(Self {
      width,
      height,
      channels,
      data: data.into_boxed_slice(),
    })
  }

  /// 构造纯色 RGB 图像
  pub fn from_rgb_pixel(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, ImageError> {
    let pixels = (width as usize).saturating_mul(height as usize);
    let data = rgb
      .iter()
      .copied()
      .cycle()
      .take(pixels.saturating_mul(RGB_CHANNELS))
      .collect();
    Self::new(width, height, RGB_CHANNELS, data)
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn channels(&self) -> usize {
    self.channels
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.data
  }

  /// 读取 (x, y) 处的 RGB 值，忽略 alpha 通道
  #[inline]
  pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
    let index = ((y as usize) * (self.width as usize) + (x as usize)) * self.channels;
    [self.data[index], self.data[index + 1], self.data[index + 2]]
  }

  /// 复制为 8 位 RGB 图像，丢弃 alpha 通道
  pub fn to_rgb_image(&self) -> RgbImage {
    RgbImage::from_fn(self.width, self.height, |x, y| Rgb(self.rgb_at(x, y)))
  }
}

impl TryFrom<DynamicImage> for DecodedImage {
  type Error = ImageError;

  fn try_from(image: DynamicImage) -> Result<Self, Self::Error> {
    let (width, height) = (image.width(), image.height());
    if image.color().has_alpha() {
      Self::new(width, height, RGBA_CHANNELS, image.into_rgba8().into_raw())
    } else {
      Self::new(width, height, RGB_CHANNELS, image.into_rgb8().into_raw())
    }
  }
}

/// 通道优先 (NCHW) 的 f32 张量，批大小固定为 1。
#[derive(Debug, Clone, PartialEq)]
pub struct NchwTensor<const W: u32, const H: u32> {
  data: Box<[f32]>,
}

/// 模型输入张量，形状 [1, 3, 128, 128]
pub type InputTensor = NchwTensor<MODEL_INPUT_SIDE, MODEL_INPUT_SIDE>;

impl<const W: u32, const H: u32> TryFrom<Vec<f32>> for NchwTensor<W, H> {
  type Error = ImageError;

  fn try_from(data: Vec<f32>) -> Result<Self, Self::Error> {
    let expected = RGB_CHANNELS * W as usize * H as usize;
    if data.len() != expected {
      return Err(ImageError::LengthMismatch {
        expected,
        actual: data.len(),
      });
    }

    Ok(Self {
      data: data.into_boxed_slice(),
    })
  }
}

impl<const W: u32, const H: u32> Default for NchwTensor<W, H> {
  fn default() -> Self {
    let size = RGB_CHANNELS * (W as usize) * (H as usize);
    let data = vec![0f32; size].into_boxed_slice();
    Self { data }
  }
}

impl<const W: u32, const H: u32> NchwTensor<W, H> {
  pub fn height(&self) -> usize {
    H as usize
  }

  pub fn width(&self) -> usize {
    W as usize
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }

  /// 逻辑形状 [N, C, H, W]
  pub fn shape(&self) -> [usize; 4] {
    [1, RGB_CHANNELS, H as usize, W as usize]
  }

  pub fn plane_len(&self) -> usize {
    (W as usize) * (H as usize)
  }

  /// 第 `channel` 个颜色平面
  pub fn plane(&self, channel: usize) -> &[f32] {
    let len = self.plane_len();
    &self.data[channel * len..(channel + 1) * len]
  }

  pub fn as_nchw(&self) -> &[f32] {
    &self.data
  }
}

impl<const W: u32, const H: u32> AsMut<[f32]> for NchwTensor<W, H> {
  fn as_mut(&mut self) -> &mut [f32] {
    &mut self.data
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage, Rgba, RgbaImage};

  #[test]
  fn rejects_empty_dimensions() {
    assert_eq!(
      DecodedImage::new(0, 4, 3, vec![]),
      Err(ImageError::InvalidSize {
        width: 0,
        height: 4
      })
    );
  }

  #[test]
  fn rejects_unsupported_channel_count() {
    assert_eq!(
      DecodedImage::new(1, 1, 1, vec![0]),
      Err(ImageError::UnsupportedChannels(1))
    );
  }

  #[test]
  fn rejects_buffer_length_mismatch() {
    assert_eq!(
      DecodedImage::new(2, 2, 3, vec![0; 11]),
      Err(ImageError::LengthMismatch {
        expected: 12,
        actual: 11
      })
    );
  }

  #[test]
  fn rgb_image_copy_drops_alpha() {
    let image = DecodedImage::new(2, 1, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    let rgb = image.to_rgb_image();
    assert_eq!(rgb.dimensions(), (2, 1));
    assert_eq!(rgb.get_pixel(0, 0).0, [1, 2, 3]);
    assert_eq!(rgb.get_pixel(1, 0).0, [5, 6, 7]);
  }

  #[test]
  fn rgb_at_skips_alpha() {
    let image = DecodedImage::new(2, 1, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(image.rgb_at(0, 0), [1, 2, 3]);
    assert_eq!(image.rgb_at(1, 0), [5, 6, 7]);
  }

  #[test]
  fn dynamic_image_keeps_alpha_channel() {
    let rgba = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 40]));
    let decoded = DecodedImage::try_from(DynamicImage::ImageRgba8(rgba)).unwrap();
    assert_eq!(decoded.channels(), 4);
    assert_eq!(decoded.as_bytes().len(), 3 * 2 * 4);

    let rgb = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
    let decoded = DecodedImage::try_from(DynamicImage::ImageRgb8(rgb)).unwrap();
    assert_eq!(decoded.channels(), 3);
    assert_eq!(decoded.rgb_at(2, 1), [10, 20, 30]);
  }

  #[test]
  fn solid_pixel_image_is_uniform() {
    let image = DecodedImage::from_rgb_pixel(5, 3, [7, 8, 9]).unwrap();
    assert_eq!(image.as_bytes().len(), 45);
    assert_eq!(image.rgb_at(4, 2), [7, 8, 9]);
  }

  #[test]
  fn tensor_shape_and_planes() {
    let tensor = InputTensor::default();
    assert_eq!(tensor.shape(), [1, 3, 128, 128]);
    assert_eq!(tensor.as_nchw().len(), 3 * 128 * 128);
    assert_eq!(tensor.plane(2).len(), 128 * 128);
  }

  #[test]
  fn tensor_from_vec_checks_length() {
    assert!(NchwTensor::<2, 2>::try_from(vec![0.0; 12]).is_ok());
    assert_eq!(
      NchwTensor::<2, 2>::try_from(vec![0.0; 4]),
      Err(ImageError::LengthMismatch {
        expected: 12,
        actual: 4
      })
    );
  }
}
