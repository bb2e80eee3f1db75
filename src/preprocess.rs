// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/preprocess.rs - 图像预处理
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

//! 将任意尺寸的解码图像转换为模型输入张量。
//!
//! 流程固定为：双线性缩放到 S×S（拉伸，不保持宽高比）→ 取 RGB 三通道 →
//! `v / 255` → `(v - 0.5) / 0.5` → 按 R、G、B 平面依次写入 NCHW 缓冲区。
//!
//! 缩放核是与训练管线绑定的常量：`image` 的三角滤波（双线性），
//! 缩小时按比例扩展支撑，结果先舍入回 8 位再做归一化。

use image::{
  RgbImage,
  imageops::{self, FilterType},
};
use tracing::trace;

use crate::frame::{DecodedImage, InputTensor, MODEL_INPUT_SIDE, NchwTensor, RGB_CHANNELS};

pub const PIXEL_MAX: f32 = 255.0;
pub const NORMALIZE_MEAN: [f32; 3] = [0.5, 0.5, 0.5];
pub const NORMALIZE_STD: [f32; 3] = [0.5, 0.5, 0.5];
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// 预处理为模型输入张量 [1, 3, 128, 128]
pub fn preprocess(image: &DecodedImage) -> InputTensor {
  preprocess_to::<MODEL_INPUT_SIDE, MODEL_INPUT_SIDE>(image)
}

/// 预处理为任意边长的 NCHW 张量
pub fn preprocess_to<const W: u32, const H: u32>(image: &DecodedImage) -> NchwTensor<W, H> {
  trace!(
    "预处理图像: {}x{}x{} -> {}x{}",
    image.width(),
    image.height(),
    image.channels(),
    W,
    H
  );
  let resized = resize_bilinear(image, W, H);

  let mut tensor = NchwTensor::<W, H>::default();
  let plane = tensor.plane_len();
  let slice = tensor.as_mut();

  for (x, y, pixel) in resized.enumerate_pixels() {
    let index = (y as usize) * (W as usize) + (x as usize);
    for c in 0..RGB_CHANNELS {
      slice[c * plane + index] = normalize_channel(pixel[c], c);
    }
  }

  tensor
}

#[inline]
fn normalize_channel(value: u8, channel: usize) -> f32 {
  let v = value as f32 / PIXEL_MAX;
  (v - NORMALIZE_MEAN[channel]) / NORMALIZE_STD[channel]
}

/// 三角（双线性）滤波缩放到 `width`×`height`，忽略 alpha，输出 8 位 RGB 图像。
///
/// 缩小时滤波支撑随比例展开，所有源像素都参与加权。
pub fn resize_bilinear(image: &DecodedImage, width: u32, height: u32) -> RgbImage {
  let rgb = image.to_rgb_image();
  imageops::resize(&rgb, width, height, RESIZE_FILTER)
}
