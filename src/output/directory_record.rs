// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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

use chrono::{Datelike, Utc};
use image::ExtendedColorType;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{DecodedImage, RGB_CHANNELS},
  input::LeafFrame,
  output::{PredictionRecord, Render},
  postprocess::Prediction,
  url_to_path,
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("目录路径无效: {0}")]
  InvalidPath(String),
  #[error("参数无效: {0}")]
  InvalidQuery(String),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 按日期分目录保存每张图像的分类记录。
///
/// `folder:///dir?image&min_confidence=60`：`image` 同时保存原图，
/// `min_confidence` 只记录置信度不低于阈值的结果。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  frame_counter: Mutex<u16>,
  save_image: bool,
  min_confidence: f32,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let directory =
      url_to_path(uri).ok_or_else(|| DirectoryRecordOutputError::InvalidPath(uri.to_string()))?;

    let save_image = uri.query_pairs().any(|(k, _)| k == "image");
    let mut min_confidence = 0.0;
    for (k, v) in uri.query_pairs() {
      if k == "min_confidence" {
        min_confidence = v
          .parse::<f32>()
          .map_err(|e| DirectoryRecordOutputError::InvalidQuery(format!("min_confidence={}: {}", v, e)))?;
      }
    }

    Ok(DirectoryRecordOutput {
      directory,
      frame_counter: Mutex::new(0),
      save_image,
      min_confidence,
    })
  }
}

impl DirectoryRecordOutput {
  fn frame_id(&self) -> u16 {
    let mut counter = self.frame_counter.lock().unwrap_or_else(PoisonError::into_inner);
    let id = counter.wrapping_add(1);
    *counter = id;
    id
  }

  fn frame_path(&self) -> Result<PathBuf, DirectoryRecordOutputError> {
    let now = Utc::now();
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    if !directory.exists() {
      std::fs::create_dir_all(&directory)?;
    }

    Ok(directory.join(format!(
      "{}-{:04X}",
      now.format("%H-%M-%S"),
      self.frame_id()
    )))
  }
}

fn save_decoded_image(image: &DecodedImage, path: &std::path::Path) -> Result<(), image::ImageError> {
  let color = if image.channels() == RGB_CHANNELS {
    ExtendedColorType::Rgb8
  } else {
    ExtendedColorType::Rgba8
  };
  image::save_buffer(path, image.as_bytes(), image.width(), image.height(), color)
}

impl Render<LeafFrame, Prediction> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, frame: &LeafFrame, result: &Prediction) -> Result<(), Self::Error> {
    if result.confidence_percent < self.min_confidence {
      debug!(
        "置信度 {:.2}% 低于阈值 {:.2}%, 不记录 {}",
        result.confidence_percent, self.min_confidence, frame.name
      );
      return Ok(());
    }

    let path = self.frame_path()?;
    let record = PredictionRecord::new(frame, result);
    std::fs::write(
      path.with_extension("json"),
      serde_json::to_string_pretty(&record)?,
    )?;
    if self.save_image {
      save_decoded_image(&frame.image, &path.with_extension("png"))?;
    }
    debug!("记录已保存: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use url::Url;

  fn files_under(dir: &std::path::Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
      for entry in std::fs::read_dir(d).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
          stack.push(path);
        } else {
          found.push(path);
        }
      }
    }
    found.sort();
    found
  }

  fn frame() -> LeafFrame {
    LeafFrame {
      name: "leaf.png".to_string(),
      image: DecodedImage::from_rgb_pixel(3, 2, [10, 200, 30]).unwrap(),
    }
  }

  fn prediction(confidence_percent: f32) -> Prediction {
    Prediction {
      class_id: 10,
      label: "Tomato–Spider Mites".to_string(),
      confidence_percent,
    }
  }

  #[test]
  fn writes_dated_json_and_image() {
    let dir = tempfile::tempdir().unwrap();
    let url = Url::parse(&format!("folder://{}?image", dir.path().display())).unwrap();
    let output = DirectoryRecordOutput::from_url(&url).unwrap();
    output.render_result(&frame(), &prediction(91.0)).unwrap();

    let files = files_under(dir.path());
    assert_eq!(files.len(), 2);
    let json = files.iter().find(|p| p.extension().unwrap() == "json").unwrap();
    let png = files.iter().find(|p| p.extension().unwrap() == "png").unwrap();

    // dir/YYYY/MM/DD/HH-MM-SS-0001.json
    let relative = json.strip_prefix(dir.path()).unwrap();
    assert_eq!(relative.components().count(), 4);
    assert!(json.file_stem().unwrap().to_string_lossy().ends_with("-0001"));

    let value: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
    assert_eq!(value["label"], "Tomato–Spider Mites");

    let saved = image::open(png).unwrap().to_rgb8();
    assert_eq!(saved.get_pixel(2, 1).0, [10, 200, 30]);
  }

  #[test]
  fn skips_results_below_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let url = Url::parse(&format!(
      "folder://{}?min_confidence=50",
      dir.path().display()
    ))
    .unwrap();
    let output = DirectoryRecordOutput::from_url(&url).unwrap();
    output.render_result(&frame(), &prediction(20.0)).unwrap();
    assert!(files_under(dir.path()).is_empty());

    output.render_result(&frame(), &prediction(75.0)).unwrap();
    assert_eq!(files_under(dir.path()).len(), 1);
  }

  #[test]
  fn rejects_bad_threshold() {
    let url = Url::parse("folder:///tmp/records?min_confidence=high").unwrap();
    assert!(matches!(
      DirectoryRecordOutput::from_url(&url),
      Err(DirectoryRecordOutputError::InvalidQuery(_))
    ));
  }
}
