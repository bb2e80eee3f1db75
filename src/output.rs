// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/output.rs - 输出定义
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

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  display::{self, DisplayResult},
  input::LeafFrame,
  postprocess::Prediction,
};

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
}

mod json_file;
mod stdout;
pub use self::json_file::{JsonFileOutput, JsonFileOutputError};
pub use self::stdout::StdoutOutput;

#[cfg(feature = "directory_record")]
mod directory_record;
#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

/// 单张图像的分类记录
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord<'a> {
  pub image: &'a str,
  pub class_id: usize,
  pub label: &'a str,
  pub confidence_percent: f32,
  pub display: DisplayResult,
  pub timestamp: DateTime<Utc>,
}

impl<'a> PredictionRecord<'a> {
  pub fn new(frame: &'a LeafFrame, prediction: &'a Prediction) -> Self {
    Self {
      image: &frame.name,
      class_id: prediction.class_id,
      label: &prediction.label,
      confidence_percent: prediction.confidence_percent,
      display: display::format(prediction),
      timestamp: Utc::now(),
    }
  }
}

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("JSON 文件输出错误: {0}")]
  JsonFileOutputError(#[from] JsonFileOutputError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  Stdout(StdoutOutput),
  JsonFile(JsonFileOutput),
  #[cfg(feature = "directory_record")]
  DirectoryRecord(DirectoryRecordOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      StdoutOutput::SCHEME => Ok(OutputWrapper::Stdout(StdoutOutput)),
      JsonFileOutput::SCHEME => {
        let output = JsonFileOutput::from_url(url)?;
        Ok(OutputWrapper::JsonFile(output))
      }
      #[cfg(feature = "directory_record")]
      DirectoryRecordOutput::SCHEME => {
        let output = DirectoryRecordOutput::from_url(url)?;
        Ok(OutputWrapper::DirectoryRecord(output))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Render<LeafFrame, Prediction> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &LeafFrame, result: &Prediction) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::Stdout(output) => output
        .render_result(frame, result)
        .map_err(|never| match never {}),
      OutputWrapper::JsonFile(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecord(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::frame::DecodedImage;

  #[test]
  fn dispatches_by_scheme() {
    let url = Url::parse("stdout://").unwrap();
    assert!(matches!(
      OutputWrapper::from_url(&url),
      Ok(OutputWrapper::Stdout(_))
    ));

    let url = Url::parse("json:///tmp/result.json").unwrap();
    assert!(matches!(
      OutputWrapper::from_url(&url),
      Ok(OutputWrapper::JsonFile(_))
    ));

    let url = Url::parse("rtsp://camera/stream").unwrap();
    assert!(matches!(
      OutputWrapper::from_url(&url),
      Err(OutputError::SchemeMismatch)
    ));
  }

  #[test]
  fn record_carries_structured_and_display_values() {
    let frame = LeafFrame {
      name: "leaf.jpg".to_string(),
      image: DecodedImage::from_rgb_pixel(1, 1, [0, 0, 0]).unwrap(),
    };
    let prediction = Prediction {
      class_id: 7,
      label: "Tomato–Late Blight".to_string(),
      confidence_percent: 88.123,
    };
    let record = PredictionRecord::new(&frame, &prediction);
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["image"], "leaf.jpg");
    assert_eq!(value["class_id"], 7);
    assert_eq!(value["label"], "Tomato–Late Blight");
    assert_eq!(value["display"]["confidence"], "88.12% precision");
  }
}
