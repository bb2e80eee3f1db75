// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/display.rs - 结果格式化
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

use serde::Serialize;

use crate::postprocess::Prediction;

pub const CONFIDENCE_SUFFIX: &str = "precision";

/// 面向展示的结果，直接由 [`Prediction`] 生成
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayResult {
  pub label: String,
  pub confidence: String,
}

pub fn format(prediction: &Prediction) -> DisplayResult {
  DisplayResult {
    label: prediction.label.clone(),
    confidence: format!(
      "{:.2}% {}",
      prediction.confidence_percent, CONFIDENCE_SUFFIX
    ),
  }
}

impl std::fmt::Display for DisplayResult {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({})", self.label, self.confidence)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn prediction(label: &str, confidence_percent: f32) -> Prediction {
    Prediction {
      class_id: 0,
      label: label.to_string(),
      confidence_percent,
    }
  }

  #[test]
  fn label_is_verbatim() {
    let shown = format(&prediction("Tomato–Leaf Mold", 50.0));
    assert_eq!(shown.label, "Tomato–Leaf Mold");
  }

  #[test]
  fn confidence_has_two_decimals_and_suffix() {
    assert_eq!(
      format(&prediction("x", 12.3456)).confidence,
      "12.35% precision"
    );
    assert_eq!(
      format(&prediction("x", 100.0)).confidence,
      "100.00% precision"
    );
    assert_eq!(format(&prediction("x", 0.0)).confidence, "0.00% precision");
  }

  #[test]
  fn display_joins_label_and_confidence() {
    let shown = format(&prediction("Potato–Healthy", 99.5));
    assert_eq!(shown.to_string(), "Potato–Healthy (99.50% precision)");
  }
}
