// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/postprocess.rs - 后处理
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
use tracing::{debug, error, warn};

use crate::{error::ClassifyError, label::LabelTable};

/// Top-1 预测结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
  pub class_id: usize,
  pub label: String,
  /// 取值范围 [0, 100]
  pub confidence_percent: f32,
}

/// 数值稳定的 softmax：先减去最大值再取指数
pub fn softmax(logits: &[f32]) -> Vec<f32> {
  let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
  let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
  let sum: f32 = exps.iter().sum();
  exps.into_iter().map(|e| e / sum).collect()
}

/// 最大值下标，相等时取靠前的一个
pub fn argmax(values: &[f32]) -> Option<usize> {
  let mut best: Option<(usize, f32)> = None;
  for (i, &v) in values.iter().enumerate() {
    match best {
      Some((_, b)) if v <= b => {}
      _ => best = Some((i, v)),
    }
  }
  best.map(|(i, _)| i)
}

fn check_logits(logits: &[f32], labels: &LabelTable) -> Result<(), ClassifyError> {
  if logits.len() != labels.len() {
    warn!(
      "模型输出长度 {} 与标签表大小 {} 不一致",
      logits.len(),
      labels.len()
    );
  }
  if logits.is_empty() {
    return Err(ClassifyError::Inference("logits 为空".to_string()));
  }
  if let Some(i) = logits.iter().position(|l| !l.is_finite()) {
    error!("第 {} 个 logit 不是有限值: {}", i, logits[i]);
    return Err(ClassifyError::Inference(format!(
      "第 {} 个 logit 不是有限值",
      i
    )));
  }
  Ok(())
}

fn to_prediction(
  index: usize,
  probability: f32,
  labels: &LabelTable,
) -> Result<Prediction, ClassifyError> {
  let label = labels.get(index).ok_or_else(|| {
    error!("类别下标 {} 超出标签表范围 {}", index, labels.len());
    ClassifyError::UnknownClass {
      index,
      len: labels.len(),
    }
  })?;

  Ok(Prediction {
    class_id: index,
    label: label.to_string(),
    confidence_percent: (probability * 100.0).clamp(0.0, 100.0),
  })
}

/// logits → 概率分布 → Top-1
pub fn postprocess(logits: &[f32], labels: &LabelTable) -> Result<Prediction, ClassifyError> {
  check_logits(logits, labels)?;
  let probabilities = softmax(logits);
  let index = argmax(&probabilities).ok_or(ClassifyError::UnknownClass {
    index: 0,
    len: labels.len(),
  })?;

  let prediction = to_prediction(index, probabilities[index], labels)?;
  debug!(
    "预测结果: {} ({:.2}%)",
    prediction.label, prediction.confidence_percent
  );
  Ok(prediction)
}

/// 概率最高的 `k` 个类别，按概率降序，概率相等时下标小的在前
pub fn top_k(
  logits: &[f32],
  labels: &LabelTable,
  k: usize,
) -> Result<Vec<Prediction>, ClassifyError> {
  check_logits(logits, labels)?;
  let probabilities = softmax(logits);

  let mut order: Vec<usize> = (0..probabilities.len()).collect();
  // 稳定排序保证相等概率按下标顺序
  order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));

  order
    .into_iter()
    .take(k)
    .map(|i| to_prediction(i, probabilities[i], labels))
    .collect()
}
