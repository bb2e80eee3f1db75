// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/classifier.rs - 分类管线入口
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

use tracing::debug;

use crate::{
  error::ClassifyError,
  frame::DecodedImage,
  infer::infer,
  input::LeafFrame,
  label::LabelTable,
  model::{Model, ModelHandle, ModelSession, ModelSource, ModelStatus, TractSession},
  postprocess::{Prediction, postprocess, top_k},
  preprocess::preprocess,
};

/// 预处理 → 推理 → 后处理，每次调用相互独立，只共享只读的模型句柄
pub struct Classifier<S> {
  model: ModelHandle<S>,
  labels: LabelTable,
}

impl<S: ModelSession> Classifier<S> {
  pub fn new(model: ModelHandle<S>) -> Self {
    Self::with_labels(model, LabelTable::plant_village())
  }

  pub fn with_labels(model: ModelHandle<S>, labels: LabelTable) -> Self {
    Self { model, labels }
  }

  pub fn model(&self) -> &ModelHandle<S> {
    &self.model
  }

  pub fn labels(&self) -> &LabelTable {
    &self.labels
  }

  pub fn classify(&self, image: &DecodedImage) -> Result<Prediction, ClassifyError> {
    let logits = self.forward(image)?;
    postprocess(&logits, &self.labels)
  }

  /// 概率最高的 `k` 个类别
  pub fn classify_top_k(
    &self,
    image: &DecodedImage,
    k: usize,
  ) -> Result<Vec<Prediction>, ClassifyError> {
    let logits = self.forward(image)?;
    top_k(&logits, &self.labels, k)
  }

  fn forward(&self, image: &DecodedImage) -> Result<Box<[f32]>, ClassifyError> {
    // 未就绪时不做预处理
    let status = self.model.status();
    if status != ModelStatus::Ready {
      return Err(ClassifyError::ModelNotReady(status));
    }

    let now = std::time::Instant::now();
    let tensor = preprocess(image);
    debug!("预处理完成，耗时: {:.2?}", now.elapsed());
    infer(&self.model, &tensor)
  }
}

impl Classifier<TractSession> {
  /// 读取并加载 ONNX 模型，返回已就绪的分类器
  pub fn load_onnx<Src: ModelSource + ?Sized>(source: &Src) -> Result<Self, ClassifyError> {
    let model = ModelHandle::new();
    model.load_onnx(source)?;
    Ok(Self::new(model))
  }
}

impl<S: ModelSession> Model for Classifier<S> {
  type Input = LeafFrame;
  type Output = Prediction;
  type Error = ClassifyError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    self.classify(&input.image)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::Ordering;

  use super::*;
  use crate::model::{BytesModelSource, testing::FixedLogits};

  fn ready(session: FixedLogits) -> Classifier<FixedLogits> {
    let model = ModelHandle::new();
    model
      .load(&BytesModelSource::new(vec![0u8]), move |_| Ok(session))
      .unwrap();
    Classifier::new(model)
  }

  #[test]
  fn classify_runs_exactly_one_forward_pass() {
    let classifier = ready(FixedLogits::dominant(6));
    let image = DecodedImage::from_rgb_pixel(32, 48, [90, 160, 40]).unwrap();
    let prediction = classifier.classify(&image).unwrap();
    assert_eq!(prediction.label, "Tomato–Early Blight");
    let session = classifier.model().session().unwrap();
    assert_eq!(session.calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn model_trait_classifies_frames() {
    let classifier = ready(FixedLogits::dominant(14));
    let frame = LeafFrame {
      name: "leaf.png".to_string(),
      image: DecodedImage::from_rgb_pixel(8, 8, [0, 255, 0]).unwrap(),
    };
    let prediction = Model::infer(&classifier, &frame).unwrap();
    assert_eq!(prediction.class_id, 14);
  }

  #[test]
  fn top_k_returns_ranked_predictions() {
    let classifier = ready(FixedLogits::dominant(2));
    let image = DecodedImage::from_rgb_pixel(4, 4, [0, 0, 0]).unwrap();
    let top = classifier.classify_top_k(&image, 2).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].class_id, 2);
    assert_eq!(top[1].class_id, 0);
  }

  #[test]
  fn unloaded_model_is_rejected() {
    let classifier = Classifier::new(ModelHandle::<FixedLogits>::new());
    let image = DecodedImage::from_rgb_pixel(4, 4, [0, 0, 0]).unwrap();
    assert!(matches!(
      classifier.classify(&image),
      Err(ClassifyError::ModelNotReady(ModelStatus::Unloaded))
    ));
  }
}
