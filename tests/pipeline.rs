// 该文件是 Yejian （叶鉴） 项目的一部分。
// tests/pipeline.rs - 分类流水线集成测试
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

use std::sync::{Arc, Mutex};
use std::thread;

use yejian::{
  Classifier, ClassifyError, DecodedImage, display,
  label::PLANT_DISEASE_CLASS_NUM,
  model::{BytesModelSource, ModelHandle, ModelSession, ModelStatus},
};

/// 返回固定 logits，并记下最后一次收到的输入
struct Scripted {
  shape: Vec<usize>,
  logits: Vec<f32>,
  last_input: Mutex<Vec<f32>>,
}

impl Scripted {
  fn new(logits: Vec<f32>) -> Self {
    Self::with_shape(vec![1, 3, 128, 128], logits)
  }

  fn with_shape(shape: Vec<usize>, logits: Vec<f32>) -> Self {
    Self {
      shape,
      logits,
      last_input: Mutex::new(Vec::new()),
    }
  }
}

impl ModelSession for Scripted {
  type Error = String;

  fn input_shape(&self) -> &[usize] {
    &self.shape
  }

  fn run(&self, input: &[f32]) -> Result<Vec<f32>, String> {
    *self.last_input.lock().unwrap() = input.to_vec();
    Ok(self.logits.clone())
  }
}

fn one_hot(index: usize) -> Vec<f32> {
  let mut logits = vec![0.0; PLANT_DISEASE_CLASS_NUM];
  logits[index] = 10.0;
  logits
}

fn ready(session: Scripted) -> Classifier<Scripted> {
  let model = ModelHandle::new();
  model
    .load(&BytesModelSource::new(b"model".to_vec()), move |_| Ok(session))
    .unwrap();
  Classifier::new(model)
}

#[test]
fn black_image_normalizes_to_minus_one() {
  let classifier = ready(Scripted::new(one_hot(3)));
  let image = DecodedImage::from_rgb_pixel(64, 64, [0, 0, 0]).unwrap();
  let prediction = classifier.classify(&image).unwrap();
  assert!(prediction.class_id < PLANT_DISEASE_CLASS_NUM);

  let session = classifier.model().session().unwrap();
  let input = session.last_input.lock().unwrap();
  assert_eq!(input.len(), 3 * 128 * 128);
  assert!(input.iter().all(|v| *v == -1.0));
}

#[test]
fn dominant_logit_reports_first_label() {
  let classifier = ready(Scripted::new(one_hot(0)));
  let image = DecodedImage::from_rgb_pixel(300, 200, [120, 180, 60]).unwrap();
  let prediction = classifier.classify(&image).unwrap();
  assert_eq!(prediction.label, "Bell Pepper–Bacterial Spot");
  // e^10 / (e^10 + 14) ≈ 0.99936
  assert!((prediction.confidence_percent - 99.936).abs() < 0.01);
  assert_eq!(
    display::format(&prediction).confidence,
    "99.94% precision"
  );
}

#[test]
fn ties_resolve_to_lowest_index() {
  let mut logits = vec![0.0; PLANT_DISEASE_CLASS_NUM];
  logits[4] = 3.0;
  logits[9] = 3.0;
  let classifier = ready(Scripted::new(logits));
  let image = DecodedImage::from_rgb_pixel(16, 16, [1, 2, 3]).unwrap();
  assert_eq!(classifier.classify(&image).unwrap().class_id, 4);
}

#[test]
fn rgba_input_is_accepted() {
  let classifier = ready(Scripted::new(one_hot(12)));
  let pixels: Vec<u8> = [255u8, 255, 255, 0].repeat(10 * 6);
  let image = DecodedImage::new(10, 6, 4, pixels).unwrap();
  assert_eq!(classifier.classify(&image).unwrap().class_id, 12);

  let session = classifier.model().session().unwrap();
  let input = session.last_input.lock().unwrap();
  assert!(input.iter().all(|v| *v == 1.0));
}

#[test]
fn unloaded_model_is_not_ready() {
  let classifier: Classifier<Scripted> = Classifier::new(ModelHandle::new());
  let image = DecodedImage::from_rgb_pixel(8, 8, [0, 0, 0]).unwrap();
  let err = classifier.classify(&image).unwrap_err();
  assert!(matches!(
    err,
    ClassifyError::ModelNotReady(ModelStatus::Unloaded)
  ));
  assert!(err.is_recoverable());
}

#[test]
fn wrong_model_shape_is_reported() {
  let classifier = ready(Scripted::with_shape(vec![1, 3, 224, 224], one_hot(0)));
  let image = DecodedImage::from_rgb_pixel(8, 8, [0, 0, 0]).unwrap();
  match classifier.classify(&image) {
    Err(ClassifyError::ShapeMismatch { expected, actual }) => {
      assert_eq!(expected, vec![1, 3, 224, 224]);
      assert_eq!(actual, vec![1, 3, 128, 128]);
    }
    other => panic!("unexpected result: {:?}", other),
  }
}

#[test]
fn short_logit_vector_is_unknown_class() {
  let mut logits = vec![0.0; PLANT_DISEASE_CLASS_NUM + 2];
  logits[16] = 9.0;
  let classifier = ready(Scripted::new(logits));
  let image = DecodedImage::from_rgb_pixel(8, 8, [0, 0, 0]).unwrap();
  assert!(matches!(
    classifier.classify(&image),
    Err(ClassifyError::UnknownClass { index: 16, len: 15 })
  ));
}

#[test]
fn concurrent_classification_shares_one_model() {
  let classifier = Arc::new(ready(Scripted::new(one_hot(11))));
  let workers: Vec<_> = (0..4u8)
    .map(|i| {
      let classifier = Arc::clone(&classifier);
      thread::spawn(move || {
        let image = DecodedImage::from_rgb_pixel(20 + i as u32, 20, [i, i, i]).unwrap();
        classifier.classify(&image).unwrap()
      })
    })
    .collect();
  for worker in workers {
    assert_eq!(worker.join().unwrap().class_id, 11);
  }
}
