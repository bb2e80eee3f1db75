// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/model/tract_session.rs - tract ONNX 推理会话
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

use tract_onnx::prelude::*;
use tracing::{debug, error, warn};

use super::{ModelLoadError, ModelSession};
use crate::frame::{MODEL_INPUT_SIDE, RGB_CHANNELS};

const CLASSIFIER_NUM_INPUTS: usize = 1;

pub struct TractSession {
  plan: TypedRunnableModel<TypedModel>,
  input_shape: Vec<usize>,
}

impl TractSession {
  /// 以 [1, 3, 128, 128] 的输入形状加载 ONNX 模型
  pub fn from_bytes(data: &[u8]) -> Result<Self, ModelLoadError> {
    Self::from_bytes_with_shape(
      data,
      &[
        1,
        RGB_CHANNELS,
        MODEL_INPUT_SIDE as usize,
        MODEL_INPUT_SIDE as usize,
      ],
    )
  }

  pub fn from_bytes_with_shape(data: &[u8], input_shape: &[usize]) -> Result<Self, ModelLoadError> {
    debug!("解析 ONNX 模型, 输入形状 {:?}", input_shape);
    let mut cursor = std::io::Cursor::new(data);
    let model = tract_onnx::onnx()
      .model_for_read(&mut cursor)
      .map_err(|e| ModelLoadError::invalid("无法解析 ONNX 模型", e))?;

    let num_inputs = model.inputs.len();
    let num_outputs = model.outputs.len();
    debug!("模型输入数量: {}", num_inputs);
    debug!("模型输出数量: {}", num_outputs);

    if num_inputs != CLASSIFIER_NUM_INPUTS {
      error!(
        "预期模型输入数量为 {}, 实际为 {}",
        CLASSIFIER_NUM_INPUTS, num_inputs
      );
      return Err(ModelLoadError::ModelInvalid(format!(
        "预期模型输入数量为 {}, 实际为 {}",
        CLASSIFIER_NUM_INPUTS, num_inputs
      )));
    }
    if num_outputs == 0 {
      return Err(ModelLoadError::ModelInvalid("模型没有输出".to_string()));
    }
    if num_outputs > 1 {
      warn!("模型有 {} 个输出, 只使用第一个", num_outputs);
    }

    let input_shape = input_shape.to_vec();
    let fact = f32::fact(input_shape.iter().copied());
    let plan = model
      .with_input_fact(0, fact.into())
      .map_err(|e| ModelLoadError::invalid("无法设置输入形状", e))?
      .into_optimized()
      .map_err(|e| ModelLoadError::invalid("无法优化模型", e))?
      .into_runnable()
      .map_err(|e| ModelLoadError::invalid("无法创建执行计划", e))?;

    Ok(Self { plan, input_shape })
  }
}

impl ModelSession for TractSession {
  type Error = TractError;

  fn input_shape(&self) -> &[usize] {
    &self.input_shape
  }

  fn run(&self, input: &[f32]) -> Result<Vec<f32>, Self::Error> {
    let tensor = Tensor::from_shape(&self.input_shape, input)?;
    let outputs = self.plan.run(tvec!(tensor.into()))?;
    let first = outputs
      .first()
      .ok_or_else(|| anyhow::anyhow!("模型没有返回输出"))?;
    let view = first.to_array_view::<f32>()?;
    Ok(view.iter().copied().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_garbage_bytes() {
    let result = TractSession::from_bytes(b"not a valid onnx model");
    assert!(matches!(result, Err(ModelLoadError::ModelInvalid(_))));
  }

  #[test]
  fn rejects_empty_model() {
    assert!(TractSession::from_bytes(&[]).is_err());
  }
}
