// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/infer.rs - 推理引擎
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

use tracing::{debug, error};

use crate::{
  error::ClassifyError,
  frame::NchwTensor,
  model::{ModelHandle, ModelSession},
};

/// 原始 logits，下标与标签表一致
pub type LogitVector = Box<[f32]>;

/// 执行一次前向计算。不重试，失败直接返回给调用方。
pub fn infer<S, const W: u32, const H: u32>(
  model: &ModelHandle<S>,
  input: &NchwTensor<W, H>,
) -> Result<LogitVector, ClassifyError>
where
  S: ModelSession,
{
  let session = model.session()?;

  let expected = session.input_shape();
  let actual = input.shape();
  if expected != actual.as_slice() {
    error!("输入形状不匹配: 期望 {:?}, 实际 {:?}", expected, actual);
    return Err(ClassifyError::ShapeMismatch {
      expected: expected.to_vec(),
      actual: actual.to_vec(),
    });
  }

  debug!("执行模型推理");
  let logits = session.run(input.as_nchw()).map_err(|e| {
    error!("模型推理失败: {}", e);
    ClassifyError::Inference(e.to_string())
  })?;

  if logits.is_empty() {
    error!("模型输出为空");
    return Err(ClassifyError::Inference("模型输出为空".to_string()));
  }
  debug!("模型输出长度: {}", logits.len());

  Ok(logits.into_boxed_slice())
}
