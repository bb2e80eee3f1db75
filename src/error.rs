// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/error.rs - 分类管线错误
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

use thiserror::Error;

use crate::model::{ModelLoadError, ModelStatus};

#[derive(Error, Debug)]
pub enum ClassifyError {
  /// 模型数据无效或读取失败，进程生命周期内不可恢复
  #[error("模型加载错误: {0}")]
  ModelLoad(#[from] ModelLoadError),
  /// 模型尚未进入 Ready 状态，调用方可稍后重试
  #[error("模型未就绪, 当前状态: {0}")]
  ModelNotReady(ModelStatus),
  #[error("输入形状不匹配: 期望 {expected:?}, 实际 {actual:?}")]
  ShapeMismatch {
    expected: Vec<usize>,
    actual: Vec<usize>,
  },
  #[error("推理错误: {0}")]
  Inference(String),
  /// 模型输出与标签表不一致
  #[error("未知类别索引 {index}, 标签表大小 {len}")]
  UnknownClass { index: usize, len: usize },
}

impl ClassifyError {
  /// 调用方稍后重试可能成功
  pub fn is_recoverable(&self) -> bool {
    matches!(self, ClassifyError::ModelNotReady(status) if *status != ModelStatus::LoadFailed)
  }
}
