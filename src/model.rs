// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/model.rs - 模型
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

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 推理后端会话：一个输入槽，一个输出槽。
///
/// 实现需要在 `Ready` 之后只读，可被多个线程共享。
pub trait ModelSession: Send + Sync {
  type Error: std::fmt::Display;

  /// 模型声明的输入形状
  fn input_shape(&self) -> &[usize];

  /// 执行一次前向计算，返回第一个输出展平后的数据
  fn run(&self, input: &[f32]) -> Result<Vec<f32>, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
  Unloaded,
  Loading,
  Ready,
  LoadFailed,
}

impl std::fmt::Display for ModelStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      ModelStatus::Unloaded => "Unloaded",
      ModelStatus::Loading => "Loading",
      ModelStatus::Ready => "Ready",
      ModelStatus::LoadFailed => "LoadFailed",
    };
    f.write_str(s)
  }
}

#[derive(Error, Debug)]
pub enum ModelLoadError {
  #[error("模型来源错误: {0}")]
  Source(#[from] ModelSourceError),
  #[error("模型无效: {0}")]
  ModelInvalid(String),
  #[error("模型只能加载一次, 当前状态: {0}")]
  AlreadyInitialized(ModelStatus),
}

impl ModelLoadError {
  pub fn invalid(msg: &str, e: impl std::fmt::Display) -> Self {
    ModelLoadError::ModelInvalid(format!("{}: {}", msg, e))
  }
}

mod handle;
mod source;
mod tract_session;

pub use self::handle::ModelHandle;
pub use self::source::{BytesModelSource, FileModelSource, ModelSource, ModelSourceError};
pub use self::tract_session::TractSession;
