// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/model/handle.rs - 模型句柄生命周期
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

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info};

use super::{ModelLoadError, ModelSession, ModelSource, ModelStatus, TractSession};
use crate::error::ClassifyError;

enum ModelState<S> {
  Unloaded,
  Loading,
  Ready(Arc<S>),
  LoadFailed(String),
}

impl<S> ModelState<S> {
  fn status(&self) -> ModelStatus {
    match self {
      ModelState::Unloaded => ModelStatus::Unloaded,
      ModelState::Loading => ModelStatus::Loading,
      ModelState::Ready(_) => ModelStatus::Ready,
      ModelState::LoadFailed(_) => ModelStatus::LoadFailed,
    }
  }
}

/// 模型句柄：`Unloaded → Loading → Ready | LoadFailed`。
///
/// 只能加载一次，失败后不会自动重试。加载与推理之间由内部读写锁串行化，
/// 进入 `Ready` 后推理只持有会话的共享引用。句柄被 drop 时释放会话。
pub struct ModelHandle<S> {
  state: RwLock<ModelState<S>>,
}

impl<S> Default for ModelHandle<S> {
  fn default() -> Self {
    Self {
      state: RwLock::new(ModelState::Unloaded),
    }
  }
}

impl<S> ModelHandle<S> {
  pub fn new() -> Self {
    Self::default()
  }

  fn read_state(&self) -> RwLockReadGuard<'_, ModelState<S>> {
    self.state.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write_state(&self) -> RwLockWriteGuard<'_, ModelState<S>> {
    self.state.write().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn status(&self) -> ModelStatus {
    self.read_state().status()
  }

  pub fn is_ready(&self) -> bool {
    self.status() == ModelStatus::Ready
  }

  /// 加载失败时记录的原因
  pub fn failure(&self) -> Option<String> {
    match &*self.read_state() {
      ModelState::LoadFailed(reason) => Some(reason.clone()),
      _ => None,
    }
  }

  /// 获取已就绪的会话，其余状态一律返回 `ModelNotReady`
  pub fn session(&self) -> Result<Arc<S>, ClassifyError> {
    match &*self.read_state() {
      ModelState::Ready(session) => Ok(Arc::clone(session)),
      other => Err(ClassifyError::ModelNotReady(other.status())),
    }
  }
}

impl<S: ModelSession> ModelHandle<S> {
  /// 从 `source` 读取模型数据并用 `build` 创建会话
  pub fn load<Src, F>(&self, source: &Src, build: F) -> Result<(), ModelLoadError>
  where
    Src: ModelSource + ?Sized,
    F: FnOnce(&[u8]) -> Result<S, ModelLoadError>,
  {
    {
      let mut state = self.write_state();
      if !matches!(*state, ModelState::Unloaded) {
        let status = state.status();
        error!("模型已经加载过, 当前状态: {}", status);
        return Err(ModelLoadError::AlreadyInitialized(status));
      }
      *state = ModelState::Loading;
    }

    info!("开始加载模型");
    let result = source
      .read_bytes()
      .map_err(ModelLoadError::from)
      .and_then(|data| {
        debug!(
          "模型文件大小: {:.2} MB",
          data.len() as f64 / (1024.0 * 1024.0)
        );
        build(&data)
      });

    let mut state = self.write_state();
    match result {
      Ok(session) => {
        debug!("模型输入形状: {:?}", session.input_shape());
        *state = ModelState::Ready(Arc::new(session));
        info!("模型加载完成");
        Ok(())
      }
      Err(e) => {
        error!("模型加载失败: {}", e);
        *state = ModelState::LoadFailed(e.to_string());
        Err(e)
      }
    }
  }
}

impl ModelHandle<TractSession> {
  /// 加载 ONNX 模型
  pub fn load_onnx<Src: ModelSource + ?Sized>(&self, source: &Src) -> Result<(), ModelLoadError> {
    self.load(source, TractSession::from_bytes)
  }
}
