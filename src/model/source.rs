// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/model/source.rs - 模型数据来源
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

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, url_to_path};

#[derive(Error, Debug)]
pub enum ModelSourceError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{actual}'")]
  SchemeMismatch {
    expected: &'static str,
    actual: String,
  },
  #[error("模型路径错误: {0}")]
  ModelPathError(String),
  #[error("模型读取错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("模型数据为空")]
  Empty,
}

/// 模型字节来源，文件、内嵌资源或网络均可
pub trait ModelSource {
  fn read_bytes(&self) -> Result<Vec<u8>, ModelSourceError>;
}

#[derive(Debug, Clone)]
pub struct FileModelSource {
  path: PathBuf,
}

impl FileModelSource {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl FromUrlWithScheme for FileModelSource {
  const SCHEME: &'static str = "onnx";
}

impl FromUrl for FileModelSource {
  type Error = ModelSourceError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ModelSourceError::SchemeMismatch {
        expected: Self::SCHEME,
        actual: url.scheme().to_string(),
      });
    }

    let path = url_to_path(url)
      .ok_or_else(|| ModelSourceError::ModelPathError(format!("无法解析模型路径: {}", url)))?;
    Ok(Self { path })
  }
}

impl ModelSource for FileModelSource {
  fn read_bytes(&self) -> Result<Vec<u8>, ModelSourceError> {
    debug!("读取模型文件: {}", self.path.display());
    let data = std::fs::read(&self.path)?;
    if data.is_empty() {
      return Err(ModelSourceError::Empty);
    }
    Ok(data)
  }
}

/// 内存中的模型数据，例如 `include_bytes!` 内嵌的资源
#[derive(Debug, Clone)]
pub struct BytesModelSource {
  bytes: Vec<u8>,
}

impl BytesModelSource {
  pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
    Self {
      bytes: bytes.into(),
    }
  }
}

impl ModelSource for BytesModelSource {
  fn read_bytes(&self) -> Result<Vec<u8>, ModelSourceError> {
    if self.bytes.is_empty() {
      return Err(ModelSourceError::Empty);
    }
    Ok(self.bytes.clone())
  }
}
