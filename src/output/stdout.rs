// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/output/stdout.rs - 终端输出
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

use std::convert::Infallible;

use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme, display, input::LeafFrame, output::Render,
  postprocess::Prediction,
};

/// 逐行打印 `名称: 标签 (置信度)`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutput;

impl FromUrlWithScheme for StdoutOutput {
  const SCHEME: &'static str = "stdout";
}

impl FromUrl for StdoutOutput {
  type Error = Infallible;

  fn from_url(_url: &Url) -> Result<Self, Self::Error> {
    Ok(StdoutOutput)
  }
}

impl StdoutOutput {
  pub fn line(frame: &LeafFrame, result: &Prediction) -> String {
    format!("{}: {}", frame.name, display::format(result))
  }
}

impl Render<LeafFrame, Prediction> for StdoutOutput {
  type Error = Infallible;

  fn render_result(&self, frame: &LeafFrame, result: &Prediction) -> Result<(), Self::Error> {
    println!("{}", Self::line(frame, result));
    Ok(())
  }
}
