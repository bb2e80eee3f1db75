// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/bin/simple_oneshot.rs - 分类单张图像并打印前几名
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

use anyhow::Result;
use clap::Parser;
use url::Url;

use tracing::info;
use yejian::{Classifier, FromUrl, display, input::ImageFileInput, model::FileModelSource};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// ONNX 模型路径
  #[arg(long, value_name = "MODEL")]
  pub model: Url,
  /// 图片路径，image:///path/to/leaf.jpg
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 额外打印的候选类别数
  #[arg(long, default_value_t = 3, value_name = "K")]
  pub top_k: usize,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  let mut input = ImageFileInput::from_url(&args.input)?;
  let frame = input
    .next()
    .ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;
  let classifier = Classifier::load_onnx(&FileModelSource::from_url(&args.model)?)?;

  let prediction = classifier.classify(&frame.image)?;
  println!("{}: {}", frame.name, display::format(&prediction));

  for (rank, candidate) in classifier
    .classify_top_k(&frame.image, args.top_k)?
    .iter()
    .enumerate()
  {
    info!(
      "#{} {} ({:.2}%)",
      rank + 1,
      candidate.label,
      candidate.confidence_percent
    );
  }

  Ok(())
}
