// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/main.rs - 叶片病害分类命令行入口
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

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use args::{Args, TaskKind};
use yejian::{
  Classifier, FromUrl,
  input::InputWrapper,
  model::FileModelSource,
  output::OutputWrapper,
  task::{ContinuousTask, OneShotTask, RepeatShotTask, Task, WorkerTask},
};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型文件路径: {}", args.model);
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);
  info!("任务类型: {:?}", args.task);

  let source = FileModelSource::from_url(&args.model)?;
  info!("正在加载模型...");
  let classifier = Classifier::load_onnx(&source)?;
  info!("模型加载完成，共 {} 个类别", classifier.labels().len());

  let input = InputWrapper::from_url(&args.input)?;
  let output = OutputWrapper::from_url(&args.output)?;

  match args.task {
    TaskKind::Oneshot => OneShotTask.run_task(input, classifier, output)?,
    TaskKind::Repeat => {
      let task = match args.frames {
        Some(n) => RepeatShotTask::default().with_repeat(n),
        None => RepeatShotTask::default(),
      };
      task.run_task(input, classifier, output)?
    }
    TaskKind::Continuous => ContinuousTask::default()
      .with_frame_number(args.frames)
      .run_task(input, classifier, output)?,
    TaskKind::Worker => WorkerTask::default().run_task(input, classifier, output)?,
  }

  Ok(())
}
