// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/args.rs - 命令行参数
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

use clap::{Parser, ValueEnum};
use url::Url;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
  /// 只分类第一张图像
  Oneshot,
  /// 对第一张图像重复分类并统计耗时
  Repeat,
  /// 逐张分类全部输入，Ctrl-C 退出
  Continuous,
  /// 在工作线程上分类全部输入
  Worker,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// ONNX 模型路径，例如 onnx:///models/plant_disease.onnx
  #[arg(long, value_name = "MODEL")]
  pub model: Url,

  /// 输入来源
  /// 支持格式:
  /// - 单张图片: image:///path/to/leaf.jpg
  /// - 图片目录: folder:///path/to/leaves
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,

  /// 输出方式
  /// 支持格式:
  /// - 标准输出: stdout://
  /// - JSON 文件: json:///path/to/result.json
  /// - 记录目录: folder:///path/to/records?image&min_confidence=60
  #[arg(long, default_value = "stdout://", value_name = "OUTPUT")]
  pub output: Url,

  #[arg(long, value_enum, default_value_t = TaskKind::Oneshot)]
  pub task: TaskKind,

  /// 最大处理图像数（continuous 任务），或重复次数（repeat 任务）
  #[arg(long, value_name = "COUNT")]
  pub frames: Option<usize>,
}
