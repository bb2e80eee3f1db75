// 该文件是 Yejian （叶鉴） 项目的一部分。
// src/label.rs - 类别标签表
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

use serde::Serialize;

pub const PLANT_DISEASE_CLASS_NUM: usize = 15;

pub trait WithLabel: Sized + std::fmt::Debug {
  fn to_label_str(&self) -> String;
  fn to_label_id(&self) -> u32;
  fn from_label_id(id: u32) -> Option<Self>;
}

/// 模型输出的类别，顺序与训练时一致，不可调整
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlantDisease {
  BellPepperBacterialSpot,
  BellPepperHealthy,
  PotatoEarlyBlight,
  PotatoLateBlight,
  PotatoHealthy,
  TomatoBacterialSpot,
  TomatoEarlyBlight,
  TomatoLateBlight,
  TomatoLeafMold,
  TomatoSeptoriaLeafSpot,
  TomatoSpiderMites,
  TomatoTargetSpot,
  TomatoYellowLeafCurlVirus,
  TomatoMosaicVirus,
  TomatoHealthy,
}

impl PlantDisease {
  pub const ALL: [PlantDisease; PLANT_DISEASE_CLASS_NUM] = [
    PlantDisease::BellPepperBacterialSpot,
    PlantDisease::BellPepperHealthy,
    PlantDisease::PotatoEarlyBlight,
    PlantDisease::PotatoLateBlight,
    PlantDisease::PotatoHealthy,
    PlantDisease::TomatoBacterialSpot,
    PlantDisease::TomatoEarlyBlight,
    PlantDisease::TomatoLateBlight,
    PlantDisease::TomatoLeafMold,
    PlantDisease::TomatoSeptoriaLeafSpot,
    PlantDisease::TomatoSpiderMites,
    PlantDisease::TomatoTargetSpot,
    PlantDisease::TomatoYellowLeafCurlVirus,
    PlantDisease::TomatoMosaicVirus,
    PlantDisease::TomatoHealthy,
  ];

  pub const fn label(self) -> &'static str {
    match self {
      PlantDisease::BellPepperBacterialSpot => "Bell Pepper–Bacterial Spot",
      PlantDisease::BellPepperHealthy => "Bell Pepper–Healthy",
      PlantDisease::PotatoEarlyBlight => "Potato–Early Blight",
      PlantDisease::PotatoLateBlight => "Potato–Late Blight",
      PlantDisease::PotatoHealthy => "Potato–Healthy",
      PlantDisease::TomatoBacterialSpot => "Tomato–Bacterial Spot",
      PlantDisease::TomatoEarlyBlight => "Tomato–Early Blight",
      PlantDisease::TomatoLateBlight => "Tomato–Late Blight",
      PlantDisease::TomatoLeafMold => "Tomato–Leaf Mold",
      PlantDisease::TomatoSeptoriaLeafSpot => "Tomato–Septoria Leaf Spot",
      PlantDisease::TomatoSpiderMites => "Tomato–Spider Mites",
      PlantDisease::TomatoTargetSpot => "Tomato–Target Spot",
      PlantDisease::TomatoYellowLeafCurlVirus => "Tomato–Yellow Leaf Curl Virus",
      PlantDisease::TomatoMosaicVirus => "Tomato–Mosaic Virus",
      PlantDisease::TomatoHealthy => "Tomato–Healthy",
    }
  }

  pub fn crop(self) -> &'static str {
    match self {
      PlantDisease::BellPepperBacterialSpot | PlantDisease::BellPepperHealthy => "Bell Pepper",
      PlantDisease::PotatoEarlyBlight
      | PlantDisease::PotatoLateBlight
      | PlantDisease::PotatoHealthy => "Potato",
      _ => "Tomato",
    }
  }

  pub fn is_healthy(self) -> bool {
    matches!(
      self,
      PlantDisease::BellPepperHealthy | PlantDisease::PotatoHealthy | PlantDisease::TomatoHealthy
    )
  }
}

impl WithLabel for PlantDisease {
  fn to_label_str(&self) -> String {
    self.label().to_string()
  }

  fn to_label_id(&self) -> u32 {
    *self as u32
  }

  fn from_label_id(id: u32) -> Option<Self> {
    Self::ALL.get(id as usize).copied()
  }
}

impl std::fmt::Display for PlantDisease {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// 有序标签表，下标与模型输出向量一一对应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
  labels: Box<[String]>,
}

impl LabelTable {
  pub fn new<I, S>(labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      labels: labels.into_iter().map(Into::into).collect(),
    }
  }

  /// 辣椒、马铃薯、番茄共 15 类
  pub fn plant_village() -> Self {
    Self::new(PlantDisease::ALL.iter().map(|d| d.label()))
  }

  pub fn get(&self, index: usize) -> Option<&str> {
    self.labels.get(index).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.labels.iter().map(String::as_str)
  }
}

impl Default for LabelTable {
  fn default() -> Self {
    Self::plant_village()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_matches_training_order() {
    let table = LabelTable::plant_village();
    assert_eq!(table.len(), PLANT_DISEASE_CLASS_NUM);
    assert_eq!(table.get(0), Some("Bell Pepper–Bacterial Spot"));
    assert_eq!(table.get(4), Some("Potato–Healthy"));
    assert_eq!(table.get(9), Some("Tomato–Septoria Leaf Spot"));
    assert_eq!(table.get(12), Some("Tomato–Yellow Leaf Curl Virus"));
    assert_eq!(table.get(14), Some("Tomato–Healthy"));
    assert_eq!(table.get(15), None);
  }

  #[test]
  fn enum_ids_follow_table() {
    let table = LabelTable::plant_village();
    for (i, disease) in PlantDisease::ALL.iter().enumerate() {
      assert_eq!(disease.to_label_id() as usize, i);
      assert_eq!(table.get(i), Some(disease.label()));
      assert_eq!(PlantDisease::from_label_id(i as u32), Some(*disease));
    }
    assert_eq!(PlantDisease::from_label_id(15), None);
  }

  #[test]
  fn crops_and_health() {
    assert_eq!(PlantDisease::BellPepperHealthy.crop(), "Bell Pepper");
    assert_eq!(PlantDisease::PotatoLateBlight.crop(), "Potato");
    assert_eq!(PlantDisease::TomatoMosaicVirus.crop(), "Tomato");
    assert_eq!(
      PlantDisease::ALL.iter().filter(|d| d.is_healthy()).count(),
      3
    );
  }
}
