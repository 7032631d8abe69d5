// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::target::Target;
use crate::utils::errors::StorageError;
use rand::Rng;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// 随机文件名后缀的长度（遍历任务）
pub const SHORT_SUFFIX_LEN: usize = 6;
/// 随机文件名后缀的长度（重名时）
pub const LONG_SUFFIX_LEN: usize = 10;

/// 由 `A`..=`Y` 组成的随机串
pub fn random_letters<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'A' + rng.random_range(0..25u8)))
        .collect()
}

/// 本地文件系统存储实现
///
/// 每个策略一个根目录，目标输出位于 `<根>/<行业>/<URL 编码后的目标>/`。
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 目标的输出目录（不创建）
    pub fn target_dir(&self, target: &Target) -> PathBuf {
        let mut dir = self.base_path.clone();
        if let Some(folder) = target.folder() {
            dir.push(folder);
        }
        dir.push(urlencoding::encode(&target.url).as_ref());
        dir
    }

    /// 创建目标的输出目录
    pub async fn prepare_target_dir(&self, target: &Target) -> Result<PathBuf, StorageError> {
        let dir = self.target_dir(target);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// 预先创建所有分类目录
    pub async fn prepare_folders(&self, folders: &[String]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).await?;
        for folder in folders {
            if folder.contains(['/', '\\']) || folder == ".." {
                return Err(StorageError::InvalidPath(folder.clone()));
            }
            fs::create_dir_all(self.base_path.join(folder)).await?;
        }
        Ok(())
    }

    /// 写入文件，已存在时覆盖
    pub async fn save(&self, dir: &Path, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = dir.join(file_name);
        let mut file = fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(path)
    }

    /// 返回不与现有文件冲突的路径
    ///
    /// `stem + ext` 已存在时在二者之间插入随机后缀。
    pub async fn unique_path<R: Rng>(
        &self,
        dir: &Path,
        stem: &str,
        ext: &str,
        rng: &mut R,
    ) -> PathBuf {
        let candidate = dir.join(format!("{}{}", stem, ext));
        if !fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        dir.join(format!("{}{}{}", stem, random_letters(rng, LONG_SUFFIX_LEN), ext))
    }
}
