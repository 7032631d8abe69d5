// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 日志文件名
pub const LOG_FILE_NAME: &str = "log.txt";

/// 每个策略一份的追加式文本日志
///
/// 位于 `<策略目录>/log.txt`，每次运行开头写入 `Log started`。
/// 所有警告、错误和终止结果都会落到这里。
#[derive(Debug)]
pub struct StrategyLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl StrategyLog {
    /// 打开（必要时创建）日志文件并写入启动横幅
    pub fn open(dir: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let log = Self {
            path,
            file: Mutex::new(file),
        };
        log.append("Log started")?;
        Ok(log)
    }

    /// 追加一行带时间戳的记录
    pub fn append(&self, line: &str) -> io::Result<()> {
        let stamp = Local::now().format("%Y/%m/%d %H:%M:%S");
        let mut file = self.file.lock();
        writeln!(file, "{} {}", stamp, line)?;
        file.flush()
    }

    /// 在阻塞线程池中追加一行，供异步上下文调用
    pub async fn append_async(self: Arc<Self>, line: String) -> io::Result<()> {
        tokio::task::spawn_blocking(move || self.append(&line))
            .await
            .map_err(io::Error::other)?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
