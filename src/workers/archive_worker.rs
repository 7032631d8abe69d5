// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::archive::index::{ArchiveEvent, ArchiveIndex, ArchiveRequest};
use crate::domain::models::target::Strategy;
use crate::workers::worker::{CrawlTask, EventEmitter, TaskContext};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::instrument;

/// 客户端事件通道容量
const ARCHIVE_EVENT_BUFFER: usize = 64;

/// 存档回放任务
///
/// 把存档客户端的事件翻译成统一的采集事件：进度照传，
/// 记录级失败变为警告，索引级失败与完成分别成为终止事件。
pub struct ArchiveReplayTask {
    client: Arc<dyn ArchiveIndex>,
}

impl ArchiveReplayTask {
    pub fn new(client: Arc<dyn ArchiveIndex>) -> Self {
        Self { client }
    }
}

/// 消费客户端事件，返回尚未发送终止事件的发送器
async fn translate(
    mut rx: mpsc::Receiver<ArchiveEvent>,
    events: EventEmitter,
) -> Option<EventEmitter> {
    let mut events = Some(events);
    while let Some(event) = rx.recv().await {
        let Some(emitter) = events.as_ref() else {
            continue;
        };
        match event {
            ArchiveEvent::Progress { done, total, .. } => emitter.progress(done, total),
            ArchiveEvent::Failed {
                url,
                cause,
                fatal: false,
            } => emitter.warning(format!("{}: {}", url, cause)),
            ArchiveEvent::Failed {
                cause, fatal: true, ..
            } => {
                if let Some(emitter) = events.take() {
                    emitter.error(cause);
                }
            }
            ArchiveEvent::Finished { saved, .. } => {
                if let Some(emitter) = events.take() {
                    emitter.done(saved);
                }
            }
        }
    }
    events
}

#[async_trait]
impl CrawlTask for ArchiveReplayTask {
    fn strategy(&self) -> Strategy {
        Strategy::Archive
    }

    #[instrument(skip_all, fields(target = %ctx.target.url, client = self.client.name()))]
    async fn run(&self, ctx: TaskContext, events: EventEmitter) {
        let (tx, rx) = mpsc::channel(ARCHIVE_EVENT_BUFFER);
        let request = ArchiveRequest {
            site: ctx.target.domain(),
            save_dir: ctx.output_dir,
        };

        let (_, unfinished) = tokio::join!(self.client.fetch_site(request, tx), translate(rx, events));
        if let Some(emitter) = unfinished {
            emitter.error("archive client ended without a result");
        }
    }
}
