// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::OrchestratorError;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 在途任务闸门
///
/// 调度器启动任务前占用一个槽位，聚合器在该目标的终止事件上归还。
/// 槽位不随任务句柄释放，因此用 `forget` + `add_permits` 手动计数。
#[derive(Debug, Clone)]
pub struct InFlightGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl InFlightGate {
    /// 创建一个新的闸门
    ///
    /// # 参数
    ///
    /// * `capacity` - 并发上限，至少为 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// 等待并占用一个槽位
    pub async fn acquire(&self) -> Result<(), OrchestratorError> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| OrchestratorError::Dispatch(e.to_string()))?;
        permit.forget();
        Ok(())
    }

    /// 归还一个槽位；没有在途任务时忽略
    pub fn release(&self) {
        if self.in_flight() > 0 {
            self.semaphore.add_permits(1);
        }
    }

    /// 当前在途任务数
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let gate = InFlightGate::new(2);
        gate.acquire().await.unwrap();
        gate.acquire().await.unwrap();
        assert_eq!(gate.in_flight(), 2);

        let blocked = tokio::time::timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(blocked.is_err());

        gate.release();
        assert_eq!(gate.in_flight(), 1);
        gate.acquire().await.unwrap();
        assert_eq!(gate.in_flight(), 2);
    }

    #[test]
    fn test_release_never_exceeds_capacity() {
        let gate = InFlightGate::new(3);
        gate.release();
        assert_eq!(gate.in_flight(), 0);
        assert_eq!(gate.capacity(), 3);
    }
}
