// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::target::Strategy;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const TASKS_LAUNCHED: &str = "docminer_tasks_launched_total";
pub const TARGETS_DONE: &str = "docminer_targets_done_total";
pub const TARGETS_FAILED: &str = "docminer_targets_failed_total";
pub const TASK_WARNINGS: &str = "docminer_task_warnings_total";

/// 启动 Prometheus 导出器并注册指标描述
///
/// 地址无效或端口被占用时只记录警告，采集照常进行。
pub fn init_metrics(listen: &str) {
    let addr: SocketAddr = match listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(TASKS_LAUNCHED, "Crawl tasks launched by the dispatcher");
    describe_counter!(TARGETS_DONE, "Targets marked done by the aggregator");
    describe_counter!(TARGETS_FAILED, "Targets that ended with a terminal error");
    describe_counter!(TASK_WARNINGS, "Recoverable per-item failures reported by tasks");

    info!("Metrics exporter listening on {}", addr);
}

pub fn record_launched(strategy: Strategy) {
    counter!(TASKS_LAUNCHED, "strategy" => strategy.to_string()).increment(1);
}

pub fn record_done(strategy: Strategy) {
    counter!(TARGETS_DONE, "strategy" => strategy.to_string()).increment(1);
}

pub fn record_failed(strategy: Strategy) {
    counter!(TARGETS_FAILED, "strategy" => strategy.to_string()).increment(1);
}

pub fn record_warning(strategy: Strategy) {
    counter!(TASK_WARNINGS, "strategy" => strategy.to_string()).increment(1);
}
