// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 默认过滤规则
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info,docminer=debug"
    }
}

/// 初始化全局 tracing 订阅者
///
/// `RUST_LOG` 优先；否则任一策略开启调试时输出全部 debug 日志。
pub fn init_telemetry(debug: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(debug).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
