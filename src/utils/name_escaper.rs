// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt::Write;

/// 文件名中需要转义的字符
const RESERVED: [char; 4] = ['/', '\\', ':', '?'];

/// 将 URL 路径转换为可作为文件名的字符串
///
/// `/ \ : ?` 被替换为 `%<十进制码点>`，其余字符原样保留。
/// `%` 本身不转义，所以对输出再次调用不会产生新的替换。
/// 空输入返回空串，由调用方替换为 `index`。
pub fn escape(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if RESERVED.contains(&c) {
            // write! 到 String 不会失败
            let _ = write!(escaped, "%{}", c as u32);
        } else {
            escaped.push(c);
        }
    }
    escaped
}
