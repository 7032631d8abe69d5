// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 嗅探时最多检查的字节数
pub const SNIFF_LEN: usize = 512;

/// 保存文件使用的扩展名
///
/// 只有五种受支持的内容类型有对应的扩展名，其余一律为 `None`，
/// 调用方据此丢弃内容。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Html,
    Pdf,
    Txt,
    Doc,
    Xml,
    None,
}

impl Extension {
    /// 带点的扩展名，例如 `.pdf`
    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Html => ".html",
            Extension::Pdf => ".pdf",
            Extension::Txt => ".txt",
            Extension::Doc => ".doc",
            Extension::Xml => ".xml",
            Extension::None => ".none",
        }
    }

    /// 按 MIME 类型映射扩展名，未知类型返回 `None`
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence {
            "text/html" => Extension::Html,
            "application/pdf" => Extension::Pdf,
            "text/plain" => Extension::Txt,
            "application/msword" => Extension::Doc,
            "text/xml" => Extension::Xml,
            _ => Extension::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Extension::None)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported extension: {0}")]
pub struct ParseExtensionError(String);

impl FromStr for Extension {
    type Err = ParseExtensionError;

    /// 接受 `pdf` 与 `.pdf` 两种写法，不区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match name.as_str() {
            "html" | "htm" => Ok(Extension::Html),
            "pdf" => Ok(Extension::Pdf),
            "txt" => Ok(Extension::Txt),
            "doc" => Ok(Extension::Doc),
            "xml" => Ok(Extension::Xml),
            "none" => Ok(Extension::None),
            _ => Err(ParseExtensionError(s.to_string())),
        }
    }
}

const HTML_SIGNATURES: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// 精确前缀签名
const EXACT_SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1", "application/msword"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"\x00\x00\x02\x00", "image/x-icon"),
    (b"OggS\x00", "application/ogg"),
    (b"ID3", "audio/mpeg"),
    (b"fLaC", "audio/flac"),
    (b"\x1A\x45\xDF\xA3", "video/webm"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
    (b"PK\x03\x04", "application/zip"),
    (b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    (b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    (b"7z\xBC\xAF\x27\x1C", "application/x-7z-compressed"),
    (b"\x00\x61\x73\x6D", "application/wasm"),
    (b"wOFF", "font/woff"),
    (b"wOF2", "font/woff2"),
];

/// RIFF 容器，第 8..12 字节决定具体类型
const RIFF_SIGNATURES: &[(&[u8], &str)] = &[
    (b"WEBP", "image/webp"),
    (b"WAVE", "audio/wave"),
    (b"AVI ", "video/avi"),
];

const UTF_BOMS: &[&[u8]] = &[b"\xFE\xFF", b"\xFF\xFE", b"\xEF\xBB\xBF"];

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

fn matches_html(data: &[u8], sig: &[u8]) -> bool {
    if data.len() < sig.len() + 1 {
        return false;
    }
    let prefix_matches = sig.iter().zip(data).all(|(s, d)| {
        if s.is_ascii_uppercase() {
            d.to_ascii_uppercase() == *s
        } else {
            d == s
        }
    });
    prefix_matches && matches!(data[sig.len()], b' ' | b'>')
}

/// 嗅探内容的 MIME 类型
///
/// 只检查前 [`SNIFF_LEN`] 个字节；无法识别的内容返回
/// `application/octet-stream`。
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    let first_non_ws = data
        .iter()
        .position(|b| !is_whitespace(*b))
        .unwrap_or(data.len());
    let markup = &data[first_non_ws..];

    if HTML_SIGNATURES.iter().any(|sig| matches_html(markup, sig)) {
        return "text/html";
    }
    if markup.starts_with(b"<?xml") {
        return "text/xml";
    }

    if let Some((_, mime)) = EXACT_SIGNATURES.iter().find(|(sig, _)| data.starts_with(sig)) {
        return *mime;
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") {
        if let Some((_, mime)) = RIFF_SIGNATURES.iter().find(|(sig, _)| &data[8..12] == *sig) {
            return *mime;
        }
    }

    if UTF_BOMS.iter().any(|bom| data.starts_with(bom)) {
        return "text/plain";
    }
    if !data.iter().any(|b| is_binary(*b)) {
        return "text/plain";
    }
    "application/octet-stream"
}

/// 内容分类器：嗅探内容并映射为扩展名，永不失败
pub fn classify(data: &[u8]) -> Extension {
    Extension::from_mime(detect_content_type(data))
}

#[cfg(test)]
#[path = "content_sniffer_test.rs"]
mod tests;
