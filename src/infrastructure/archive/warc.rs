// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::archive::index::ArchiveError;
use flate2::read::MultiGzDecoder;
use std::io::Read;

const BLOCK_SEPARATOR: &[u8] = b"\r\n\r\n";

/// 一条 WARC response 记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarcRecord {
    /// WARC 头部块
    pub warc_headers: String,
    /// HTTP 响应头部块
    pub http_headers: String,
    /// 响应体
    pub body: Vec<u8>,
}

impl WarcRecord {
    /// 读取 WARC 头部字段，字段名不区分大小写
    pub fn header(&self, name: &str) -> Option<&str> {
        self.warc_headers.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    /// 抓取时的目标地址
    pub fn target_uri(&self) -> Option<&str> {
        self.header("WARC-Target-URI")
    }
}

/// 解压 gzip 压缩的记录片段
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    let mut decoder = MultiGzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ArchiveError::Record(format!("gzip: {}", e)))?;
    Ok(out)
}

fn split_block(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = data
        .windows(BLOCK_SEPARATOR.len())
        .position(|w| w == BLOCK_SEPARATOR)?;
    Some((&data[..pos], &data[pos + BLOCK_SEPARATOR.len()..]))
}

/// 将解压后的记录拆成 WARC 头、HTTP 头和响应体
pub fn parse_record(data: &[u8]) -> Result<WarcRecord, ArchiveError> {
    let (warc, rest) =
        split_block(data).ok_or_else(|| ArchiveError::Record("missing WARC header block".into()))?;
    let (http, body) =
        split_block(rest).ok_or_else(|| ArchiveError::Record("missing HTTP header block".into()))?;

    // 记录以 "\r\n\r\n" 结尾，不属于响应体
    let body = body.strip_suffix(BLOCK_SEPARATOR).unwrap_or(body);

    Ok(WarcRecord {
        warc_headers: String::from_utf8_lossy(warc).into_owned(),
        http_headers: String::from_utf8_lossy(http).into_owned(),
        body: body.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn sample_record(uri: &str, body: &[u8]) -> Vec<u8> {
        let mut raw = format!(
            "WARC/1.0\r\nWARC-Type: response\r\nWARC-Target-URI: {}\r\nContent-Type: application/http; msgtype=response\r\n\r\nHTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\n\r\n",
            uri
        )
        .into_bytes();
        raw.extend_from_slice(body);
        raw.extend_from_slice(b"\r\n\r\n");
        raw
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_parse_record() {
        let raw = sample_record("https://kai.ru/plan.pdf", b"%PDF-1.4 body");
        let record = parse_record(&decompress(&gzip(&raw)).unwrap()).unwrap();

        assert_eq!(record.target_uri(), Some("https://kai.ru/plan.pdf"));
        assert_eq!(record.header("warc-type"), Some("response"));
        assert!(record.http_headers.starts_with("HTTP/1.1 200 OK"));
        assert_eq!(record.body, b"%PDF-1.4 body");
    }

    #[test]
    fn test_malformed_record() {
        assert!(parse_record(b"WARC/1.0 no separators").is_err());
        assert!(decompress(b"not gzip").is_err());
    }
}
