// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 输出文件命名测试
///
/// 转义、内容识别与存储路径组合后得到的文件名

#[cfg(test)]
mod tests {
    use docminer::infrastructure::storage::LocalStorage;
    use docminer::utils::content_sniffer::classify;
    use docminer::utils::name_escaper::escape;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_escaped_names_never_contain_separators() {
        for path in ["/", "/a/b/c.pdf", "C:\\docs\\file.doc", "/q?x=1&y=/z", "http://host:80/p"] {
            let name = escape(path);
            assert!(!name.contains(['/', '\\', ':', '?']), "{} -> {}", path, name);
        }
    }

    #[tokio::test]
    async fn test_pdf_payload_is_named_after_its_content() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let body = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n";

        let ext = classify(body);
        let name = format!("{}{}", escape("/files/report"), ext);
        assert_eq!(name, "%47files%47report.pdf");

        let saved = storage.save(dir.path(), &name, body).await.unwrap();
        assert_eq!(std::fs::read(saved).unwrap(), body);
    }

    #[tokio::test]
    async fn test_collision_gets_ten_letter_suffix() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let mut rng = StdRng::seed_from_u64(7);

        let first = storage.unique_path(dir.path(), "report", ".pdf", &mut rng).await;
        assert_eq!(first, dir.path().join("report.pdf"));
        std::fs::write(&first, b"%PDF-").unwrap();

        let second = storage.unique_path(dir.path(), "report", ".pdf", &mut rng).await;
        let name = second.file_name().unwrap().to_string_lossy().to_string();
        let suffix = &name["report".len()..name.len() - ".pdf".len()];
        assert_eq!(suffix.len(), 10);
        assert!(suffix.chars().all(|c| ('A'..='Y').contains(&c)));
    }
}
