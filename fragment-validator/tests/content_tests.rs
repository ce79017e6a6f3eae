//! Behavioural tests for `validate_fragment_content` over in-memory and on-disk files.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use fragment_types::ImageFormat;
use fragment_validator::{
    DiskFile, MemoryFile, NO_FILE, Rejection, UNEXPECTED_VALIDATION_ERROR, ValidateError, Verdict,
    user_message, validate_fragment_content,
};
use tempfile::TempDir;

const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

async fn typed(declared: &str, content: &str) -> String {
    validate_fragment_content(declared, content, NO_FILE)
        .await
        .unwrap()
        .message()
}

#[tokio::test]
async fn test_exact_messages_for_typed_content() {
    let cases = [
        ("text/plain", "  ", "Content cannot be empty"),
        ("application/json", "{\"a\":1}", ""),
        ("application/json", "{bad", "Invalid JSON format"),
        ("text/html", "<p>hi</p>", ""),
        ("text/html", "<p>hi</span>", "Invalid HTML format"),
        ("text/html", "<br>", ""),
        ("text/markdown", "# Title", ""),
        (
            "text/markdown",
            "a plain sentence that says nothing",
            "Invalid Markdown format",
        ),
        (
            "text/markdown",
            "<html><body>**bold**</body></html>",
            "Invalid Markdown format",
        ),
        ("image/webp", "RIFF", "Image file is required"),
        ("video/mp4", "data", "Some Invalid Format"),
    ];
    for (declared, content, expected) in cases {
        assert_eq!(typed(declared, content).await, expected, "{declared}: {content:?}");
    }
}

#[tokio::test]
async fn test_validation_is_idempotent() {
    let file = MemoryFile::new("table.csv", "text/csv", "name,age\nada,36\n");
    let first = validate_fragment_content("text/csv", "", Some(&file))
        .await
        .unwrap();
    let second = validate_fragment_content("text/csv", "", Some(&file))
        .await
        .unwrap();
    assert_eq!(first, second);
    assert!(first.is_accepted());

    for _ in 0..3 {
        assert_eq!(
            typed("text/markdown", "plain words only here").await,
            "Invalid Markdown format"
        );
    }
}

#[tokio::test]
async fn test_adding_markdown_feature_keeps_acceptance() {
    let base = "# Notes\n\nSome text.";
    assert_eq!(typed("text/markdown", base).await, "");

    for extra in [
        "\n\n- item",
        "\n\n> quote",
        "\n\n`code`",
        "\n\n[link](https://example.com)",
    ] {
        let content = format!("{base}{extra}");
        assert_eq!(typed("text/markdown", &content).await, "", "{content:?}");
    }
}

#[tokio::test]
async fn test_image_uploads_by_signature() {
    let gif = MemoryFile::new("a.gif", "image/gif", b"GIF89a\x01\x00".to_vec());
    let verdict = validate_fragment_content("image/gif", "", Some(&gif))
        .await
        .unwrap();
    assert!(verdict.is_accepted());

    let webp = MemoryFile::new(
        "a.webp",
        "image/webp",
        b"RIFF\x10\x00\x00\x00WEBPVP8 ".to_vec(),
    );
    let verdict = validate_fragment_content("image/webp", "", Some(&webp))
        .await
        .unwrap();
    assert!(verdict.is_accepted());

    // A PNG body uploaded as JPEG is rejected with the JPEG message.
    let mislabelled = MemoryFile::new("a.jpg", "image/jpeg", PNG.to_vec());
    let verdict = validate_fragment_content("image/jpeg", "", Some(&mislabelled))
        .await
        .unwrap();
    assert_eq!(verdict.message(), "Invalid JPEG format");
}

#[tokio::test]
async fn test_disk_file_png() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("logo.png");
    fs::write(&good, PNG).unwrap();
    let verdict = validate_fragment_content("image/png", "", Some(&DiskFile::new(&good)))
        .await
        .unwrap();
    assert!(verdict.is_accepted());

    let mut altered = PNG;
    altered[7] = 0xFF;
    let bad = tmp.path().join("bad.png");
    fs::write(&bad, altered).unwrap();
    let verdict = validate_fragment_content("image/png", "", Some(&DiskFile::new(&bad)))
        .await
        .unwrap();
    assert_eq!(
        verdict,
        Verdict::Rejected(Rejection::InvalidImage(ImageFormat::Png))
    );
}

#[tokio::test]
async fn test_disk_file_csv_zero_bytes_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.csv");
    fs::write(&path, "").unwrap();
    let verdict = validate_fragment_content("text/csv", "", Some(&DiskFile::new(&path)))
        .await
        .unwrap();
    assert_eq!(verdict.message(), "Invalid CSV format");
}

#[tokio::test]
async fn test_missing_disk_file() {
    let tmp = TempDir::new().unwrap();
    let missing = DiskFile::new(tmp.path().join("gone.csv"));

    // CSV needs the whole body: the read failure surfaces as an error.
    let result = validate_fragment_content("text/csv", "", Some(&missing)).await;
    assert!(matches!(result, Err(ValidateError::FileRead { .. })));
    assert_eq!(user_message(&result), UNEXPECTED_VALIDATION_ERROR);

    // Signature checks fold the read failure into a rejection.
    let missing = DiskFile::new(tmp.path().join("gone.png"));
    let result = validate_fragment_content("image/png", "", Some(&missing)).await;
    assert_eq!(user_message(&result), "Invalid PNG format");
}
