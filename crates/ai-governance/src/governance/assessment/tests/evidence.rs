use super::common::*;
use crate::governance::assessment::evidence::{
    format_size, EvidenceCandidate, EvidenceStore, EvidenceUploadConfig, EvidenceUploader,
};

fn pdf(name: &str, size_bytes: u64) -> EvidenceCandidate {
    EvidenceCandidate {
        name: name.to_string(),
        size_bytes,
        content_type: mime::APPLICATION_PDF,
        question_id: Some("q9".to_string()),
    }
}

fn limited(max_files: usize) -> EvidenceUploader {
    EvidenceUploader::new(EvidenceUploadConfig {
        max_files,
        ..EvidenceUploadConfig::default()
    })
}

#[tokio::test]
async fn batch_over_the_file_limit_admits_nothing() {
    let mut uploader = limited(2);
    let first = uploader
        .add_files(vec![pdf("dpia.pdf", 1_024), pdf("model-card.pdf", 2_048)], None)
        .await;
    assert_eq!(first.admitted.len(), 2);

    let report = uploader.add_files(vec![pdf("extra.pdf", 10)], None).await;

    assert!(report.admitted.is_empty());
    assert_eq!(report.rejections.len(), 1);
    assert_eq!(report.rejections[0].message, "Maximum 2 files allowed");
    assert_eq!(uploader.files().len(), 2);
    assert_eq!(uploader.remaining_slots(), 0);
}

#[tokio::test]
async fn oversized_and_unsupported_files_are_rejected_individually() {
    let mut uploader = EvidenceUploader::default();
    let mut spreadsheet = pdf("scores.xlsx", 100);
    spreadsheet.content_type = "application/vnd.ms-excel".parse().expect("mime");

    let report = uploader
        .add_files(
            vec![
                pdf("ok.pdf", 100),
                pdf("huge.pdf", 11 * 1024 * 1024),
                spreadsheet,
            ],
            None,
        )
        .await;

    assert_eq!(report.admitted.len(), 1);
    assert_eq!(report.admitted[0].name, "ok.pdf");
    assert_eq!(report.admitted[0].content_type, "application/pdf");
    let messages: Vec<&str> = report
        .rejections
        .iter()
        .map(|rejection| rejection.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "File huge.pdf exceeds the maximum size of 10 MB",
            "File scores.xlsx has an unsupported type application/vnd.ms-excel",
        ]
    );
}

#[tokio::test]
async fn wildcard_types_match_whole_top_level_type() {
    let mut uploader = EvidenceUploader::new(EvidenceUploadConfig {
        accepted_types: vec![mime::IMAGE_STAR],
        ..EvidenceUploadConfig::default()
    });
    let mut gif = pdf("diagram.gif", 10);
    gif.content_type = mime::IMAGE_GIF;

    let report = uploader.add_files(vec![gif, pdf("doc.pdf", 10)], None).await;
    assert_eq!(report.admitted.len(), 1);
    assert_eq!(report.rejections.len(), 1);
}

#[tokio::test]
async fn upload_hook_runs_before_admission() {
    let store = RecordingStore::default();
    let mut uploader = EvidenceUploader::default();

    let report = uploader
        .add_files(vec![pdf("a.pdf", 1), pdf("b.pdf", 1)], Some(&store as &dyn EvidenceStore))
        .await;

    assert_eq!(report.admitted.len(), 2);
    assert_eq!(
        *store.batches.lock().expect("store mutex poisoned"),
        vec![vec!["a.pdf".to_string(), "b.pdf".to_string()]]
    );
    assert_eq!(uploader.files_for_question("q9").count(), 2);
}

#[tokio::test]
async fn failed_upload_hook_admits_nothing() {
    let store = RecordingStore {
        failure: Some("storage quota exceeded".to_string()),
        ..RecordingStore::default()
    };
    let mut uploader = EvidenceUploader::default();

    let report = uploader
        .add_files(vec![pdf("a.pdf", 1)], Some(&store as &dyn EvidenceStore))
        .await;

    assert!(report.admitted.is_empty());
    assert_eq!(report.rejections[0].message, "storage quota exceeded");
    assert!(uploader.files().is_empty());
}

#[tokio::test]
async fn remove_by_index() {
    let mut uploader = EvidenceUploader::default();
    uploader
        .add_files(vec![pdf("a.pdf", 1), pdf("b.pdf", 1)], None)
        .await;

    let removed = uploader.remove(0).expect("first file");
    assert_eq!(removed.name, "a.pdf");
    assert_eq!(uploader.files()[0].name, "b.pdf");
    assert!(uploader.remove(5).is_none());
}

#[test]
fn sizes_are_human_readable() {
    assert_eq!(format_size(10 * 1024 * 1024), "10 MB");
    assert_eq!(format_size(1_536), "1.5 KB");
    assert_eq!(format_size(512), "512 B");
}
