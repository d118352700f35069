use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use sprig_index::{
    FileStamp, IndexerConfig, MemorySourceStore, PipelineConfig, ProviderRegistry, SpringIndexer,
};
use sprig_scheduler::{CancellationToken, TaskError};

use super::pipeline::CancelAt;
use super::{component, uri};

fn indexer(store: Arc<MemorySourceStore>) -> SpringIndexer {
    SpringIndexer::new(IndexerConfig::default(), store).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn quiescence_publishes_the_finished_view() {
    let store = Arc::new(MemorySourceStore::new());
    store.insert(uri("Alpha.java"), component("Alpha"));
    store.insert(uri("Beta.java"), component("Beta"));
    let indexer = indexer(store);

    assert!(indexer.view().is_empty());
    let _first = indexer.index_file(uri("Alpha.java"), 1);
    let _second = indexer.index_file(uri("Beta.java"), 1);

    let view = indexer.wait_for_quiescence().await;
    assert!(indexer.is_quiescent());
    let mut names: Vec<_> = view.beans().map(|bean| bean.name().to_string()).collect();
    names.sort();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn index_file_reports_through_its_task() {
    let store = Arc::new(MemorySourceStore::new());
    store.insert(uri("Alpha.java"), component("Alpha"));
    let indexer = indexer(store);

    let report = indexer.index_file(uri("Alpha.java"), 1).join().await.unwrap();
    assert_eq!(report.indexed, vec![uri("Alpha.java")]);

    let report = indexer.index_file(uri("Alpha.java"), 1).join().await.unwrap();
    assert_eq!(report.reused, 1);

    assert!(indexer.remove_file(uri("Alpha.java")).join().await.unwrap());
    assert!(indexer.wait_for_quiescence().await.is_empty());
}

#[test]
fn cancelled_requests_do_not_block_quiescence() {
    let store = Arc::new(MemorySourceStore::new());
    store.insert(uri("Alpha.java"), component("Alpha"));
    let indexer = indexer(store);

    let token = CancellationToken::new();
    token.cancel();
    let task = indexer.index_files_with_token(vec![FileStamp::new(uri("Alpha.java"), 1)], token);
    assert_eq!(task.join_blocking().unwrap_err(), TaskError::Cancelled);

    let view = indexer
        .wait_for_quiescence_timeout(Duration::from_secs(10))
        .expect("indexer went idle");
    assert!(view.is_empty());
}

#[test]
fn invalid_pass_limits_are_rejected() {
    let config = IndexerConfig {
        pipeline: PipelineConfig {
            max_passes: 0,
            ..PipelineConfig::default()
        },
        ..IndexerConfig::default()
    };
    let store = Arc::new(MemorySourceStore::new());
    assert!(SpringIndexer::new(config, store).is_err());
}

#[test]
fn blocking_callers_see_the_same_view() {
    let store = Arc::new(MemorySourceStore::new());
    store.insert(uri("Alpha.java"), component("Alpha"));
    let indexer = indexer(store);

    let _task = indexer.index_file(uri("Alpha.java"), 3);
    let view = indexer.wait_for_quiescence_blocking();
    assert_eq!(view.file(&uri("Alpha.java")).map(|f| f.last_modified), Some(3));
    assert_eq!(view.symbols().count(), 1);
}

#[test]
fn cancelled_runs_leave_the_published_view_alone() {
    let store = Arc::new(MemorySourceStore::new());
    store.insert(uri("Alpha.java"), component("Alpha"));
    store.insert(uri("Beta.java"), component("Beta"));
    let token = CancellationToken::new();
    let cancel = CancelAt::new("Alpha", token.clone());
    let mut registry = ProviderRegistry::with_defaults().unwrap();
    registry.register_declaration(cancel.clone());
    let indexer =
        SpringIndexer::with_registry(registry, IndexerConfig::default(), store).unwrap();
    let stamps = |version| {
        vec![
            FileStamp::new(uri("Alpha.java"), version),
            FileStamp::new(uri("Beta.java"), version),
        ]
    };

    indexer.index_files(stamps(1)).join_blocking().unwrap();
    let before = indexer.view();

    cancel.arm();
    let result = indexer.index_files_with_token(stamps(2), token).join_blocking();
    assert_eq!(result.unwrap_err(), TaskError::Cancelled);
    assert!(Arc::ptr_eq(&before, &indexer.view()));
    assert_eq!(indexer.view().beans().count(), 2);

    let report = indexer.index_files(stamps(2)).join_blocking().unwrap();
    assert_eq!(report.indexed, vec![uri("Alpha.java"), uri("Beta.java")]);
    let view = indexer.view();
    let stamps: Vec<_> = view.files().map(|file| file.last_modified).collect();
    assert_eq!(stamps, vec![2, 2]);
}
