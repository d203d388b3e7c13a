//! Job lifecycle integration tests.
//!
//! These tests drive the orchestrator end to end with mock converter and archiver:
//! - Status transitions (pending -> processing -> completed/error)
//! - Outcome decided by movements on disk, not by exit code
//! - Concurrent submissions and id uniqueness
//! - Bundle building

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use partitura_core::{
    job::{JobState, JobStatus},
    testing::{MockArchiver, MockConverter},
    InMemoryJobRegistry, JobOrchestrator, JobRegistry, JobSpawner, JobsConfig,
    OrchestratorConfig, OrchestratorError, StorageConfig, StorageLayout,
};

/// Test helper wiring an orchestrator to mocks in a temp directory.
struct TestHarness {
    orchestrator: Arc<JobOrchestrator>,
    registry: Arc<InMemoryJobRegistry>,
    archiver: Arc<MockArchiver>,
    _temp_dir: TempDir,
}

impl TestHarness {
    async fn new(converter: MockConverter) -> Self {
        Self::with_jobs(converter, JobsConfig::default()).await
    }

    async fn with_jobs(converter: MockConverter, jobs: JobsConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let layout = StorageLayout::new(StorageConfig::with_dirs(
            temp_dir.path().join("uploads"),
            temp_dir.path().join("downloads"),
        ));
        layout.ensure_roots().await.expect("Failed to create storage roots");

        let registry = Arc::new(InMemoryJobRegistry::new());
        let archiver = Arc::new(MockArchiver::new());
        let spawner = JobSpawner::new(registry.clone(), &jobs);

        let orchestrator = JobOrchestrator::new(
            OrchestratorConfig::default(),
            layout,
            registry.clone(),
            Arc::new(converter),
            archiver.clone(),
            spawner,
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            registry,
            archiver,
            _temp_dir: temp_dir,
        }
    }

    /// Poll until the job reaches a terminal state, recording every distinct state seen.
    async fn wait_for_terminal(&self, id: &str) -> (JobStatus, Vec<JobState>) {
        let mut seen = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

        while tokio::time::Instant::now() < deadline {
            if let Some(status) = self.orchestrator.status(id) {
                if seen.last() != Some(&status.status) {
                    seen.push(status.status);
                }
                if status.is_terminal() {
                    return (status, seen);
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("Job {} did not reach a terminal state", id);
    }
}

#[tokio::test]
async fn test_submission_returns_before_conversion_finishes() {
    let harness =
        TestHarness::new(MockConverter::new().with_movements(1).with_delay(Duration::from_millis(300)))
            .await;

    let id = harness.orchestrator.submit("score.pdf", b"%PDF-1.4").await.unwrap();

    let status = harness.orchestrator.status(&id).expect("status recorded at submit");
    assert!(!status.is_terminal());
    assert_eq!(harness.orchestrator.active_jobs(), 1);

    let (status, _) = harness.wait_for_terminal(&id).await;
    assert_eq!(status.status, JobState::Completed);
}

#[tokio::test]
async fn test_transitions_are_ordered() {
    let harness =
        TestHarness::new(MockConverter::new().with_movements(2).with_delay(Duration::from_millis(100)))
            .await;

    let id = harness.orchestrator.submit("score.pdf", b"%PDF").await.unwrap();
    let (status, seen) = harness.wait_for_terminal(&id).await;

    assert_eq!(status.movement_count, Some(2));
    assert_eq!(seen.last(), Some(&JobState::Completed));
    assert!(seen.contains(&JobState::Processing));
    let order = |s: &JobState| match s {
        JobState::Pending => 0,
        JobState::Processing => 1,
        JobState::Completed | JobState::Error => 2,
    };
    assert!(seen.windows(2).all(|w| order(&w[0]) < order(&w[1])));
}

#[tokio::test]
async fn test_terminal_status_is_stable() {
    let harness = TestHarness::new(MockConverter::new().with_exit_code(2)).await;

    let id = harness.orchestrator.submit("score.pdf", b"%PDF").await.unwrap();
    let (first, _) = harness.wait_for_terminal(&id).await;

    assert_eq!(first.status, JobState::Error);
    assert_eq!(
        first.message,
        "conversion failed - no movements generated (exec error: exit status 2)"
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(harness.orchestrator.status(&id), Some(first));
}

#[tokio::test]
async fn test_movements_decide_outcome_over_exit_code() {
    let harness = TestHarness::new(MockConverter::new().with_movements(4).with_exit_code(1)).await;

    let id = harness.orchestrator.submit("score.pdf", b"%PDF").await.unwrap();
    let (status, _) = harness.wait_for_terminal(&id).await;

    assert_eq!(status.status, JobState::Completed);
    assert_eq!(status.message, "completed with errors (exit status 1)");
    assert_eq!(status.movement_count, Some(4));
}

#[tokio::test]
async fn test_concurrent_submissions_get_unique_ids() {
    let harness = TestHarness::new(MockConverter::new().with_movements(1)).await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let orchestrator = Arc::clone(&harness.orchestrator);
            tokio::spawn(async move {
                orchestrator
                    .submit(&format!("score-{}.pdf", i), b"%PDF")
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 20);

    for id in &ids {
        let (status, _) = harness.wait_for_terminal(id).await;
        assert_eq!(status.status, JobState::Completed);
    }
    assert_eq!(harness.registry.len(), 20);
}

#[tokio::test]
async fn test_concurrency_limit_still_finishes_all_jobs() {
    let harness = TestHarness::with_jobs(
        MockConverter::new().with_movements(1).with_delay(Duration::from_millis(20)),
        JobsConfig { max_concurrent: 2 },
    )
    .await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(harness.orchestrator.submit("score.pdf", b"%PDF").await.unwrap());
    }
    for id in &ids {
        let (status, _) = harness.wait_for_terminal(id).await;
        assert_eq!(status.status, JobState::Completed);
    }
}

#[tokio::test]
async fn test_unknown_id_is_never_found() {
    let harness = TestHarness::new(MockConverter::new()).await;
    harness.orchestrator.submit("score.pdf", b"%PDF").await.unwrap();

    assert!(harness
        .orchestrator
        .status("123e4567-e89b-42d3-a456-426614174000")
        .is_none());
}

#[tokio::test]
async fn test_download_flow() {
    let harness = TestHarness::new(MockConverter::new().with_movements(2)).await;

    let id = harness.orchestrator.submit("score.pdf", b"%PDF").await.unwrap();
    harness.wait_for_terminal(&id).await;

    let bundle = harness.orchestrator.bundle(&id).await.unwrap();
    let contents = std::fs::read_to_string(&bundle).unwrap();
    assert_eq!(contents, "PK\nmovement-1.mxl\nmovement-2.mxl\n");

    // Log file and earlier bundle never end up inside the bundle.
    harness.orchestrator.bundle(&id).await.unwrap();
    let archives = harness.archiver.recorded_archives().await;
    assert_eq!(archives.len(), 2);
    assert!(archives[1]
        .sources
        .iter()
        .all(|p| p.extension().and_then(|e| e.to_str()) == Some("mxl")));
}

#[tokio::test]
async fn test_download_without_movements_is_not_found() {
    let harness = TestHarness::new(MockConverter::new()).await;

    let id = harness.orchestrator.submit("score.pdf", b"%PDF").await.unwrap();
    harness.wait_for_terminal(&id).await;

    let result = harness.orchestrator.bundle(&id).await;
    assert!(matches!(result, Err(OrchestratorError::NoArtifacts(_))));
}
