use std::sync::Arc;

use quiz_core::model::{ModuleEntry, ModuleId, QuestionId, RawQuestionRecord};
use services::{
    Advance, AnomalyKind, CapturingReporter, ModuleCatalog, ProgressService, QuestionStore,
    QuizLoopService, RecordingNavigator, Route, StaticDatasetLoader,
};
use storage::repository::{InMemoryKeyValueStore, KeyValueStore};

fn record(text: &str, year: &str, chapter: &str) -> RawQuestionRecord {
    RawQuestionRecord {
        question_text: text.to_string(),
        year_asked: year.to_string(),
        subtopic: chapter.to_string(),
        choice_a_text: "Alpha".to_string(),
        choice_a_is_correct: true,
        choice_b_text: "Beta".to_string(),
        choice_c_text: "Gamma".to_string(),
        ..RawQuestionRecord::default()
    }
}

struct Harness {
    quiz_loop: QuizLoopService,
    store: InMemoryKeyValueStore,
    navigator: RecordingNavigator,
    reporter: CapturingReporter,
}

fn harness(records: Vec<RawQuestionRecord>) -> Harness {
    let catalog = ModuleCatalog::from_entries(vec![ModuleEntry::new(
        ModuleId::new(1),
        "Pathologie digestive",
        "3ème année",
        "Annales",
        "3ème année",
        "demo",
    )]);
    let loader = StaticDatasetLoader::new().with_dataset("demo", records);
    let store = InMemoryKeyValueStore::new();
    let navigator = RecordingNavigator::new();
    let reporter = CapturingReporter::new();

    let question_store = Arc::new(QuestionStore::new(
        Arc::new(loader),
        Arc::new(reporter.clone()),
    ));
    let progress = Arc::new(ProgressService::new(
        Arc::new(store.clone()),
        Arc::new(reporter.clone()),
    ));
    let quiz_loop = QuizLoopService::new(
        catalog,
        question_store,
        progress,
        Arc::new(navigator.clone()),
        Arc::new(reporter.clone()),
    );

    Harness {
        quiz_loop,
        store,
        navigator,
        reporter,
    }
}

#[tokio::test]
async fn full_quiz_run_persists_mastery_and_routes_home() {
    let harness = harness(vec![
        record("Q1", "Février 2024", "Foie"),
        record("Q2", "Février 2024", "Foie"),
    ]);
    let mut session = harness.quiz_loop.open_module(ModuleId::new(1)).await;
    assert_eq!(session.total_questions(), 2);

    // Answer the first question correctly: canonical option 0, wherever it
    // is presented.
    let slot = session
        .presentation()
        .unwrap()
        .presentation_index(0)
        .unwrap();
    session.toggle_selection(slot);
    let evaluation = harness.quiz_loop.reveal_current(&mut session).await.unwrap();
    assert!(evaluation.is_fully_correct);

    // Answer the second question incorrectly.
    assert_eq!(harness.quiz_loop.advance(&mut session), Advance::Moved);
    let wrong = session
        .presentation()
        .unwrap()
        .presentation_index(1)
        .unwrap();
    session.toggle_selection(wrong);
    let evaluation = harness.quiz_loop.reveal_current(&mut session).await.unwrap();
    assert!(!evaluation.is_fully_correct);

    // Completing the run routes back to the dashboard.
    assert_eq!(harness.quiz_loop.advance(&mut session), Advance::Completed);
    assert_eq!(harness.navigator.requested(), vec![Route::Dashboard]);

    let progress = session.progress();
    assert_eq!(progress.score, 1);
    assert_eq!(progress.answered, 2);
    assert_eq!(progress.mastered, 1);

    // Mastery survived into durable storage under the documented record key.
    let raw = harness
        .store
        .get("learnfmpa_answered_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw, r#"{"1_0":true}"#);

    // A reopened session sees the durable mastery.
    let reopened = harness.quiz_loop.open_module(ModuleId::new(1)).await;
    assert!(
        reopened
            .mastery()
            .contains(ModuleId::new(1), &QuestionId::new("0"))
    );
}

#[tokio::test]
async fn unknown_module_yields_an_empty_reported_session() {
    let harness = harness(vec![record("Q1", "Février 2024", "Foie")]);

    let session = harness.quiz_loop.open_module(ModuleId::new(42)).await;

    assert!(session.is_empty());
    assert!(harness.reporter.has_kind(AnomalyKind::DatasetUnavailable));
    assert!(harness.navigator.requested().is_empty());
}

#[tokio::test]
async fn failed_dataset_load_degrades_to_empty() {
    let catalog = ModuleCatalog::from_entries(vec![ModuleEntry::new(
        ModuleId::new(1),
        "Demo",
        "s",
        "d",
        "y",
        "missing-dataset",
    )]);
    let reporter = CapturingReporter::new();
    let quiz_loop = QuizLoopService::new(
        catalog,
        Arc::new(QuestionStore::new(
            Arc::new(StaticDatasetLoader::new()),
            Arc::new(reporter.clone()),
        )),
        Arc::new(ProgressService::new(
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(reporter.clone()),
        )),
        Arc::new(RecordingNavigator::new()),
        Arc::new(reporter.clone()),
    );

    let session = quiz_loop.open_module(ModuleId::new(1)).await;

    assert!(session.is_empty());
    assert!(reporter.has_kind(AnomalyKind::DatasetUnavailable));
}

#[tokio::test]
async fn corrupt_progress_record_does_not_break_module_opening() {
    let harness = harness(vec![record("Q1", "Février 2024", "Foie")]);
    harness
        .store
        .set("learnfmpa_answered_1", "{broken json")
        .await
        .unwrap();

    let session = harness.quiz_loop.open_module(ModuleId::new(1)).await;

    assert_eq!(session.total_questions(), 1);
    assert!(session.mastery().is_empty());
    assert!(harness.reporter.has_kind(AnomalyKind::CorruptProgressData));
}

#[tokio::test]
async fn confirmed_reset_clears_only_this_module() {
    let harness = harness(vec![record("Q1", "Février 2024", "Foie")]);
    harness
        .store
        .set("learnfmpa_answered_2", r#"{"2_3":true}"#)
        .await
        .unwrap();

    let mut session = harness.quiz_loop.open_module(ModuleId::new(1)).await;
    let slot = session
        .presentation()
        .unwrap()
        .presentation_index(0)
        .unwrap();
    session.toggle_selection(slot);
    harness.quiz_loop.reveal_current(&mut session).await.unwrap();
    assert!(
        harness
            .store
            .get("learnfmpa_answered_1")
            .await
            .unwrap()
            .is_some()
    );

    // Confirm without a request is a no-op.
    harness.quiz_loop.confirm_reset(&mut session).await;
    assert!(!session.mastery().is_empty());

    // Cancel keeps everything.
    harness.quiz_loop.request_reset(&mut session);
    harness.quiz_loop.cancel_reset(&mut session);
    assert!(!session.mastery().is_empty());

    // Request then confirm clears memory and storage for module 1 only.
    harness.quiz_loop.request_reset(&mut session);
    harness.quiz_loop.confirm_reset(&mut session).await;
    assert!(session.mastery().is_empty());
    assert_eq!(harness.store.get("learnfmpa_answered_1").await.unwrap(), None);
    assert_eq!(
        harness.store.get("learnfmpa_answered_2").await.unwrap(),
        Some(r#"{"2_3":true}"#.to_string())
    );
}

#[tokio::test]
async fn reopening_a_module_reuses_the_cached_dataset() {
    let catalog = ModuleCatalog::from_entries(vec![ModuleEntry::new(
        ModuleId::new(1),
        "Demo",
        "s",
        "d",
        "y",
        "demo",
    )]);
    let loader = Arc::new(
        StaticDatasetLoader::new().with_dataset("demo", vec![record("Q1", "Février 2024", "Foie")]),
    );
    let reporter = CapturingReporter::new();
    let quiz_loop = QuizLoopService::new(
        catalog,
        Arc::new(QuestionStore::new(
            loader.clone(),
            Arc::new(reporter.clone()),
        )),
        Arc::new(ProgressService::new(
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(reporter.clone()),
        )),
        Arc::new(RecordingNavigator::new()),
        Arc::new(reporter),
    );

    let first = quiz_loop.open_module(ModuleId::new(1)).await;
    let second = quiz_loop.open_module(ModuleId::new(1)).await;

    assert_eq!(first.questions(), second.questions());
    assert_eq!(loader.fetch_count(), 1);
}
