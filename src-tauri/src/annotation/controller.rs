use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;

use crate::{
    error::{CollaboratorError, ExportError, ValidationError},
    export::ExportSink,
    log_error, log_info,
    models::{ExportReceipt, ObserverRole},
};

use super::{
    marks::MarksSnapshot,
    metadata::MetadataSnapshot,
    session::{AnnotationSession, MarkOutcome, SessionInfo, UndoOutcome},
};

const ENABLE_LOGS: bool = true;

/// Serializes every mutation of the current [`AnnotationSession`] behind one lock
/// and hands export snapshots to the configured sink.
#[derive(Clone)]
pub struct AnnotationController {
    session: Arc<Mutex<AnnotationSession>>,
    sink: Arc<dyn ExportSink>,
}

impl AnnotationController {
    pub fn new(sink: Arc<dyn ExportSink>, debounce_secs: f64) -> Self {
        Self {
            session: Arc::new(Mutex::new(AnnotationSession::new(None, debounce_secs))),
            sink,
        }
    }

    /// Replaces the current session. Marks and the debounce window start empty;
    /// the observer's role and name carry over pre-filled.
    pub async fn begin_session(&self, video: Option<PathBuf>, debounce_secs: f64) -> SessionInfo {
        let mut guard = self.session.lock().await;
        *guard = guard.successor(video, debounce_secs);
        let info = guard.info();
        log_info!(
            "Started annotation session {} for {}",
            info.id,
            info.video_name.as_deref().unwrap_or("<no video>")
        );
        info
    }

    pub async fn session_info(&self) -> SessionInfo {
        self.session.lock().await.info()
    }

    /// Video the current session was started for, read from a blocking thread.
    pub fn current_video_blocking(&self) -> Option<PathBuf> {
        self.session.blocking_lock().video().map(Path::to_path_buf)
    }

    /// Applies a mark request and returns the marks as they stand right after it.
    pub async fn request_mark(
        &self,
        time: f64,
    ) -> Result<(MarkOutcome, MarksSnapshot), ValidationError> {
        let (outcome, marks) = {
            let mut guard = self.session.lock().await;
            let outcome = guard.request_mark(time)?;
            (outcome, guard.marks())
        };
        match &outcome {
            MarkOutcome::Accepted { time, count } => {
                log::debug!("Marked @ {time:.3}s ({count} total)")
            }
            MarkOutcome::Debounced { time, .. } => log::debug!("Debounced mark @ {time:.3}s"),
        }
        Ok((outcome, marks))
    }

    pub async fn request_undo(&self) -> (UndoOutcome, MarksSnapshot) {
        let (outcome, marks) = {
            let mut guard = self.session.lock().await;
            let outcome = guard.request_undo();
            (outcome, guard.marks())
        };
        if let UndoOutcome::Removed { time, count } = &outcome {
            log_info!("Undid mark @ {time:.3}s ({count} remaining)");
        }
        (outcome, marks)
    }

    pub async fn marks(&self) -> MarksSnapshot {
        self.session.lock().await.marks()
    }

    pub async fn select_role(
        &self,
        role: ObserverRole,
        pgy_year: Option<&str>,
    ) -> Result<MetadataSnapshot, ValidationError> {
        let mut guard = self.session.lock().await;
        guard.metadata_mut().select_role(role, pgy_year)?;
        let snapshot = guard.metadata_snapshot();
        log_info!("Role selected: {}", snapshot.label);
        Ok(snapshot)
    }

    pub async fn set_observer_name(&self, name: Option<&str>) -> MetadataSnapshot {
        let mut guard = self.session.lock().await;
        guard.metadata_mut().set_observer_name(name);
        guard.metadata_snapshot()
    }

    pub async fn metadata(&self) -> MetadataSnapshot {
        self.session.lock().await.metadata_snapshot()
    }

    /// Exports the marks present when this call takes its snapshot. Marks added
    /// while the sink is writing belong to the next export.
    pub async fn request_export(
        &self,
        destination: Option<PathBuf>,
    ) -> Result<ExportReceipt, ExportError> {
        let request = self.session.lock().await.export_request()?;

        let sink = Arc::clone(&self.sink);
        let receipt = tokio::task::spawn_blocking(move || {
            sink.write_export(&request, destination.as_deref())
        })
        .await
        .map_err(|err| CollaboratorError::export(format!("export task failed: {err}")))?
        .map_err(|err| {
            log_error!("Export failed: {err}");
            err
        })?;

        log_info!(
            "Saved {} marks to {}",
            receipt.count,
            receipt.saved_to.display()
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExportRequest;
    use std::sync::{mpsc, Mutex as StdMutex};

    #[derive(Default)]
    struct RecordingSink {
        written: StdMutex<Vec<ExportRequest>>,
        fail_with: Option<String>,
    }

    impl ExportSink for RecordingSink {
        fn write_export(
            &self,
            request: &ExportRequest,
            destination: Option<&Path>,
        ) -> Result<ExportReceipt, CollaboratorError> {
            if let Some(message) = &self.fail_with {
                return Err(CollaboratorError::export(message.clone()));
            }
            self.written
                .lock()
                .expect("sink lock")
                .push(request.clone());
            Ok(ExportReceipt {
                count: request.rows.len(),
                saved_to: destination
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("/default/marks.csv")),
            })
        }
    }

    fn controller_with(sink: Arc<RecordingSink>) -> AnnotationController {
        AnnotationController::new(sink, 0.25)
    }

    #[tokio::test]
    async fn accepts_marks_past_the_debounce_window() {
        let controller = controller_with(Arc::new(RecordingSink::default()));
        let times = [1.000, 1.100, 1.400, 1.500, 2.000];
        let mut accepted = Vec::new();
        for t in times {
            if let Ok((MarkOutcome::Accepted { time, .. }, _)) = controller.request_mark(t).await {
                accepted.push(time);
            }
        }
        assert_eq!(accepted, vec![1.000, 1.400, 2.000]);
        assert_eq!(controller.marks().await.marks, accepted);
    }

    #[tokio::test]
    async fn export_scenario_produces_single_resident_row() {
        let sink = Arc::new(RecordingSink::default());
        let controller = controller_with(sink.clone());

        controller.request_mark(1.000).await.expect("valid");
        controller.request_mark(1.100).await.expect("valid");
        controller.request_mark(1.400).await.expect("valid");
        assert!(matches!(
            controller.request_undo().await.0,
            UndoOutcome::Removed { count: 1, .. }
        ));

        controller
            .select_role(ObserverRole::Resident, Some("3"))
            .await
            .expect("valid role");
        let receipt = controller
            .request_export(Some(PathBuf::from("/tmp/out.csv")))
            .await
            .expect("export ok");

        assert_eq!(receipt.count, 1);
        assert_eq!(receipt.saved_to, PathBuf::from("/tmp/out.csv"));
        let written = sink.written.lock().expect("sink lock");
        let row = &written[0].rows[0];
        assert_eq!(
            (row.index, row.formatted_timestamp(), row.role, row.pgy_year.map(|y| y.get())),
            (1, "1.000".to_string(), ObserverRole::Resident, Some(3))
        );
    }

    #[tokio::test]
    async fn export_without_role_is_a_validation_error() {
        let sink = Arc::new(RecordingSink::default());
        let controller = controller_with(sink.clone());
        controller.request_mark(3.0).await.expect("valid");

        let err = controller.request_export(None).await.expect_err("no role");
        assert_eq!(err, ExportError::Validation(ValidationError::RoleNotSelected));
        assert!(sink.written.lock().expect("sink lock").is_empty());
    }

    #[tokio::test]
    async fn sink_failure_leaves_marks_intact() {
        let sink = Arc::new(RecordingSink {
            fail_with: Some("disk full".into()),
            ..Default::default()
        });
        let controller = controller_with(sink);
        controller.request_mark(3.0).await.expect("valid");
        controller
            .select_role(ObserverRole::Attending, None)
            .await
            .expect("attending");

        let err = controller.request_export(None).await.expect_err("sink fails");
        assert!(matches!(err, ExportError::Collaborator(_)));
        assert_eq!(controller.marks().await.count, 1);
    }

    #[tokio::test]
    async fn new_session_resets_marks_but_keeps_role() {
        let controller = controller_with(Arc::new(RecordingSink::default()));
        controller.request_mark(5.0).await.expect("valid");
        controller
            .select_role(ObserverRole::Resident, Some("4"))
            .await
            .expect("valid role");
        controller.set_observer_name(Some("Smith")).await;

        let info = controller
            .begin_session(Some(PathBuf::from("/videos/next.mp4")), 0.25)
            .await;
        assert_eq!(info.mark_count, 0);
        assert_eq!(info.role_label, "Resident/Fellow PGY4");

        // Fresh debounce window: an earlier time is accepted again.
        assert!(matches!(
            controller.request_mark(1.0).await,
            Ok((MarkOutcome::Accepted { count: 1, .. }, _))
        ));
        assert_eq!(
            controller.metadata().await.observer_name.as_deref(),
            Some("Smith")
        );
    }

    #[tokio::test]
    async fn undo_on_empty_reports_nothing_to_undo() {
        let controller = controller_with(Arc::new(RecordingSink::default()));
        let (outcome, marks) = controller.request_undo().await;
        assert_eq!(outcome, UndoOutcome::NothingToUndo);
        assert_eq!(marks.revision, 0);
    }

    #[tokio::test]
    async fn invalid_role_keeps_previous_selection() {
        let controller = controller_with(Arc::new(RecordingSink::default()));
        controller
            .select_role(ObserverRole::Attending, None)
            .await
            .expect("attending");
        assert!(controller
            .select_role(ObserverRole::Resident, Some("0"))
            .await
            .is_err());
        assert_eq!(controller.metadata().await.label, "Attending");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_undos_each_report_their_own_result() {
        let controller = controller_with(Arc::new(RecordingSink::default()));
        for i in 0..20 {
            controller.request_mark(i as f64).await.expect("valid");
        }

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let controller = controller.clone();
                tokio::spawn(async move { controller.request_undo().await })
            })
            .collect();

        let mut snapshots = Vec::new();
        for handle in handles {
            let (outcome, marks) = handle.await.expect("join");
            match outcome {
                UndoOutcome::Removed { count, .. } => assert_eq!(marks.count, count),
                UndoOutcome::NothingToUndo => panic!("twenty marks cover twenty undos"),
            }
            snapshots.push(marks);
        }

        snapshots.sort_by_key(|marks| marks.revision);
        for pair in snapshots.windows(2) {
            assert!(pair[0].revision < pair[1].revision);
            assert_eq!(pair[0].count, pair[1].count + 1);
        }
        let newest = snapshots.last().expect("twenty snapshots");
        assert_eq!(newest.count, 0);
        assert_eq!(&controller.marks().await, newest);
    }

    /// Sink that parks inside `write_export` until the test releases it.
    struct ParkedSink {
        entered: StdMutex<mpsc::Sender<()>>,
        release: StdMutex<mpsc::Receiver<()>>,
        written: StdMutex<Vec<ExportRequest>>,
    }

    impl ExportSink for ParkedSink {
        fn write_export(
            &self,
            request: &ExportRequest,
            _destination: Option<&Path>,
        ) -> Result<ExportReceipt, CollaboratorError> {
            self.entered
                .lock()
                .expect("entered lock")
                .send(())
                .expect("test is waiting");
            self.release
                .lock()
                .expect("release lock")
                .recv()
                .expect("test releases the sink");
            self.written
                .lock()
                .expect("sink lock")
                .push(request.clone());
            Ok(ExportReceipt {
                count: request.rows.len(),
                saved_to: PathBuf::from("/default/marks.csv"),
            })
        }
    }

    #[tokio::test]
    async fn marks_added_during_an_export_are_left_for_the_next_one() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let sink = Arc::new(ParkedSink {
            entered: StdMutex::new(entered_tx),
            release: StdMutex::new(release_rx),
            written: StdMutex::new(Vec::new()),
        });
        let controller = AnnotationController::new(sink.clone(), 0.25);
        controller.request_mark(1.0).await.expect("valid");
        controller
            .select_role(ObserverRole::Attending, None)
            .await
            .expect("attending");

        let exporting = tokio::spawn({
            let controller = controller.clone();
            async move { controller.request_export(None).await }
        });
        tokio::task::spawn_blocking(move || entered_rx.recv())
            .await
            .expect("join")
            .expect("sink entered");

        // The sink is mid-write; marking must neither block nor leak into it.
        let (outcome, _) = controller.request_mark(2.0).await.expect("valid");
        assert!(matches!(outcome, MarkOutcome::Accepted { count: 2, .. }));

        release_tx.send(()).expect("sink waiting");
        let receipt = exporting.await.expect("join").expect("export ok");

        assert_eq!(receipt.count, 1);
        let written = sink.written.lock().expect("sink lock");
        let exported: Vec<f64> = written[0].rows.iter().map(|row| row.timestamp).collect();
        assert_eq!(exported, vec![1.0]);
        assert_eq!(controller.marks().await.marks, vec![1.0, 2.0]);
    }
}
