//! Screening session: one signed-in user working through
//! upload → grade → store → notify → report → export, plus the assistant.
//!
//! The session owns the latest [`PredictionContext`]; a new prediction
//! replaces it wholesale. Resolvers only ever see it by reference.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::Connection;
use thiserror::Error;

use crate::chatbot::ChatSession;
use crate::config::{self, AppPaths};
use crate::db::{open_database, AccountError, AccountStore, DatabaseError, UserAccount};
use crate::models::PredictionContext;
use crate::providers::{Notifier, PredictionError, PredictionProvider};
use crate::report::{self, DocumentRenderer, Report, ReportError, NO_PREDICTION_NOTICE};

#[derive(Error, Debug)]
pub enum ScreeningError {
    #[error("File not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("An error occurred during prediction: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("There is no report to download")]
    NoPrediction,
}

/// Open the accounts database under `paths`, creating it on first use.
pub fn open_accounts_database(paths: &AppPaths) -> Result<Connection, DatabaseError> {
    open_database(&paths.database_path())
}

#[derive(Debug, Clone)]
pub struct ScreeningSession {
    user: UserAccount,
    latest: Option<PredictionContext>,
}

impl ScreeningSession {
    /// Authenticate and start a session.
    pub fn login(
        accounts: &AccountStore<'_>,
        username: &str,
        password: &str,
    ) -> Result<Self, ScreeningError> {
        let user = accounts.login(username, password)?;
        tracing::info!(username = %user.username, "session started");
        Ok(Self::for_user(user))
    }

    /// Start a session for an already-authenticated user.
    pub fn for_user(user: UserAccount) -> Self {
        Self { user, latest: None }
    }

    pub fn user(&self) -> &UserAccount {
        &self.user
    }

    pub fn latest(&self) -> Option<&PredictionContext> {
        self.latest.as_ref()
    }

    /// Grade an image, store the result, and announce it.
    ///
    /// A failed prediction or a failed write leaves the previous result in
    /// place. Notifier failures are logged and do not fail the call.
    pub fn upload_and_predict(
        &mut self,
        image_path: &Path,
        predictor: &dyn PredictionProvider,
        accounts: &AccountStore<'_>,
        notifier: &dyn Notifier,
        now: NaiveDateTime,
    ) -> Result<&PredictionContext, ScreeningError> {
        if !image_path.is_file() {
            return Err(ScreeningError::ImageNotFound(image_path.to_path_buf()));
        }

        tracing::info!(path = %image_path.display(), "processing image");
        let prediction = predictor.predict(image_path)?;
        let ctx = PredictionContext::new(
            prediction,
            self.user.username.clone(),
            Some(image_path.to_path_buf()),
        );

        accounts.record_prediction(&ctx, now)?;

        if let Err(e) = notifier.notify(ctx.severity(), ctx.class_name()) {
            tracing::warn!(error = %e, "failed to send notification");
        }

        Ok(&*self.latest.insert(ctx))
    }

    /// Short result line shown next to the uploaded image.
    pub fn result_summary(&self) -> Option<String> {
        self.latest.as_ref().map(|ctx| {
            format!(
                "Prediction Result:\n\nLabel: {}\nClass: {}",
                ctx.severity(),
                ctx.class_name()
            )
        })
    }

    /// Resolved report for the latest prediction.
    pub fn report(&self, now: NaiveDateTime) -> Option<Report> {
        self.latest
            .as_ref()
            .map(|ctx| report::resolve_context(ctx, now))
    }

    /// Report screen text; a notice when nothing has been graded yet.
    pub fn report_text(&self, now: NaiveDateTime) -> String {
        match self.report(now) {
            Some(report) => report.to_text(),
            None => NO_PREDICTION_NOTICE.to_string(),
        }
    }

    /// Render the latest report and write it into `dir`.
    pub fn export_report(
        &self,
        renderer: &dyn DocumentRenderer,
        dir: &Path,
        now: NaiveDateTime,
    ) -> Result<PathBuf, ScreeningError> {
        let report = self.report(now).ok_or(ScreeningError::NoPrediction)?;
        let bytes = renderer.render(&report.to_document())?;
        let filename = config::report_filename(&self.user.username);
        Ok(report::export_pdf_to_file(&bytes, &filename, dir)?)
    }

    /// Export into the configured exports directory.
    pub fn export_report_to(
        &self,
        renderer: &dyn DocumentRenderer,
        paths: &AppPaths,
        now: NaiveDateTime,
    ) -> Result<PathBuf, ScreeningError> {
        self.export_report(renderer, &paths.exports_dir(), now)
    }

    /// Open an assistant conversation primed with the latest result.
    pub fn open_chat(&self) -> ChatSession {
        ChatSession::open(self.latest.as_ref().map(PredictionContext::chat_context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Prediction, SeverityCode};
    use crate::providers::NotifyError;
    use crate::report::{ImageSource, PdfRenderer, ReportDocument};
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use std::cell::{Cell, RefCell};

    const FAST: u32 = 1_000;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    struct FixedPredictor(i64, &'static str);

    impl PredictionProvider for FixedPredictor {
        fn predict(&self, _image_path: &Path) -> Result<Prediction, PredictionError> {
            Ok(Prediction {
                severity: SeverityCode(self.0),
                class_name: self.1.into(),
            })
        }
    }

    struct BrokenPredictor;

    impl PredictionProvider for BrokenPredictor {
        fn predict(&self, image_path: &Path) -> Result<Prediction, PredictionError> {
            Err(PredictionError::UnreadableImage(image_path.display().to_string()))
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        calls: Cell<u32>,
        fail: bool,
    }

    impl Notifier for CountingNotifier {
        fn notify(&self, _severity: SeverityCode, _class_name: &str) -> Result<(), NotifyError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(NotifyError::Delivery("no signal".into()));
            }
            Ok(())
        }
    }

    /// Renderer that captures the document instead of producing a PDF.
    #[derive(Default)]
    struct CapturingRenderer {
        seen: RefCell<Option<ReportDocument>>,
    }

    impl DocumentRenderer for CapturingRenderer {
        fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
            *self.seen.borrow_mut() = Some(document.clone());
            Ok(b"%PDF-fake".to_vec())
        }
    }

    fn setup() -> (Connection, tempfile::TempDir, PathBuf) {
        let conn = open_memory_database().unwrap();
        AccountStore::with_iterations(&conn, FAST)
            .signup("alice", "pw")
            .unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let image = tmp.path().join("scan.png");
        std::fs::write(&image, b"scan").unwrap();
        (conn, tmp, image)
    }

    #[test]
    fn login_failure_is_surfaced() {
        let (conn, _tmp, _image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        assert!(matches!(
            ScreeningSession::login(&store, "alice", "wrong"),
            Err(ScreeningError::Account(AccountError::InvalidCredentials))
        ));
    }

    #[test]
    fn prediction_flows_to_store_and_notifier() {
        let (conn, _tmp, image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier::default();
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();

        let ctx = session
            .upload_and_predict(&image, &FixedPredictor(2, "Moderate"), &store, &notifier, now())
            .unwrap();
        assert_eq!(ctx.severity(), SeverityCode(2));
        assert_eq!(ctx.patient_id(), "alice");
        assert_eq!(ctx.image_path(), Some(image.as_path()));

        assert_eq!(notifier.calls.get(), 1);
        let latest = store.latest_prediction("alice").unwrap().unwrap();
        assert_eq!(latest.class_name, "Moderate");
        assert_eq!(
            session.result_summary().unwrap(),
            "Prediction Result:\n\nLabel: 2\nClass: Moderate"
        );
    }

    #[test]
    fn missing_image_is_rejected_before_prediction() {
        let (conn, tmp, _image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier::default();
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();

        let missing = tmp.path().join("nope.png");
        let result =
            session.upload_and_predict(&missing, &FixedPredictor(1, "Mild"), &store, &notifier, now());
        assert!(matches!(result, Err(ScreeningError::ImageNotFound(_))));
        assert_eq!(notifier.calls.get(), 0);
    }

    #[test]
    fn failed_prediction_keeps_previous_result() {
        let (conn, _tmp, image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier::default();
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();

        session
            .upload_and_predict(&image, &FixedPredictor(1, "Mild"), &store, &notifier, now())
            .unwrap();
        let result = session.upload_and_predict(&image, &BrokenPredictor, &store, &notifier, now());

        assert!(matches!(result, Err(ScreeningError::Prediction(_))));
        assert_eq!(session.latest().unwrap().class_name(), "Mild");
        assert_eq!(notifier.calls.get(), 1);
        assert_eq!(store.prediction_history("alice").unwrap().len(), 1);
    }

    #[test]
    fn notifier_failure_does_not_fail_prediction() {
        let (conn, _tmp, image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier {
            calls: Cell::new(0),
            fail: true,
        };
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();

        let result =
            session.upload_and_predict(&image, &FixedPredictor(4, "Proliferative DR"), &store, &notifier, now());
        assert!(result.is_ok());
        assert_eq!(notifier.calls.get(), 1);
    }

    #[test]
    fn new_prediction_replaces_context() {
        let (conn, _tmp, image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier::default();
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();

        session
            .upload_and_predict(&image, &FixedPredictor(0, "No DR"), &store, &notifier, now())
            .unwrap();
        session
            .upload_and_predict(&image, &FixedPredictor(3, "Severe"), &store, &notifier, now())
            .unwrap();
        assert_eq!(session.latest().unwrap().severity(), SeverityCode(3));
    }

    #[test]
    fn report_text_before_prediction() {
        let session = ScreeningSession::for_user(UserAccount {
            username: "alice".into(),
            created_at: "2026-01-01 00:00:00".into(),
        });
        assert_eq!(session.report_text(now()), NO_PREDICTION_NOTICE);
        assert!(session.result_summary().is_none());
    }

    #[test]
    fn export_without_prediction_fails() {
        let session = ScreeningSession::for_user(UserAccount {
            username: "alice".into(),
            created_at: "2026-01-01 00:00:00".into(),
        });
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            session.export_report(&PdfRenderer, tmp.path(), now()),
            Err(ScreeningError::NoPrediction)
        ));
    }

    #[test]
    fn report_and_export_after_prediction() {
        let (conn, tmp, image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier::default();
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();
        session
            .upload_and_predict(&image, &FixedPredictor(2, "Moderate"), &store, &notifier, now())
            .unwrap();

        let text = session.report_text(now());
        assert!(text.contains("Patient ID: alice"));
        assert!(text.contains("Prediction: Moderate (Severity Level: 2)"));

        let renderer = CapturingRenderer::default();
        let path = session
            .export_report(&renderer, &tmp.path().join("exports"), now())
            .unwrap();
        assert!(path.ends_with("Retinal_Report_alice.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-fake");

        let seen = renderer.seen.borrow();
        let doc = seen.as_ref().unwrap();
        assert_eq!(doc.image_source(), Some(&ImageSource::File { path: image }));
    }

    #[test]
    fn export_renders_real_pdf_when_image_deleted() {
        let (conn, tmp, image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier::default();
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();
        session
            .upload_and_predict(&image, &FixedPredictor(1, "Mild"), &store, &notifier, now())
            .unwrap();
        std::fs::remove_file(&image).unwrap();

        let path = session.export_report(&PdfRenderer, tmp.path(), now()).unwrap();
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
        assert!(!session.report(now()).unwrap().to_document().has_embedded_image());
    }

    #[test]
    fn chat_is_primed_with_latest_result() {
        let (conn, _tmp, image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier::default();
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();

        assert!(session.open_chat().context().is_none());

        session
            .upload_and_predict(&image, &FixedPredictor(0, "No DR"), &store, &notifier, now())
            .unwrap();
        let mut chat = session.open_chat();
        assert_eq!(chat.context().unwrap().class_name, "No DR");
        let reply = chat.send("tell me more").unwrap();
        assert!(reply.text.starts_with("That's great news!"));
    }

    #[test]
    fn failed_write_keeps_session_and_store_in_step() {
        let (conn, _tmp, image) = setup();
        let store = AccountStore::with_iterations(&conn, FAST);
        let notifier = CountingNotifier::default();
        let mut session = ScreeningSession::login(&store, "alice", "pw").unwrap();
        session
            .upload_and_predict(&image, &FixedPredictor(1, "Mild"), &store, &notifier, now())
            .unwrap();

        conn.execute_batch(
            "CREATE TRIGGER reject_predictions BEFORE INSERT ON predictions
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();
        let result =
            session.upload_and_predict(&image, &FixedPredictor(3, "Severe"), &store, &notifier, now());

        assert!(matches!(result, Err(ScreeningError::Account(_))));
        assert_eq!(session.latest().unwrap().class_name(), "Mild");
        let latest_class: String = conn
            .query_row("SELECT latest_class FROM users WHERE username = 'alice'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(latest_class, "Mild");
        assert_eq!(notifier.calls.get(), 1);
    }

    #[test]
    fn configured_layout_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(tmp.path());
        let conn = open_accounts_database(&paths).unwrap();
        assert!(paths.database_path().is_file());

        let store = AccountStore::with_iterations(&conn, FAST);
        store.signup("dana", "pw").unwrap();
        let image = tmp.path().join("scan.png");
        std::fs::write(&image, b"scan").unwrap();

        let mut session = ScreeningSession::login(&store, "dana", "pw").unwrap();
        session
            .upload_and_predict(&image, &FixedPredictor(2, "Moderate"), &store, &CountingNotifier::default(), now())
            .unwrap();

        let renderer = CapturingRenderer::default();
        let path = session.export_report_to(&renderer, &paths, now()).unwrap();
        assert_eq!(path, paths.exports_dir().join("Retinal_Report_dana.pdf"));
        assert!(path.is_file());
    }
}
