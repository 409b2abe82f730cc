//! The comment thread client: the render flow and the submit flow.

use crate::error::{Result, ThreadError};
use crate::models::{AuthToken, Comment, LoadOutcome, PendingSubmission, SubmitFlow};
use crate::render::Renderer;
use crate::report::{FailureReporter, LogReporter};
use crate::session::SessionState;
use crate::traits::{CommentSource, Page, RenderTarget};

/// Loads, renders and posts comments for one discussion thread
pub struct CommentThreadClient<'a> {
    source: &'a dyn CommentSource,
    reporter: &'a dyn FailureReporter,
    thread_id: u64,
    fallback_message: Option<String>,
}

impl<'a> CommentThreadClient<'a> {
    /// Failures are reported through [`LogReporter`] unless another reporter is set
    pub fn new(source: &'a dyn CommentSource, thread_id: u64) -> Self {
        Self {
            source,
            reporter: &LogReporter,
            thread_id,
            fallback_message: None,
        }
    }

    pub fn with_reporter(mut self, reporter: &'a dyn FailureReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Show `message` in the list container when the thread cannot be loaded
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = Some(message.into());
        self
    }

    pub fn fallback_message(&self) -> Option<&str> {
        self.fallback_message.as_deref()
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    /// Fetch the thread's comments in the order the remote returns them
    pub fn list_comments(
        &self,
        token: Option<&AuthToken>,
    ) -> Result<std::vec::IntoIter<Comment>> {
        tracing::debug!(thread = self.thread_id, authorized = token.is_some(), "listing comments");
        let comments = self.source.list_comments(self.thread_id, token)?;
        Ok(comments.into_iter())
    }

    /// Run the render flow.
    ///
    /// Failures never propagate: they go to the reporter, the fallback
    /// message (if any) is rendered, and `LoadOutcome::Failed` is returned.
    pub fn load(
        &self,
        session: &SessionState,
        renderer: &Renderer,
        target: &mut dyn RenderTarget,
    ) -> LoadOutcome {
        let token = session.token();
        let rendered = self
            .list_comments(token.as_ref())
            .and_then(|comments| renderer.render(comments, &mut *target));

        match rendered {
            Ok(count) => LoadOutcome::Rendered(count),
            Err(err) => {
                self.reporter.report(&err);
                if let Some(message) = &self.fallback_message {
                    if let Err(render_err) = renderer.render_fallback(message, target) {
                        self.reporter.report(&render_err);
                    }
                }
                LoadOutcome::Failed
            }
        }
    }

    /// Consume a pending submission carried by the session's URL fragment
    pub fn detect_pending_submission(
        &self,
        session: &mut SessionState,
    ) -> Result<Option<PendingSubmission>> {
        session.detect_pending_submission()
    }

    /// Post a comment and reload the page once the remote has answered.
    ///
    /// A rejected comment (any HTTP error status) still reloads the page;
    /// the rejection goes to the reporter. Only a request that never got
    /// an answer fails with `ThreadError::Submission` and leaves the page as is.
    pub fn submit_comment(&self, body: &str, token: &AuthToken, page: &mut dyn Page) -> Result<()> {
        match self.source.submit_comment(self.thread_id, body, token) {
            Ok(()) => {
                tracing::debug!(thread = self.thread_id, "comment submitted, reloading");
                page.reload();
                Ok(())
            }
            Err(err @ (ThreadError::Network(_) | ThreadError::Submission(_))) => {
                tracing::warn!(thread = self.thread_id, error = %err, "comment submission failed");
                Err(match err {
                    ThreadError::Submission(msg) => ThreadError::Submission(msg),
                    other => ThreadError::Submission(other.to_string()),
                })
            }
            Err(rejected) => {
                tracing::warn!(thread = self.thread_id, error = %rejected, "comment rejected, reloading");
                self.reporter.report(&rejected);
                page.reload();
                Ok(())
            }
        }
    }

    /// Run the submit flow for a freshly loaded page.
    ///
    /// A queued submission is replayed immediately. A malformed fragment is
    /// reported and leaves the form idle.
    pub fn resume(&self, session: &mut SessionState, page: &mut dyn Page) -> Result<SubmitFlow> {
        let flow = match session.plan_submission() {
            Ok(flow) => flow,
            Err(err) => {
                self.reporter.report(&err);
                return Ok(SubmitFlow::Idle);
            }
        };

        if let SubmitFlow::AutoSubmit(pending) = &flow {
            self.submit_comment(&pending.comment, &pending.auth_token(), page)?;
        }
        Ok(flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommentAuthor;
    use crate::render::CommentList;
    use crate::session::{CookieJar, TOKEN_COOKIE};
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        comments: Vec<Comment>,
        fail_list: bool,
        reject_submit: bool,
        drop_submit: bool,
        list_tokens: Mutex<Vec<Option<String>>>,
        posts: Mutex<Vec<(u64, String, String)>>,
    }

    impl CommentSource for FakeSource {
        fn list_comments(&self, _thread_id: u64, token: Option<&AuthToken>) -> Result<Vec<Comment>> {
            self.list_tokens
                .lock()
                .unwrap()
                .push(token.map(|t| t.as_str().to_string()));
            if self.fail_list {
                return Err(ThreadError::Network("connection refused".to_string()));
            }
            Ok(self.comments.clone())
        }

        fn submit_comment(&self, thread_id: u64, body: &str, token: &AuthToken) -> Result<()> {
            self.posts.lock().unwrap().push((
                thread_id,
                body.to_string(),
                token.as_str().to_string(),
            ));
            if self.drop_submit {
                return Err(ThreadError::Network("connection reset".to_string()));
            }
            if self.reject_submit {
                return Err(ThreadError::Api {
                    status: 422,
                    message: "Validation Failed".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        failures: RefCell<Vec<String>>,
    }

    impl FailureReporter for RecordingReporter {
        fn report(&self, failure: &ThreadError) {
            self.failures.borrow_mut().push(failure.to_string());
        }
    }

    #[derive(Default)]
    struct CountingPage {
        reloads: usize,
    }

    impl Page for CountingPage {
        fn reload(&mut self) {
            self.reloads += 1;
        }
    }

    fn comment(id: u32) -> Comment {
        Comment {
            id: id.to_string(),
            html_url: format!("https://github.com/o/r/issues/5#issuecomment-{}", id),
            body_html: format!("<p>comment {}</p>", id),
            created_at: Utc.with_ymd_and_hms(2021, 3, id, 12, 0, 0).unwrap(),
            author: CommentAuthor {
                login: "alice".to_string(),
                avatar_url: "https://avatars.example/u/1?v=4".to_string(),
                html_url: "https://github.com/alice".to_string(),
            },
        }
    }

    #[test]
    fn test_load_renders_in_received_order() {
        let source = FakeSource {
            comments: vec![comment(3), comment(1), comment(2)],
            ..Default::default()
        };
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 5).with_reporter(&reporter);
        let renderer = Renderer::new(None).unwrap();
        let mut list = CommentList::new();

        let outcome = client.load(&SessionState::default(), &renderer, &mut list);

        assert_eq!(outcome, LoadOutcome::Rendered(3));
        assert!(list.fragments()[0].contains("comment 3"));
        assert!(list.fragments()[1].contains("comment 1"));
        assert!(list.fragments()[2].contains("comment 2"));
        assert!(reporter.failures.borrow().is_empty());
        assert_eq!(*source.list_tokens.lock().unwrap(), vec![None]);
    }

    #[test]
    fn test_load_sends_stored_token() {
        let source = FakeSource::default();
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 5).with_reporter(&reporter);
        let renderer = Renderer::new(None).unwrap();
        let session = SessionState::new(CookieJar::parse("ghtoken=tok"));

        client.load(&session, &renderer, &mut CommentList::new());

        assert_eq!(
            *source.list_tokens.lock().unwrap(),
            vec![Some("tok".to_string())]
        );
    }

    #[test]
    fn test_load_failure_is_reported_not_raised() {
        let source = FakeSource {
            fail_list: true,
            ..Default::default()
        };
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 5).with_reporter(&reporter)
            .with_fallback_message("Comments could not be loaded.");
        let renderer = Renderer::new(None).unwrap();
        let mut list = CommentList::new();

        let outcome = client.load(&SessionState::default(), &renderer, &mut list);

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(reporter.failures.borrow().len(), 1);
        assert!(reporter.failures.borrow()[0].contains("connection refused"));
        assert_eq!(list.len(), 1);
        assert!(list.fragments()[0].contains("comments-error"));
    }

    #[test]
    fn test_load_failure_without_fallback_leaves_list_empty() {
        let source = FakeSource {
            fail_list: true,
            ..Default::default()
        };
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 5).with_reporter(&reporter);
        let mut list = CommentList::new();

        let outcome = client.load(&SessionState::default(), &Renderer::new(None).unwrap(), &mut list);

        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(list.is_empty());
    }

    #[test]
    fn test_submit_posts_once_and_reloads_once() {
        let source = FakeSource::default();
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 5).with_reporter(&reporter);
        let mut page = CountingPage::default();

        client
            .submit_comment("hello", &AuthToken::new("tok123"), &mut page)
            .unwrap();

        assert_eq!(
            *source.posts.lock().unwrap(),
            vec![(5, "hello".to_string(), "tok123".to_string())]
        );
        assert_eq!(page.reloads, 1);
    }

    #[test]
    fn test_submit_transport_failure_does_not_reload() {
        let source = FakeSource {
            drop_submit: true,
            ..Default::default()
        };
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 5).with_reporter(&reporter);
        let mut page = CountingPage::default();

        let err = client
            .submit_comment("hello", &AuthToken::new("tok123"), &mut page)
            .unwrap_err();

        assert!(matches!(err, ThreadError::Submission(_)));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(page.reloads, 0);
    }

    #[test]
    fn test_submit_rejected_by_remote_still_reloads() {
        let source = FakeSource {
            reject_submit: true,
            ..Default::default()
        };
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 5).with_reporter(&reporter);
        let mut page = CountingPage::default();

        client
            .submit_comment("hello", &AuthToken::new("tok123"), &mut page)
            .unwrap();

        assert_eq!(source.posts.lock().unwrap().len(), 1);
        assert_eq!(page.reloads, 1);
        assert_eq!(reporter.failures.borrow().len(), 1);
        assert!(reporter.failures.borrow()[0].contains("Validation Failed"));
    }

    #[test]
    fn test_resume_replays_pending_submission() {
        let source = FakeSource::default();
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 9).with_reporter(&reporter);
        let mut page = CountingPage::default();
        let mut session = SessionState::default()
            .with_fragment("#%7B%22token%22%3A%22abc%22%2C%22comment%22%3A%22hi%22%7D");

        let flow = client.resume(&mut session, &mut page).unwrap();

        assert!(matches!(flow, SubmitFlow::AutoSubmit(_)));
        assert_eq!(
            *source.posts.lock().unwrap(),
            vec![(9, "hi".to_string(), "abc".to_string())]
        );
        assert_eq!(page.reloads, 1);
        assert_eq!(session.cookies().get(TOKEN_COOKIE), Some("abc"));
        assert_eq!(session.fragment(), None);
    }

    #[test]
    fn test_resume_idle_without_token_or_fragment() {
        let source = FakeSource::default();
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 9).with_reporter(&reporter);
        let mut page = CountingPage::default();

        let flow = client.resume(&mut SessionState::default(), &mut page).unwrap();

        assert_eq!(flow, SubmitFlow::Idle);
        assert!(source.posts.lock().unwrap().is_empty());
        assert_eq!(page.reloads, 0);
    }

    #[test]
    fn test_resume_arms_form_with_stored_token() {
        let source = FakeSource::default();
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 9).with_reporter(&reporter);
        let mut page = CountingPage::default();
        let mut session = SessionState::new(CookieJar::parse("ghtoken=stored"));

        let flow = client.resume(&mut session, &mut page).unwrap();

        assert!(flow.is_armed());
        assert!(source.posts.lock().unwrap().is_empty());
        assert_eq!(page.reloads, 0);
    }

    #[test]
    fn test_resume_reports_malformed_fragment() {
        let source = FakeSource::default();
        let reporter = RecordingReporter::default();
        let client = CommentThreadClient::new(&source, 9).with_reporter(&reporter);
        let mut page = CountingPage::default();
        let mut session = SessionState::default().with_fragment("#%7Bbroken");

        let flow = client.resume(&mut session, &mut page).unwrap();

        assert_eq!(flow, SubmitFlow::Idle);
        assert_eq!(reporter.failures.borrow().len(), 1);
        assert!(source.posts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_load_failure_with_default_reporter() {
        let source = FakeSource {
            fail_list: true,
            ..Default::default()
        };
        let client = CommentThreadClient::new(&source, 5);

        let outcome = client.load(
            &SessionState::default(),
            &Renderer::new(None).unwrap(),
            &mut CommentList::new(),
        );

        assert_eq!(outcome, LoadOutcome::Failed);
    }
}
