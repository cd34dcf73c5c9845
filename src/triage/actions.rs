//! Mutations: single and bulk actions, undo, task conversion
//!
//! Single actions are optimistic. The remote call goes first, the row
//! lingers for the transition delay, then leaves the list with an undo
//! offer. Bulk actions remove all successes in one step and carry no undo.

use std::collections::HashSet;

use chrono::Local;
use futures::future::join_all;

use super::{Leaving, Triage, TriageError};
use crate::clock::Clock;
use crate::mail::gateway::{GatewayError, MailGateway, RemoteAction};
use crate::mail::types::MessageId;
use crate::score::Scorer;
use crate::tasks::{DueChoice, TaskDraft, TaskSink};

/// What a user can do to a message from the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailAction {
    MarkRead,
    Archive,
}

impl MailAction {
    pub fn remote(self) -> RemoteAction {
        match self {
            MailAction::MarkRead => RemoteAction::MarkRead,
            MailAction::Archive => RemoteAction::Archive,
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            MailAction::MarkRead => "Marked as read",
            MailAction::Archive => "Archived",
        }
    }
}

impl<G, S, T, C> Triage<G, S, T, C>
where
    G: MailGateway,
    S: Scorer,
    T: TaskSink,
    C: Clock,
{
    /// Apply `action` to one message.
    ///
    /// On success the row is scheduled to leave after the transition delay;
    /// [`Triage::tick`] removes it and arms the undo window. On failure the
    /// list is untouched and an error notice is shown.
    pub async fn apply_action(
        &mut self,
        action: MailAction,
        id: &MessageId,
    ) -> Result<(), TriageError> {
        if !self.store.contains(id) {
            return Err(TriageError::NotInList(id.clone()));
        }
        if self.is_leaving(id) {
            tracing::debug!("{} is already leaving, ignoring {:?}", id, action);
            return Ok(());
        }

        let remote = action.remote();
        let result = self.gateway.apply(remote, id).await;
        let now = self.clock.now();
        match result {
            Ok(()) => {
                self.leaving.push(Leaving {
                    id: id.clone(),
                    action: remote,
                    due: now + self.timings.transition,
                });
                Ok(())
            }
            Err(e) => {
                let err = TriageError::remote(remote.verb(), e);
                tracing::warn!("{} on {}: {}", remote.verb(), id, err);
                self.notice.error(failure_notice(&err, remote.verb()), now);
                Err(err)
            }
        }
    }

    /// Reverse the removal of `id` if its undo window is still open.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. A failed inverse
    /// call leaves the entry in place so it can be retried until it expires.
    pub async fn undo(&mut self, id: &MessageId) -> Result<bool, TriageError> {
        let Some(inverse) = self.undo.live(id, self.clock.now()).map(|e| e.inverse) else {
            tracing::debug!("No live undo entry for {}", id);
            return Ok(false);
        };

        let result = self.gateway.apply(inverse, id).await;
        match result {
            Ok(()) => {
                if let Some(entry) = self.undo.take(id) {
                    let index = self.reinsert(entry.message, entry.index);
                    tracing::debug!("Restored {} at {}", id, index);
                }
                self.notice.cancel_undo_for(id);
                Ok(true)
            }
            Err(e) => {
                let err = TriageError::remote("undo", e);
                tracing::warn!("Undo of {} failed: {}", id, err);
                self.notice
                    .error(failure_notice(&err, "undo"), self.clock.now());
                Err(err)
            }
        }
    }

    /// Apply `action` to every id concurrently and drop the successes from
    /// the list in one step. Always leaves multi-select.
    ///
    /// Failed ids stay in the list. No undo is offered for bulk actions.
    pub async fn apply_bulk(
        &mut self,
        action: MailAction,
        ids: &[MessageId],
    ) -> Result<usize, TriageError> {
        let targets = self.known_unique(ids);
        if targets.is_empty() {
            self.selection.clear();
            return Ok(0);
        }
        let remote = action.remote();

        let results = join_all(targets.iter().map(|id| self.gateway.apply(remote, id))).await;

        let mut done = HashSet::new();
        let mut errors = Vec::new();
        for (id, result) in targets.iter().zip(results) {
            match result {
                Ok(()) => {
                    done.insert(id.clone());
                }
                Err(e) => {
                    tracing::warn!("{} on {} failed: {}", remote.verb(), id, e);
                    errors.push(e);
                }
            }
        }

        let removed = self.store.remove_all(&done);
        self.selection.clear();

        let now = self.clock.now();
        finish_bulk(
            &mut self.notice,
            errors,
            targets.len(),
            now,
            remote.verb(),
            format!("{} {} emails", action.past_tense(), removed),
        )?;
        Ok(removed)
    }

    /// Create a task for one message
    pub async fn create_task(
        &mut self,
        id: &MessageId,
        due: DueChoice,
    ) -> Result<String, TriageError> {
        let Some(message) = self.store.get(id) else {
            return Err(TriageError::NotInList(id.clone()));
        };
        let today = Local::now().date_naive();
        let draft = TaskDraft::from_message(message, due, &self.link_base, today);

        let result = self.tasks.create_task(&draft).await;
        let now = self.clock.now();
        match result {
            Ok(task_id) => {
                tracing::info!("Created task {} for {}", task_id, id);
                self.tasked.insert(id.clone());
                self.notice.success("Added to tasks!", now);
                Ok(task_id)
            }
            Err(e) => {
                let err = TriageError::remote("create task", e);
                tracing::warn!("Task for {} failed: {}", id, err);
                self.notice.error(failure_notice(&err, "create task"), now);
                Err(err)
            }
        }
    }

    /// Create a task for every id concurrently, using each message's
    /// suggested due date. Always leaves multi-select.
    pub async fn apply_bulk_task(&mut self, ids: &[MessageId]) -> Result<usize, TriageError> {
        let today = Local::now().date_naive();
        let drafts: Vec<(MessageId, TaskDraft)> = self
            .known_unique(ids)
            .into_iter()
            .filter_map(|id| {
                let message = self.store.get(&id)?;
                let draft =
                    TaskDraft::from_message(message, DueChoice::Suggested, &self.link_base, today);
                Some((id, draft))
            })
            .collect();
        if drafts.is_empty() {
            self.selection.clear();
            return Ok(0);
        }

        let results = join_all(drafts.iter().map(|(_, d)| self.tasks.create_task(d))).await;

        let mut created = 0;
        let mut errors = Vec::new();
        for ((id, _), result) in drafts.iter().zip(results) {
            match result {
                Ok(_) => {
                    self.tasked.insert(id.clone());
                    created += 1;
                }
                Err(e) => {
                    tracing::warn!("Task for {} failed: {}", id, e);
                    errors.push(e);
                }
            }
        }
        self.selection.clear();

        let now = self.clock.now();
        finish_bulk(
            &mut self.notice,
            errors,
            drafts.len(),
            now,
            "create tasks",
            format!("Created {} tasks", created),
        )?;
        Ok(created)
    }

    /// Ids from `ids` that are in the list and not already leaving, first
    /// occurrence only
    fn known_unique(&self, ids: &[MessageId]) -> Vec<MessageId> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| self.store.contains(id) && !self.is_leaving(id) && seen.insert(*id))
            .cloned()
            .collect()
    }
}

fn failure_notice(err: &TriageError, verb: &str) -> String {
    if err.is_unauthorized() {
        err.to_string()
    } else {
        format!("Failed to {}", verb)
    }
}

/// Show the aggregate notice for a bulk operation and turn its errors into
/// a single result
fn finish_bulk(
    notice: &mut super::notice::NoticeSlot,
    errors: Vec<GatewayError>,
    total: usize,
    now: std::time::Instant,
    verb: &str,
    success: String,
) -> Result<(), TriageError> {
    if errors.is_empty() {
        notice.success(success, now);
        return Ok(());
    }

    let unauthorized = errors
        .iter()
        .any(|e| matches!(e, GatewayError::Unauthorized));
    let err = if unauthorized {
        TriageError::Unauthorized
    } else {
        TriageError::Bulk {
            failed: errors.len(),
            total,
        }
    };
    notice.error(
        if unauthorized {
            err.to_string()
        } else {
            format!("Failed to {} for some emails", verb)
        },
        now,
    );
    Err(err)
}

#[cfg(test)]
mod tests {
    use std::pin::pin;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;
    use crate::clock::ManualClock;
    use crate::mail::types::{Message, MessageBody, Scope};
    use crate::testing::{FakeGateway, FakeTasks, PresetScorer, ids, message};
    use crate::triage::Timings;
    use crate::triage::notice::NoticeKind;

    type TestTriage = Triage<FakeGateway, PresetScorer, FakeTasks, ManualClock>;

    struct Harness {
        triage: TestTriage,
        gateway: FakeGateway,
        tasks: FakeTasks,
        clock: ManualClock,
    }

    async fn loaded(inbox: Vec<Message>) -> Harness {
        let gateway = FakeGateway::with_inbox(inbox);
        let tasks = FakeTasks::default();
        let clock = ManualClock::new();
        let mut triage = Triage::new(
            gateway.clone(),
            PresetScorer,
            tasks.clone(),
            clock.clone(),
            Timings::default(),
        )
        .with_link_base("https://mail.example.com/#inbox/");
        triage.load(Scope::Today).await.unwrap();
        Harness {
            triage,
            gateway,
            tasks,
            clock,
        }
    }

    fn id(s: &str) -> MessageId {
        MessageId::from(s)
    }

    fn abc() -> Vec<Message> {
        vec![message("a", 5), message("b", 3), message("c", 1)]
    }

    /// Gateway whose calls for one message wait until released
    struct StalledGateway {
        inner: FakeGateway,
        stalled: MessageId,
        release: Arc<Notify>,
    }

    impl StalledGateway {
        async fn hold(&self, id: &MessageId) {
            if id == &self.stalled {
                self.release.notified().await;
            }
        }
    }

    impl MailGateway for StalledGateway {
        async fn list_unread(&self, scope: Scope) -> Result<Vec<Message>, GatewayError> {
            self.inner.list_unread(scope).await
        }

        async fn get_body(&self, id: &MessageId) -> Result<MessageBody, GatewayError> {
            self.inner.get_body(id).await
        }

        async fn set_read(&self, id: &MessageId) -> Result<(), GatewayError> {
            self.hold(id).await;
            self.inner.set_read(id).await
        }

        async fn set_unread(&self, id: &MessageId) -> Result<(), GatewayError> {
            self.hold(id).await;
            self.inner.set_unread(id).await
        }

        async fn archive(&self, id: &MessageId) -> Result<(), GatewayError> {
            self.hold(id).await;
            self.inner.archive(id).await
        }

        async fn unarchive(&self, id: &MessageId) -> Result<(), GatewayError> {
            self.hold(id).await;
            self.inner.unarchive(id).await
        }
    }

    #[tokio::test]
    async fn test_archive_then_undo_restores_position() {
        let mut h = loaded(abc()).await;

        h.triage.apply_action(MailAction::Archive, &id("b")).await.unwrap();
        assert!(h.triage.is_leaving(&id("b")));
        assert_eq!(ids(h.triage.store().messages()), vec!["a", "b", "c"]);

        h.clock.advance(Duration::from_millis(299));
        h.triage.tick();
        assert_eq!(h.triage.store().len(), 3);

        h.clock.advance(Duration::from_millis(1));
        assert!(h.triage.tick());
        assert_eq!(ids(h.triage.store().messages()), vec!["a", "c"]);
        let notice = h.triage.notice().current().unwrap();
        assert_eq!(notice.message, "Archived");
        assert_eq!(h.triage.notice().undo_target(), Some(&id("b")));

        h.clock.advance(Duration::from_secs(2));
        assert!(h.triage.undo(&id("b")).await.unwrap());
        assert_eq!(ids(h.triage.store().messages()), vec!["a", "b", "c"]);
        assert!(h.triage.notice().current().is_none());
        assert_eq!(
            h.gateway.calls(),
            vec![
                (RemoteAction::Archive, id("b")),
                (RemoteAction::Unarchive, id("b")),
            ]
        );
    }

    #[tokio::test]
    async fn test_mark_read_undo_calls_mark_unread() {
        let mut h = loaded(abc()).await;
        h.triage.apply_action(MailAction::MarkRead, &id("a")).await.unwrap();
        h.clock.advance(Duration::from_millis(300));
        h.triage.tick();

        assert!(h.triage.undo(&id("a")).await.unwrap());
        assert_eq!(h.gateway.calls()[1], (RemoteAction::MarkUnread, id("a")));
        assert_eq!(ids(h.triage.store().messages()), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failed_action_keeps_message() {
        let mut h = loaded(abc()).await;
        h.gateway.fail(RemoteAction::Archive, "a");

        let err = h
            .triage
            .apply_action(MailAction::Archive, &id("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::Remote { action: "archive", .. }));

        h.clock.advance(Duration::from_secs(1));
        h.triage.tick();
        assert_eq!(h.triage.store().len(), 3);
        assert!(h.triage.undo_ledger().is_empty());
        let notice = h.triage.notice().current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Failed to archive");
    }

    #[tokio::test]
    async fn test_undo_after_window_is_noop() {
        let mut h = loaded(abc()).await;
        h.triage.apply_action(MailAction::Archive, &id("a")).await.unwrap();
        h.clock.advance(Duration::from_millis(300));
        h.triage.tick();

        h.clock.advance(Duration::from_secs(5));
        h.triage.tick();
        assert!(h.triage.undo_ledger().is_empty());
        assert!(h.triage.notice().current().is_none());

        assert!(!h.triage.undo(&id("a")).await.unwrap());
        assert_eq!(ids(h.triage.store().messages()), vec!["b", "c"]);
        assert_eq!(h.gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_undo_survives_superseding_notice() {
        let mut h = loaded(abc()).await;
        h.triage.apply_action(MailAction::Archive, &id("a")).await.unwrap();
        h.clock.advance(Duration::from_millis(300));
        h.triage.tick();

        h.triage.apply_action(MailAction::Archive, &id("b")).await.unwrap();
        h.clock.advance(Duration::from_millis(300));
        h.triage.tick();
        assert_eq!(h.triage.notice().undo_target(), Some(&id("b")));

        // Entry for "a" is still inside its own window
        assert!(h.triage.undo(&id("a")).await.unwrap());
        assert_eq!(ids(h.triage.store().messages()), vec!["a", "c"]);
        assert_eq!(h.triage.notice().undo_target(), Some(&id("b")));
    }

    #[tokio::test]
    async fn test_failed_undo_keeps_entry_for_retry() {
        let mut h = loaded(abc()).await;
        h.triage.apply_action(MailAction::Archive, &id("c")).await.unwrap();
        h.clock.advance(Duration::from_millis(300));
        h.triage.tick();

        h.gateway.fail(RemoteAction::Unarchive, "c");
        assert!(h.triage.undo(&id("c")).await.is_err());
        assert!(h.triage.undo_ledger().contains(&id("c")));
        assert_eq!(ids(h.triage.store().messages()), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_reload_discards_pending_work() {
        let mut h = loaded(abc()).await;
        h.triage.apply_action(MailAction::Archive, &id("a")).await.unwrap();
        h.triage.apply_action(MailAction::Archive, &id("b")).await.unwrap();
        h.clock.advance(Duration::from_millis(300));
        h.triage.tick();
        h.triage.apply_action(MailAction::MarkRead, &id("c")).await.unwrap();

        h.gateway.set_inbox(vec![message("c", 1), message("d", 4)]);
        h.triage.load(Scope::Week).await.unwrap();
        assert!(h.triage.undo_ledger().is_empty());
        assert!(!h.triage.is_leaving(&id("c")));

        h.clock.advance(Duration::from_secs(1));
        h.triage.tick();
        assert_eq!(ids(h.triage.store().messages()), vec!["d", "c"]);
        assert!(!h.triage.undo(&id("a")).await.unwrap());
    }

    #[tokio::test]
    async fn test_repeat_action_while_leaving_is_ignored() {
        let mut h = loaded(abc()).await;
        h.triage.apply_action(MailAction::Archive, &id("a")).await.unwrap();
        h.triage.apply_action(MailAction::Archive, &id("a")).await.unwrap();
        assert_eq!(h.gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_leaving_row_stays_out_of_bulk() {
        let mut h = loaded(abc()).await;
        h.triage.apply_action(MailAction::Archive, &id("a")).await.unwrap();

        h.triage.begin_selection(&id("b"));
        h.triage.toggle_selected(&id("a"));
        assert!(!h.triage.selection().contains(&id("a")));

        let removed = h
            .triage
            .apply_bulk(MailAction::MarkRead, &[id("a"), id("b")])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            h.gateway.calls(),
            vec![
                (RemoteAction::Archive, id("a")),
                (RemoteAction::MarkRead, id("b")),
            ]
        );

        // The single action still gets its undo offer
        h.clock.advance(Duration::from_millis(300));
        h.triage.tick();
        assert_eq!(h.triage.notice().undo_target(), Some(&id("a")));
        assert!(h.triage.undo(&id("a")).await.unwrap());
        assert_eq!(ids(h.triage.store().messages()), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_bulk_without_known_targets_is_quiet() {
        let mut h = loaded(abc()).await;
        let removed = h
            .triage
            .apply_bulk(MailAction::Archive, &[id("zzz")])
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(h.triage.apply_bulk_task(&[]).await.unwrap(), 0);

        assert!(h.triage.notice().current().is_none());
        assert!(h.gateway.calls().is_empty());
        assert!(h.tasks.created().is_empty());
        assert_eq!(h.triage.store().len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_updates_list_after_every_call_settles() {
        let inner = FakeGateway::with_inbox(abc());
        let release = Arc::new(Notify::new());
        let gateway = StalledGateway {
            inner: inner.clone(),
            stalled: id("a"),
            release: release.clone(),
        };
        let mut triage = Triage::new(
            gateway,
            PresetScorer,
            FakeTasks::default(),
            ManualClock::new(),
            Timings::default(),
        );
        triage.load(Scope::Today).await.unwrap();
        let targets = [id("a"), id("b")];

        {
            let mut bulk = pin!(triage.apply_bulk(MailAction::Archive, &targets));
            assert!(futures::poll!(bulk.as_mut()).is_pending());
        }
        // b has settled while a is still in flight; nothing left the list
        assert_eq!(inner.calls(), vec![(RemoteAction::Archive, id("b"))]);
        assert_eq!(ids(triage.store().messages()), vec!["a", "b", "c"]);
        assert!(triage.notice().current().is_none());

        release.notify_one();
        let removed = triage
            .apply_bulk(MailAction::Archive, &targets)
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(ids(triage.store().messages()), vec!["c"]);
        assert_eq!(
            triage.notice().current().unwrap().message,
            "Archived 2 emails"
        );
    }

    #[tokio::test]
    async fn test_action_on_unknown_message() {
        let mut h = loaded(abc()).await;
        let err = h
            .triage
            .apply_action(MailAction::Archive, &id("zzz"))
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::NotInList(_)));
        assert!(h.gateway.calls().is_empty());
    }

    // Successful ids leave the list while the notice reports a failure for
    // the whole batch. Confirm with stakeholders before changing either half.
    #[tokio::test]
    async fn test_bulk_partial_failure() {
        let mut h = loaded(vec![
            message("a", 5),
            message("b", 4),
            message("c", 3),
            message("d", 2),
        ])
        .await;
        h.triage.begin_selection(&id("a"));
        h.triage.toggle_selected(&id("b"));
        h.triage.toggle_selected(&id("c"));
        h.gateway.fail(RemoteAction::Archive, "b");

        let err = h
            .triage
            .apply_bulk(MailAction::Archive, &[id("a"), id("b"), id("c")])
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::Bulk { failed: 1, total: 3 }));

        assert_eq!(ids(h.triage.store().messages()), vec!["b", "d"]);
        assert!(!h.triage.selection().is_active());
        assert!(h.triage.undo_ledger().is_empty());
        let notice = h.triage.notice().current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.undo.is_none());
    }

    #[tokio::test]
    async fn test_bulk_success_removes_immediately() {
        let mut h = loaded(abc()).await;
        let removed = h
            .triage
            .apply_bulk(MailAction::MarkRead, &[id("a"), id("c"), id("a")])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(ids(h.triage.store().messages()), vec!["b"]);
        assert_eq!(h.gateway.calls().len(), 2);
        assert_eq!(
            h.triage.notice().current().unwrap().message,
            "Marked as read 2 emails"
        );

        // Plain notice, no undo
        h.clock.advance(Duration::from_secs(3));
        h.triage.tick();
        assert!(h.triage.notice().current().is_none());
        assert!(!h.triage.undo(&id("a")).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_task_marks_message() {
        let mut h = loaded(abc()).await;
        let task_id = h.triage.create_task(&id("a"), DueChoice::None).await.unwrap();
        assert_eq!(task_id, "task-1");
        assert!(h.triage.is_tasked(&id("a")));

        let created = h.tasks.created();
        assert_eq!(created[0].title, "Subject a");
        assert_eq!(created[0].priority, 4);
        assert!(created[0].description.ends_with("https://mail.example.com/#inbox/a"));
        // The message stays in the list
        assert_eq!(h.triage.store().len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_task_partial_failure() {
        let mut h = loaded(abc()).await;
        h.triage.begin_selection(&id("a"));
        h.triage.toggle_selected(&id("b"));
        h.tasks.fail_title("Subject b");

        let err = h
            .triage
            .apply_bulk_task(&[id("a"), id("b")])
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::Bulk { failed: 1, total: 2 }));
        assert!(h.triage.is_tasked(&id("a")));
        assert!(!h.triage.is_tasked(&id("b")));
        assert!(!h.triage.selection().is_active());
    }
}
