//! Triage session: the in-scope message list and everything that mutates it
//!
//! [`Triage`] is the single owner of the snapshot, the selection, pending
//! removals and the undo ledger. Front-ends hold one instance and drive it
//! through `load`, the action methods in [`actions`], `tick` for timers,
//! and the selection helpers fed by the [`gesture`] controller.

pub mod actions;
pub mod gesture;
pub mod notice;
pub mod selection;
pub mod store;
pub mod undo;

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::constants::{NOTICE_TTL_MS, TRANSITION_DELAY_MS, UNDO_WINDOW_MS};
use crate::mail::gateway::{GatewayError, MailGateway, RemoteAction};
use crate::mail::types::{Message, MessageBody, MessageId, Scope};
use crate::score::{Scorer, analyze_batch, rank};
use crate::tasks::TaskSink;

pub use actions::MailAction;
use notice::{NoticeSlot, NoticeTimings};
use selection::Selection;
use store::ListStore;
use undo::{PendingUndo, UndoLedger};

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    /// The provider rejected our session; sign in again instead of retrying
    #[error("Session expired, sign in again")]
    Unauthorized,
    #[error("Failed to {action}: {source}")]
    Remote {
        action: &'static str,
        source: GatewayError,
    },
    #[error("{failed} of {total} requests failed")]
    Bulk { failed: usize, total: usize },
    #[error("message {0} is not in the list")]
    NotInList(MessageId),
}

impl TriageError {
    pub(crate) fn remote(action: &'static str, err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => TriageError::Unauthorized,
            source => TriageError::Remote { action, source },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TriageError::Unauthorized)
    }
}

/// Timer lengths used by the session
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Delay between a successful action and the row leaving the list
    pub transition: Duration,
    /// How long a removal can be undone
    pub undo_window: Duration,
    /// Lifetime of notices without an undo offer
    pub notice: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(TRANSITION_DELAY_MS),
            undo_window: Duration::from_millis(UNDO_WINDOW_MS),
            notice: Duration::from_millis(NOTICE_TTL_MS),
        }
    }
}

/// A row that was acted on remotely and is animating out
#[derive(Debug, Clone)]
struct Leaving {
    id: MessageId,
    action: RemoteAction,
    due: Instant,
}

pub struct Triage<G, S, T, C = SystemClock> {
    gateway: G,
    scorer: S,
    tasks: T,
    clock: C,
    timings: Timings,
    link_base: String,
    scope: Scope,
    store: ListStore,
    selection: Selection,
    undo: UndoLedger,
    leaving: Vec<Leaving>,
    notice: NoticeSlot,
    tasked: HashSet<MessageId>,
    load_error: Option<String>,
}

impl<G, S, T, C> Triage<G, S, T, C>
where
    G: MailGateway,
    S: Scorer,
    T: TaskSink,
    C: Clock,
{
    pub fn new(gateway: G, scorer: S, tasks: T, clock: C, timings: Timings) -> Self {
        Self {
            gateway,
            scorer,
            tasks,
            clock,
            timings,
            link_base: String::new(),
            scope: Scope::default(),
            store: ListStore::default(),
            selection: Selection::default(),
            undo: UndoLedger::default(),
            leaving: Vec::new(),
            notice: NoticeSlot::new(NoticeTimings {
                with_undo: timings.undo_window,
                plain: timings.notice,
            }),
            tasked: HashSet::new(),
            load_error: None,
        }
    }

    /// Prefix that turns a message id into a link to the mail provider
    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    /// Fetch, score and rank the unread mail in `scope`, replacing the list.
    ///
    /// Selection, pending removals and undo entries do not survive a reload.
    /// On failure the previous list stays and [`Triage::load_error`] is set.
    pub async fn load(&mut self, scope: Scope) -> Result<usize, TriageError> {
        tracing::debug!("Loading unread mail for {}", scope);
        let fetched = match self.gateway.list_unread(scope).await {
            Ok(messages) => messages,
            Err(e) => {
                let err = TriageError::remote("load emails", e);
                tracing::warn!("{}", err);
                self.load_error = Some(err.to_string());
                return Err(err);
            }
        };

        let mut messages = analyze_batch(&self.scorer, fetched).await;
        rank(&mut messages);

        self.scope = scope;
        self.store.replace(messages);
        self.selection.clear();
        self.undo.clear();
        self.leaving.clear();
        self.tasked.clear();
        if self.notice.undo_target().is_some() {
            self.notice.cancel();
        }
        self.load_error = None;

        tracing::info!("Loaded {} messages ({})", self.store.len(), scope);
        Ok(self.store.len())
    }

    /// Remove `id` from the list, keeping the selection consistent
    pub fn remove(&mut self, id: &MessageId) -> Option<(Message, usize)> {
        let removed = self.store.remove(id);
        if removed.is_some() {
            self.selection.forget(id);
        }
        removed
    }

    /// Put a previously removed message back at `index` (clamped)
    pub fn reinsert(&mut self, message: Message, index: usize) -> usize {
        self.store.reinsert(message, index)
    }

    /// Fire due timers: finish pending removals, close undo windows and
    /// expire notices. Returns true if anything visible changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let mut changed = false;

        let (due, waiting): (Vec<_>, Vec<_>) =
            self.leaving.drain(..).partition(|l| l.due <= now);
        self.leaving = waiting;
        for leaving in due {
            changed |= self.finish_removal(leaving);
        }

        changed |= self.undo.expire(now);
        changed |= self.notice.expire(now);
        changed
    }

    fn finish_removal(&mut self, leaving: Leaving) -> bool {
        let Some((message, index)) = self.remove(&leaving.id) else {
            return false;
        };
        self.tasked.remove(&leaving.id);
        self.undo.arm(PendingUndo {
            message,
            index,
            inverse: leaving.action.inverse(),
            deadline: leaving.due + self.timings.undo_window,
        });
        self.notice
            .with_undo(done_message(leaving.action), leaving.id, leaving.due);
        true
    }

    /// Fetch the full body of a message
    pub async fn open(&mut self, id: &MessageId) -> Result<MessageBody, TriageError> {
        match self.gateway.get_body(id).await {
            Ok(body) => Ok(body),
            Err(e) => {
                let err = TriageError::remote("load message", e);
                self.notice.error(&err, self.clock.now());
                Err(err)
            }
        }
    }

    /// Enter multi-select with `id` checked
    pub fn begin_selection(&mut self, id: &MessageId) {
        if self.selectable(id) {
            self.selection.begin(id.clone());
        }
    }

    pub fn toggle_selected(&mut self, id: &MessageId) {
        if self.selectable(id) {
            self.selection.toggle(id);
        }
    }

    /// Rows on their way out already have an action in flight
    fn selectable(&self, id: &MessageId) -> bool {
        self.store.contains(id) && !self.is_leaving(id)
    }

    /// Leave multi-select, unchecking everything
    pub fn exit_selection(&mut self) {
        self.selection.clear();
    }

    /// Teardown: cancel every timer. Remote changes already made stay made.
    pub fn shutdown(&mut self) {
        if !self.undo.is_empty() {
            tracing::debug!("Dropping {} undo entries on shutdown", self.undo.len());
        }
        self.undo.clear();
        self.leaving.clear();
        self.notice.cancel();
    }

    pub fn store(&self) -> &ListStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[cfg(test)]
    pub fn undo_ledger(&self) -> &UndoLedger {
        &self.undo
    }

    pub fn notice(&self) -> &NoticeSlot {
        &self.notice
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// True while a row is waiting out its exit transition
    pub fn is_leaving(&self, id: &MessageId) -> bool {
        self.leaving.iter().any(|l| &l.id == id)
    }

    /// True once a task was created for the message
    pub fn is_tasked(&self, id: &MessageId) -> bool {
        self.tasked.contains(id)
    }

    pub fn link_for(&self, id: &MessageId) -> String {
        format!("{}{}", self.link_base, id)
    }
}

fn done_message(action: RemoteAction) -> &'static str {
    match action {
        RemoteAction::MarkRead => "Marked as read",
        RemoteAction::MarkUnread => "Marked as unread",
        RemoteAction::Archive => "Archived",
        RemoteAction::Unarchive => "Moved to inbox",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::testing::{FakeGateway, FakeTasks, PresetScorer, ids, message};

    type TestTriage = Triage<FakeGateway, PresetScorer, FakeTasks, ManualClock>;

    fn session(inbox: Vec<Message>) -> (TestTriage, FakeGateway, ManualClock) {
        let gateway = FakeGateway::with_inbox(inbox);
        let clock = ManualClock::new();
        let triage = Triage::new(
            gateway.clone(),
            PresetScorer,
            FakeTasks::default(),
            clock.clone(),
            Timings::default(),
        );
        (triage, gateway, clock)
    }

    #[tokio::test]
    async fn test_load_ranks_by_score_stable_on_ties() {
        let (mut t, _, _) = session(vec![
            message("a", 2),
            message("b", 5),
            message("c", 2),
            message("d", 4),
        ]);
        assert_eq!(t.load(Scope::Today).await.unwrap(), 4);
        assert_eq!(ids(t.store().messages()), vec!["b", "d", "a", "c"]);
    }

    #[tokio::test]
    async fn test_load_substitutes_default_analysis() {
        let (mut t, _, _) = session(vec![message("a", 0), message("b", 3)]);
        t.load(Scope::Today).await.unwrap();

        assert!(t.store().iter().all(|m| m.analysis.is_some()));
        let a = t.store().get(&MessageId::from("a")).unwrap();
        assert_eq!(a.score(), 2);
        assert!(t.load_error().is_none());
    }

    #[tokio::test]
    async fn test_load_clears_selection() {
        let (mut t, _, _) = session(vec![message("a", 5), message("b", 2)]);
        t.load(Scope::Today).await.unwrap();
        t.begin_selection(&MessageId::from("a"));
        t.toggle_selected(&MessageId::from("b"));
        assert_eq!(t.selection().len(), 2);

        t.load(Scope::Week).await.unwrap();
        assert!(t.selection().is_empty());
        assert!(!t.selection().is_active());
        assert_eq!(t.scope(), Scope::Week);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_list() {
        let (mut t, gateway, _) = session(vec![message("a", 5), message("b", 2)]);
        t.load(Scope::Today).await.unwrap();

        gateway.fail_listing(false);
        let err = t.load(Scope::Week).await.unwrap_err();
        assert!(matches!(err, TriageError::Remote { .. }));
        assert_eq!(ids(t.store().messages()), vec!["a", "b"]);
        assert_eq!(t.scope(), Scope::Today);
        assert!(t.load_error().unwrap().starts_with("Failed to load emails"));
    }

    #[tokio::test]
    async fn test_unauthorized_load() {
        let (mut t, gateway, _) = session(vec![message("a", 5)]);
        gateway.fail_listing(true);
        let err = t.load(Scope::Today).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_remove_prunes_selection() {
        let (mut t, _, _) = session(vec![message("a", 5), message("b", 2)]);
        t.load(Scope::Today).await.unwrap();
        t.begin_selection(&MessageId::from("a"));
        t.toggle_selected(&MessageId::from("b"));

        let (removed, index) = t.remove(&MessageId::from("a")).unwrap();
        assert_eq!(index, 0);
        assert!(!t.selection().contains(&removed.id));
        assert!(t.selection().ids().all(|id| t.store().contains(id)));

        t.reinsert(removed, index);
        assert_eq!(ids(t.store().messages()), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_selection_ignores_unknown_ids() {
        let (mut t, _, _) = session(vec![message("a", 5)]);
        t.load(Scope::Today).await.unwrap();
        t.begin_selection(&MessageId::from("ghost"));
        assert!(!t.selection().is_active());
    }

    #[tokio::test]
    async fn test_open_fetches_body() {
        let (mut t, _, _) = session(vec![message("a", 5)]);
        let body = t.open(&MessageId::from("a")).await.unwrap();
        assert_eq!(body.display_text(), "Body of a");
    }

    #[tokio::test]
    async fn test_shutdown_cancels_timers() {
        let (mut t, _, clock) = session(vec![message("a", 5), message("b", 2)]);
        t.load(Scope::Today).await.unwrap();
        t.apply_action(MailAction::Archive, &MessageId::from("a"))
            .await
            .unwrap();
        clock.advance(Duration::from_millis(300));
        t.tick();
        assert!(t.notice().current().is_some());

        t.shutdown();
        assert!(t.notice().current().is_none());
        assert!(t.undo_ledger().is_empty());
    }
}
