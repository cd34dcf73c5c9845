//! Terminal front-end: owns the triage session and drives it from input

mod actions;
mod event_loop;
pub mod render_thread;
pub mod state;

use anyhow::Result;

use render_thread::RenderThread;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::input::KeyBindings;
use crate::mail::local::LocalMailbox;
use crate::mail::types::Scope;
use crate::score::KeywordScorer;
use crate::tasks::FileTaskSink;
use crate::triage::Triage;
use crate::triage::gesture::{GestureController, PullToRefresh};
use crate::ui;
use state::{AppState, RowView};

/// The session type the binary runs
pub type Session = Triage<LocalMailbox, KeywordScorer, FileTaskSink, SystemClock>;

pub struct App {
    pub(crate) triage: Session,
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    pub(crate) gestures: GestureController,
    pub(crate) pull: PullToRefresh,
    /// Scope to load once the loading frame has been drawn
    pub(crate) pending_load: Option<Scope>,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let mailbox = LocalMailbox::open(config.mailbox_path()?)?;
        tracing::info!("Using mailbox {}", mailbox.path().display());

        let scorer = KeywordScorer::new(&config.scoring.school_domains)?;
        let tasks = FileTaskSink::new(config.tasks_path()?);

        let triage = Triage::new(
            mailbox,
            scorer,
            tasks,
            SystemClock,
            config.triage.timings(),
        )
        .with_link_base(config.tasks.link_base.clone());

        let bindings = KeyBindings::default();
        let scope = config.triage.default_scope;
        let state = AppState {
            scope,
            swipe_threshold: config.gesture.swipe_threshold,
            units_per_cell: config.gesture.units_per_cell,
            help: bindings.all_bindings(),
            ..Default::default()
        };
        let gestures = GestureController::new(config.gesture.controller_config());
        let pull = PullToRefresh::new(config.gesture.pull_threshold, config.gesture.pull_resistance);

        let mut app = Self {
            triage,
            state,
            bindings,
            gestures,
            pull,
            pending_load: None,
            dirty: true, // Start dirty for initial render
        };
        app.queue_load(scope);
        Ok(app)
    }

    pub async fn run(&mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn()?;

        if let Ok((width, height)) = crossterm::terminal::size() {
            self.resize(width, height);
        }

        let result = self.event_loop(&render_thread).await;

        self.triage.shutdown();

        // Shutdown render thread (handles terminal cleanup)
        render_thread.shutdown();

        result
    }

    /// Schedule a load; the loop draws the loading state before running it
    pub(crate) fn queue_load(&mut self, scope: Scope) {
        self.pending_load = Some(scope);
        self.state.scope = scope;
        self.state.loading_since = Some(std::time::Instant::now());
        self.gestures.cancel();
        self.dirty = true;
    }

    pub(crate) fn resize(&mut self, _width: u16, height: u16) {
        self.state.visible_rows = ui::list_capacity(height);
        self.state.clamp_cursor();
    }

    /// Copy everything the renderer needs out of the session
    pub(crate) fn sync_state(&mut self) {
        let selection = self.triage.selection();
        self.state.rows = self
            .triage
            .store()
            .iter()
            .map(|message| RowView {
                state: self.gestures.item_state(&message.id, selection),
                tasked: self.triage.is_tasked(&message.id),
                leaving: self.triage.is_leaving(&message.id),
                message: message.clone(),
            })
            .collect();
        self.state.clamp_cursor();

        self.state.urgent_count = self.triage.store().urgent_count();
        self.state.multi_select = selection.is_active();
        self.state.selected_count = selection.len();
        self.state.notice = self.triage.notice().current().cloned();
        self.state.load_error = self.triage.load_error().map(str::to_string);
        self.state.pull_distance = self.pull.distance();
        self.state.pull_ready = self.pull.ready();
    }
}
