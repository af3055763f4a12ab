//! Interactive table over one admin collection, using ratatui + crossterm.
//!
//! The pager owns the query and the fetches; this module maps keys to
//! table intents, runs row actions in the background and draws frames.

use std::io::{self, Stdout};
use std::time::Duration;

use consign::{
    header_click, CollectionSource, Consign, FilterValue, Pager, PagerEvent, TableIntent,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::actions::{self, action_for_key, Action, Actionable};
use crate::error::AdminError;
use crate::notify::{Notifier, NotifyKind, StatusLine};
use crate::table::{render_detail, render_status, render_table};

/// Target render interval (10 FPS).
const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// Page size step for `+`/`-`.
const PAGE_SIZE_STEP: u32 = 5;

/// Height of the status panel, borders included.
const STATUS_HEIGHT: u16 = 5;

// ---------------------------------------------------------------------------
// Input state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    Normal,
    /// Editing the text of `FILTERS[field]`.
    Filter { field: usize, text: String },
    /// Collecting the reason a row action requires.
    Reason { action: Action, id: u64, text: String },
}

/// What the event loop should do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    Perform { action: Action, id: u64, reason: String },
}

/// Everything the table screen owns besides the pager.
#[derive(Debug)]
pub struct BrowseState {
    selected: usize,
    column: usize,
    filter_field: usize,
    mode: InputMode,
    show_detail: bool,
    pub status: StatusLine,
}

impl BrowseState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            column: 0,
            filter_field: 0,
            mode: InputMode::Normal,
            show_detail: false,
            status: StatusLine::new(),
        }
    }

    pub fn handle_key<S>(&mut self, key: KeyEvent, pager: &mut Pager<S>) -> KeyOutcome
    where
        S: CollectionSource,
        S::Item: Actionable,
    {
        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Normal => self.normal_key(key, pager),
            InputMode::Filter { field, text } => {
                self.filter_key(key, field, text, pager);
                KeyOutcome::Continue
            }
            InputMode::Reason { action, id, text } => self.reason_key(key, action, id, text),
        }
    }

    fn normal_key<S>(&mut self, key: KeyEvent, pager: &mut Pager<S>) -> KeyOutcome
    where
        S: CollectionSource,
        S::Item: Actionable,
    {
        let columns = <S::Item as consign::Resource>::columns();
        let filters = <S::Item as consign::Resource>::FILTERS;
        let pagination = pager.props(columns).pagination();

        let intent = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,

            // Rows.
            KeyCode::Down | KeyCode::Char('j') => {
                let last = pager.rows().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Enter => {
                self.show_detail = !self.show_detail;
                None
            }

            // Pages.
            KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
                pagination.next().map(TableIntent::PageChange)
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
                pagination.prev().map(TableIntent::PageChange)
            }
            KeyCode::Home | KeyCode::Char('g') => pagination.first().map(TableIntent::PageChange),
            KeyCode::End | KeyCode::Char('G') => pagination.last().map(TableIntent::PageChange),
            KeyCode::Char('+') => Some(TableIntent::PageSize(
                pager.query().page_size.saturating_add(PAGE_SIZE_STEP),
            )),
            KeyCode::Char('-') => {
                let size = pager.query().page_size;
                (size > PAGE_SIZE_STEP).then(|| TableIntent::PageSize(size - PAGE_SIZE_STEP))
            }

            // Sorting.
            KeyCode::Tab if !columns.is_empty() => {
                self.column = (self.column + 1) % columns.len();
                None
            }
            KeyCode::BackTab if !columns.is_empty() => {
                self.column = (self.column + columns.len() - 1) % columns.len();
                None
            }
            KeyCode::Char('s') => columns
                .get(self.column)
                .and_then(|column| header_click(column, pager.query())),
            KeyCode::Char('S') => Some(TableIntent::ClearSort),

            // Filters.
            KeyCode::Char('/') if !filters.is_empty() => {
                let text = filter_text(pager, filters[self.filter_field]);
                self.mode = InputMode::Filter {
                    field: self.filter_field,
                    text,
                };
                None
            }
            KeyCode::Char('f') if !filters.is_empty() => {
                self.filter_field = (self.filter_field + 1) % filters.len();
                None
            }
            KeyCode::Char('c') => Some(TableIntent::ClearFilters),

            KeyCode::Char('r') => {
                pager.reload();
                None
            }

            KeyCode::Char(c) => return self.row_action(c, pager),
            _ => None,
        };

        if let Some(intent) = intent {
            match pager.apply(intent) {
                Ok(true) => self.selected = 0,
                Ok(false) => {}
                Err(e) => self.status.notify(NotifyKind::Error, &e.reason()),
            }
        }
        KeyOutcome::Continue
    }

    fn filter_key<S>(&mut self, key: KeyEvent, field: usize, mut text: String, pager: &mut Pager<S>)
    where
        S: CollectionSource,
        S::Item: Actionable,
    {
        let name = <S::Item as consign::Resource>::FILTERS[field];
        match key.code {
            KeyCode::Enter => {
                if pager.flush_pending_filter().is_some() {
                    self.selected = 0;
                }
                return;
            }
            KeyCode::Esc => {
                pager.discard_pending_filter();
                return;
            }
            KeyCode::Backspace => {
                text.pop();
                pager.type_filter(name, text.clone());
            }
            KeyCode::Char(c) => {
                text.push(c);
                pager.type_filter(name, text.clone());
            }
            _ => {}
        }
        self.mode = InputMode::Filter { field, text };
    }

    fn reason_key(&mut self, key: KeyEvent, action: Action, id: u64, mut text: String) -> KeyOutcome {
        match key.code {
            KeyCode::Esc => return KeyOutcome::Continue,
            KeyCode::Enter if text.trim().is_empty() => {
                self.status
                    .notify(NotifyKind::Error, "a reason is required");
            }
            KeyCode::Enter => {
                return KeyOutcome::Perform {
                    action,
                    id,
                    reason: text,
                }
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => {}
        }
        self.mode = InputMode::Reason { action, id, text };
        KeyOutcome::Continue
    }

    fn row_action<S>(&mut self, key: char, pager: &Pager<S>) -> KeyOutcome
    where
        S: CollectionSource,
        S::Item: Actionable,
    {
        let Some(action) = action_for_key::<S::Item>(key) else {
            return KeyOutcome::Continue;
        };
        let Some(row) = pager.rows().get(self.selected) else {
            return KeyOutcome::Continue;
        };
        let id = consign::Resource::id(row);

        if !row.allows(action) {
            self.status.notify(
                NotifyKind::Info,
                &format!("cannot {} {id} in its current state", action.label()),
            );
            return KeyOutcome::Continue;
        }
        if action.needs_reason() {
            self.mode = InputMode::Reason {
                action,
                id,
                text: String::new(),
            };
            return KeyOutcome::Continue;
        }
        KeyOutcome::Perform {
            action,
            id,
            reason: String::new(),
        }
    }

    /// Keep the selection on a row after the page changed underneath it.
    fn clamp_selection(&mut self, rows: usize) {
        self.selected = self.selected.min(rows.saturating_sub(1));
    }

    fn help_line<R: Actionable>(&self) -> String {
        match &self.mode {
            InputMode::Filter { field, text } => format!(
                " filter {}: {text}▏  enter apply · esc discard",
                R::FILTERS[*field]
            ),
            InputMode::Reason { action, id, text } => format!(
                " reason to {} {id}: {text}▏  enter submit · esc cancel",
                action.label()
            ),
            InputMode::Normal => {
                let mut help = String::from(
                    " ←/→ page  ↑/↓ row  +/- size  tab/s sort  / filter  f field  c clear  r reload  enter detail",
                );
                for (key, action) in R::ACTIONS {
                    help.push_str(&format!("  {key} {}", action.label()));
                }
                help.push_str("  q quit");
                help
            }
        }
    }
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new()
    }
}

/// Current text of a filter, including a value still waiting out its
/// debounce.
fn filter_text<S: CollectionSource>(pager: &Pager<S>, name: &str) -> String {
    let value = match pager.pending_filter() {
        Some((pending, value)) if pending == name => Some(value),
        _ => pager.query().filter(name),
    };
    match value {
        Some(FilterValue::Text(text)) => text.clone(),
        Some(FilterValue::List(items)) => items.join(","),
        Some(FilterValue::Null) | None => String::new(),
    }
}

/// `name=value` pairs of the active filters.
fn filter_summary<S: CollectionSource>(pager: &Pager<S>) -> String {
    pager
        .query()
        .filters
        .iter()
        .map(|(name, value)| match value {
            FilterValue::Text(text) => format!("{name}={text}"),
            FilterValue::List(items) => format!("{name}={}", items.join(",")),
            FilterValue::Null => name.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

struct ActionOutcome {
    action: Action,
    id: u64,
    result: consign::Result<()>,
}

/// Run the table TUI for collection `R` until quit or cancellation.
pub async fn run_browse<R: Actionable>(
    consign: Consign,
    cancel: CancellationToken,
) -> Result<(), AdminError> {
    let mut pager = consign.pager::<R>()?;
    let mut state = BrowseState::new();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<ActionOutcome>();

    info!(resource = R::NAME, api = %consign.http().base_url(), "starting browse");
    pager.refresh();

    // Set up terminal.
    enable_raw_mode().map_err(|e| AdminError::Terminal(format!("enable raw mode: {e}")))?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| AdminError::Terminal(format!("enter alternate screen: {e}")))?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .map_err(|e| AdminError::Terminal(format!("create terminal: {e}")))?;

    let mut render_interval = tokio::time::interval(RENDER_INTERVAL);

    // Main event loop.
    let mut quit = false;
    let result: Result<(), AdminError> = loop {
        if quit {
            break Ok(());
        }

        tokio::select! {
            // Fetch completions and debounce deadlines.
            Some(event) = pager.next_event() => {
                match event {
                    PagerEvent::Committed(_) => state.clamp_selection(pager.rows().len()),
                    PagerEvent::Failed(_) => {
                        if let consign::FetchState::Errored(reason) = pager.state() {
                            let message = format!("could not load {}: {reason}", R::NAME);
                            state.status.notify(NotifyKind::Error, &message);
                        }
                    }
                    PagerEvent::Discarded(id) => debug!(request_id = id.get(), "stale page dropped"),
                    PagerEvent::FilterApplied(_) => state.selected = 0,
                }
            }

            // Finished row actions; reload only after success.
            Some(outcome) = action_rx.recv() => {
                if actions::report(outcome.action, outcome.id, &outcome.result, &mut state.status) {
                    pager.reload();
                }
            }

            // Render tick — also polls keyboard input.
            _ = render_interval.tick() => {
                while event::poll(Duration::ZERO).unwrap_or(false) {
                    let Ok(Event::Key(key)) = event::read() else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match state.handle_key(key, &mut pager) {
                        KeyOutcome::Continue => {}
                        KeyOutcome::Quit => quit = true,
                        KeyOutcome::Perform { action, id, reason } => {
                            state.status.notify(
                                NotifyKind::Info,
                                &format!("{} {id}…", action.label()),
                            );
                            let consign = consign.clone();
                            let tx = action_tx.clone();
                            tokio::spawn(async move {
                                let result = action.perform(&consign, id, &reason).await;
                                let _ = tx.send(ActionOutcome { action, id, result });
                            });
                        }
                    }
                }

                if !quit {
                    let _ = terminal.draw(|frame| render_ui::<R>(frame, &pager, &state));
                }
            }

            _ = cancel.cancelled() => {
                break Ok(());
            }
        }
    };

    // Restore terminal.
    restore_terminal(&mut terminal);

    result
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

/// Restore terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    let _ = terminal.show_cursor();
    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
}

// ---------------------------------------------------------------------------
// UI rendering
// ---------------------------------------------------------------------------

fn render_ui<R: Actionable>(
    frame: &mut Frame,
    pager: &Pager<consign::Collection<R>>,
    state: &BrowseState,
) {
    let [table_area, status_area, help_area] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(STATUS_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let (table_area, detail_area) = if state.show_detail {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
                .areas(table_area);
        (left, Some(right))
    } else {
        (table_area, None)
    };

    let filters = filter_summary(pager);
    let title = if filters.is_empty() {
        R::NAME.to_string()
    } else {
        format!("{}  {filters}", R::NAME)
    };

    let props = pager.props(R::columns());
    let selected = (!pager.rows().is_empty()).then_some(state.selected);
    render_table(frame, table_area, &title, &props, selected, Some(state.column));

    if let Some(area) = detail_area {
        render_detail(frame, area, pager.rows().get(state.selected));
    }
    render_status(frame, status_area, &state.status);

    let help = Paragraph::new(state.help_line::<R>())
        .style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(help, help_area);
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use consign::{PageIndex, PageRequest, PageResult, PagerConfig, Withdrawal};
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    use super::*;

    /// 25 withdrawals; even ids are pending, odd ids are paid.
    struct Withdrawals {
        requests: Mutex<Vec<PageRequest>>,
    }

    impl CollectionSource for Withdrawals {
        type Item = Withdrawal;

        fn fetch(
            &self,
            request: PageRequest,
        ) -> impl Future<Output = consign::Result<PageResult<Withdrawal>>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            async move {
                let start = u64::from(request.page_number.get() - 1) * u64::from(request.page_size);
                let end = (start + u64::from(request.page_size)).min(25);
                let items = (start..end)
                    .map(|i| {
                        let id = i + 1;
                        let status = if id % 2 == 0 { "PENDING" } else { "PAID" };
                        serde_json::from_value(json!({
                            "id": id,
                            "accountId": 205,
                            "amount": "10.00",
                            "status": status,
                            "destination": "SE** 0091",
                            "requestedAt": "2026-02-21T08:30:00Z"
                        }))
                        .unwrap()
                    })
                    .collect();
                Ok(PageResult {
                    items,
                    total_count: 25,
                    total_pages: consign::types::total_pages_for(25, request.page_size),
                })
            }
        }
    }

    async fn loaded() -> (Pager<Withdrawals>, Arc<Withdrawals>) {
        let source = Arc::new(Withdrawals {
            requests: Mutex::new(Vec::new()),
        });
        let mut pager = Pager::new(
            Arc::clone(&source),
            PagerConfig {
                page_size: 10,
                debounce: Duration::from_millis(300),
            },
        )
        .unwrap();
        pager.refresh();
        pager.next_event().await;
        (pager, source)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(state: &mut BrowseState, pager: &mut Pager<Withdrawals>, code: KeyCode) -> KeyOutcome {
        state.handle_key(key(code), pager)
    }

    #[tokio::test]
    async fn arrows_page_through() {
        let (mut pager, source) = loaded().await;
        let mut state = BrowseState::new();

        press(&mut state, &mut pager, KeyCode::Right);
        assert_eq!(pager.query().page_index, PageIndex(1));
        // Controls are disabled while the page is loading.
        press(&mut state, &mut pager, KeyCode::Right);
        assert_eq!(pager.query().page_index, PageIndex(1));

        pager.next_event().await;
        press(&mut state, &mut pager, KeyCode::End);
        assert_eq!(pager.query().page_index, PageIndex(2));
        pager.next_event().await;
        assert_eq!(pager.rows().len(), 5);

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.last().unwrap().page_number.get(), 3);
    }

    #[tokio::test]
    async fn sort_key_toggles_direction() {
        let (mut pager, _source) = loaded().await;
        let mut state = BrowseState::new();

        // Focus "Amount" (third column) and sort.
        press(&mut state, &mut pager, KeyCode::Tab);
        press(&mut state, &mut pager, KeyCode::Tab);
        press(&mut state, &mut pager, KeyCode::Char('s'));
        assert_eq!(pager.query().sort_key.as_deref(), Some("amount"));
        let first = pager.query().sort_descending;

        pager.next_event().await;
        press(&mut state, &mut pager, KeyCode::Char('s'));
        assert_eq!(pager.query().sort_descending, !first);

        press(&mut state, &mut pager, KeyCode::Char('S'));
        assert_eq!(pager.query().sort_key, None);
    }

    #[tokio::test]
    async fn unsortable_column_ignored() {
        let (mut pager, _source) = loaded().await;
        let mut state = BrowseState::new();

        // "Account" is not sortable.
        press(&mut state, &mut pager, KeyCode::Tab);
        press(&mut state, &mut pager, KeyCode::Char('s'));
        assert_eq!(pager.query().sort_key, None);
        assert!(!pager.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn typed_filter_is_debounced() {
        let (mut pager, source) = loaded().await;
        let mut state = BrowseState::new();

        press(&mut state, &mut pager, KeyCode::Char('/'));
        for c in "PEND".chars() {
            press(&mut state, &mut pager, KeyCode::Char(c));
        }
        assert!(state.help_line::<Withdrawal>().contains("filter status: PEND"));
        assert_eq!(source.requests.lock().unwrap().len(), 1);

        assert_eq!(
            pager.next_event().await,
            Some(PagerEvent::FilterApplied("status".into()))
        );
        pager.next_event().await;

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].filters,
            vec![("status".to_string(), "PEND".to_string())]
        );
    }

    #[tokio::test]
    async fn enter_applies_filter_immediately() {
        let (mut pager, _source) = loaded().await;
        let mut state = BrowseState::new();

        press(&mut state, &mut pager, KeyCode::Char('/'));
        press(&mut state, &mut pager, KeyCode::Char('P'));
        press(&mut state, &mut pager, KeyCode::Enter);
        assert!(pager.pending_filter().is_none());
        assert!(pager.query().filter("status").is_some());
        assert_eq!(state.mode, InputMode::Normal);
    }

    #[tokio::test(start_paused = true)]
    async fn esc_drops_unapplied_filter_text() {
        let (mut pager, source) = loaded().await;
        let mut state = BrowseState::new();

        press(&mut state, &mut pager, KeyCode::Char('/'));
        press(&mut state, &mut pager, KeyCode::Char('P'));
        press(&mut state, &mut pager, KeyCode::Esc);
        assert_eq!(state.mode, InputMode::Normal);
        assert!(pager.pending_filter().is_none());
        assert!(pager.query().filter("status").is_none());

        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(source.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn approve_only_actionable_rows() {
        let (mut pager, _source) = loaded().await;
        let mut state = BrowseState::new();

        // Row 0 is id 1 (paid).
        assert_eq!(
            press(&mut state, &mut pager, KeyCode::Char('a')),
            KeyOutcome::Continue
        );
        assert!(state.status.latest().unwrap().1.contains("cannot approve withdrawal 1"));

        // Row 1 is id 2 (pending).
        press(&mut state, &mut pager, KeyCode::Down);
        assert_eq!(
            press(&mut state, &mut pager, KeyCode::Char('a')),
            KeyOutcome::Perform {
                action: Action::ApproveWithdrawal,
                id: 2,
                reason: String::new()
            }
        );
    }

    #[tokio::test]
    async fn reject_collects_reason() {
        let (mut pager, _source) = loaded().await;
        let mut state = BrowseState::new();
        press(&mut state, &mut pager, KeyCode::Down);

        press(&mut state, &mut pager, KeyCode::Char('x'));
        assert!(matches!(state.mode, InputMode::Reason { .. }));

        // Blank reasons are refused locally.
        press(&mut state, &mut pager, KeyCode::Enter);
        assert!(matches!(state.mode, InputMode::Reason { .. }));

        for c in "dup".chars() {
            press(&mut state, &mut pager, KeyCode::Char(c));
        }
        assert_eq!(
            press(&mut state, &mut pager, KeyCode::Enter),
            KeyOutcome::Perform {
                action: Action::RejectWithdrawal,
                id: 2,
                reason: "dup".into()
            }
        );
        assert_eq!(state.mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn page_size_keys() {
        let (mut pager, _source) = loaded().await;
        let mut state = BrowseState::new();

        press(&mut state, &mut pager, KeyCode::Char('+'));
        assert_eq!(pager.query().page_size, 15);
        pager.next_event().await;
        press(&mut state, &mut pager, KeyCode::Char('-'));
        press(&mut state, &mut pager, KeyCode::Char('-'));
        assert_eq!(pager.query().page_size, 5);
        press(&mut state, &mut pager, KeyCode::Char('-'));
        assert_eq!(pager.query().page_size, 5);
    }

    #[tokio::test]
    async fn quit_keys() {
        let (mut pager, _source) = loaded().await;
        let mut state = BrowseState::new();
        assert_eq!(press(&mut state, &mut pager, KeyCode::Char('q')), KeyOutcome::Quit);
    }
}
