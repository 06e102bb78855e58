//! App — event loop and chart controller.
//!
//! Architecture:
//! - `App` owns the view-mode state, the viewport, and the latest store
//!   snapshot; the store itself lives behind one shared mutex.
//! - A `tokio::mpsc` channel carries `AppMessage` events in from the
//!   blocking keyboard/mouse reader and the background sampler.
//! - Key/mouse handlers return `Vec<Action>`; the loop dispatches each
//!   against the store and viewport, then redraws.
//! - Pausing/resuming the sampler flows out through a watch channel.

use std::io;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use wisense_core::stats::MaterialSummary;
use wisense_core::store::{epoch_now, ChartSnapshot};
use wisense_core::{Band, Material, SharedLiveData};

use crate::action::{Action, ViewMode};
use crate::components::{live_chart, live_chart::PlotGeometry, stats_view};
use crate::viewport::Viewport;
use crate::widgets::status_bar;

/// Wheel-zoom step, matching the arrow-key zoom-out step.
const WHEEL_ZOOM_FACTOR: f64 = 1.2;

/// How long the input reader waits per poll between shutdown checks.
const INPUT_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    /// A terminal input event from the blocking reader task.
    Event(Event),
    /// The sampler committed a new reading to the store.
    Sampled,
    /// The sampler skipped a tick (acquisition or parse failure).
    SampleFailed(String),
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    store: SharedLiveData,
    /// Live/paused switch for the sampling loop.
    live_tx: watch::Sender<bool>,

    view_mode: ViewMode,
    viewport: Viewport,
    /// Latest committed store state, refreshed under the lock and then
    /// rendered without it.
    snapshot: ChartSnapshot,
    /// Bar-chart data, computed once on entering the statistics view.
    frozen_summaries: Vec<MaterialSummary>,
    /// Epoch seconds at session start; chart x-values are relative to it.
    session_start: f64,
    /// Last-drawn plot geometry — used to map wheel events to time.
    plot: PlotGeometry,

    status: Option<String>,
    status_is_error: bool,
    should_quit: bool,
}

impl App {
    pub fn new(store: SharedLiveData, live_tx: watch::Sender<bool>) -> Self {
        Self {
            store,
            live_tx,
            view_mode: ViewMode::Live,
            viewport: Viewport::new(),
            snapshot: ChartSnapshot {
                samples: Vec::new(),
                transitions: Vec::new(),
                floor_material: Material::Baseline,
                material: Material::Baseline,
                band: Band::Ghz24,
                summaries: Vec::new(),
            },
            frozen_summaries: Vec::new(),
            session_start: epoch_now(),
            plot: PlotGeometry::default(),
            status: None,
            status_is_error: false,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<AppMessage>,
        tx: mpsc::Sender<AppMessage>,
    ) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("terminal ready, size={:?}", terminal.size());

        // Blocking keyboard/mouse reader. Polls rather than parking in
        // `read()` so the task notices the dropped receiver after quit
        // and lets the runtime shut down without one more keypress.
        tokio::task::spawn_blocking(move || loop {
            match event::poll(INPUT_POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            match rx.recv().await {
                Some(msg) => self.handle_message(msg).await,
                None => break,
            }
        }

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handling ──────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a).await;
                    }
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for a in actions {
                        self.dispatch(a).await;
                    }
                }
                _ => {}
            },
            AppMessage::Sampled => {
                self.refresh_snapshot().await;
            }
            AppMessage::SampleFailed(msg) => {
                self.status = Some(msg);
                self.status_is_error = true;
            }
        }
    }

    async fn refresh_snapshot(&mut self) {
        self.snapshot = self.store.lock().await.snapshot();
    }

    /// Latest sample time in seconds since session start, falling back
    /// to "now" before the first sample lands.
    fn latest_rel(&self) -> f64 {
        self.snapshot
            .samples
            .last()
            .map(|s| s.timestamp - self.session_start)
            .unwrap_or_else(|| (epoch_now() - self.session_start).max(0.0))
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&self, key: KeyEvent) -> Vec<Action> {
        // Quit works from either view.
        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                return vec![Action::Quit]
            }
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit]
            }
            _ => {}
        }

        match self.view_mode {
            // The statistics view only answers to `c`.
            ViewMode::Statistics => match key.code {
                KeyCode::Char('c') => vec![Action::LeaveStatisticsOrClear],
                _ => vec![],
            },
            ViewMode::Live => match key.code {
                KeyCode::Char(c @ '1'..='7') => Material::from_digit(c)
                    .map(|m| vec![Action::SetMaterial(m)])
                    .unwrap_or_default(),
                KeyCode::Char('b') => vec![Action::ToggleBand],
                KeyCode::Char('s') => vec![Action::EnterStatistics],
                KeyCode::Char('c') => vec![Action::LeaveStatisticsOrClear],
                KeyCode::Home => vec![Action::ResetViewport],
                KeyCode::Left => vec![Action::PanLeft],
                KeyCode::Right => vec![Action::PanRight],
                KeyCode::Up => vec![Action::ZoomIn],
                KeyCode::Down => vec![Action::ZoomOut],
                _ => vec![],
            },
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&self, event: MouseEvent) -> Vec<Action> {
        if self.view_mode != ViewMode::Live {
            return vec![];
        }

        let factor = match event.kind {
            MouseEventKind::ScrollUp => 1.0 / WHEEL_ZOOM_FACTOR,
            MouseEventKind::ScrollDown => WHEEL_ZOOM_FACTOR,
            _ => return vec![],
        };

        if !self.plot.contains(event.column, event.row) {
            return vec![];
        }
        // Anchor on the cursor's time; fall back to the window centre
        // when the column doesn't map (degenerate plot).
        let anchor = self
            .plot
            .time_at_column(event.column)
            .unwrap_or((self.plot.left + self.plot.right) / 2.0);
        vec![Action::ZoomAbout(anchor, factor)]
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        match action {
            Action::SetMaterial(material) => {
                self.store
                    .lock()
                    .await
                    .set_material(material, epoch_now());
                self.refresh_snapshot().await;
                self.set_status(format!("material: {material}"));
            }

            Action::ToggleBand => {
                let band = {
                    let mut data = self.store.lock().await;
                    data.toggle_band();
                    data.current_band()
                };
                self.refresh_snapshot().await;
                self.set_status(format!("band: {band} GHz"));
            }

            Action::EnterStatistics => {
                // Freeze the bar chart now; the sampler stays paused for
                // as long as the view is open.
                self.frozen_summaries = self.store.lock().await.snapshot().summaries;
                self.view_mode = ViewMode::Statistics;
                let _ = self.live_tx.send(false);
                info!("statistics view (sampling paused)");
            }

            Action::LeaveStatisticsOrClear => match self.view_mode {
                ViewMode::Statistics => {
                    self.view_mode = ViewMode::Live;
                    let _ = self.live_tx.send(true);
                    info!("live view (sampling resumed)");
                }
                ViewMode::Live => {
                    self.store.lock().await.clear(epoch_now());
                    self.viewport = self.viewport.reset();
                    // The elapsed-time axis starts over with the data.
                    self.session_start = epoch_now();
                    self.refresh_snapshot().await;
                    self.set_status("cleared, reset to baseline".to_string());
                }
            },

            Action::PanLeft => self.apply_viewport(|vp, latest| vp.pan(-0.1, latest)),
            Action::PanRight => self.apply_viewport(|vp, latest| vp.pan(0.1, latest)),
            Action::ZoomIn => self.apply_viewport(|vp, latest| vp.zoom_centered(0.8, latest)),
            Action::ZoomOut => self.apply_viewport(|vp, latest| vp.zoom_centered(1.25, latest)),
            Action::ZoomAbout(anchor, factor) => {
                self.apply_viewport(|vp, latest| vp.zoom_about(anchor, factor, latest))
            }
            Action::ResetViewport => {
                self.viewport = self.viewport.reset();
                self.set_status("auto-scroll enabled".to_string());
            }

            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn apply_viewport(&mut self, f: impl FnOnce(Viewport, f64) -> Viewport) {
        let latest = self.latest_rel();
        self.viewport = f(self.viewport, latest);
    }

    fn set_status(&mut self, msg: String) {
        info!("{msg}");
        self.status = Some(msg);
        self.status_is_error = false;
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        match self.view_mode {
            ViewMode::Live => {
                self.plot = live_chart::draw(
                    frame,
                    chunks[0],
                    &self.snapshot,
                    self.viewport,
                    self.session_start,
                    epoch_now(),
                );
            }
            ViewMode::Statistics => {
                stats_view::draw(frame, chunks[0], &self.frozen_summaries);
            }
        }

        status_bar::draw(
            frame,
            chunks[1],
            self.view_mode,
            self.status.as_deref(),
            self.status_is_error,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use wisense_core::LiveData;

    fn test_app() -> App {
        let (live_tx, _live_rx) = watch::channel(true);
        App::new(LiveData::shared(), live_tx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digit_keys_map_to_materials_in_live_view() {
        let app = test_app();
        assert_eq!(
            app.handle_key(key(KeyCode::Char('2'))),
            vec![Action::SetMaterial(Material::Wood)]
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Char('7'))),
            vec![Action::SetMaterial(Material::Steel)]
        );
        assert_eq!(app.handle_key(key(KeyCode::Char('8'))), vec![]);
    }

    #[test]
    fn statistics_view_ignores_everything_but_c_and_quit() {
        let mut app = test_app();
        app.view_mode = ViewMode::Statistics;
        assert_eq!(app.handle_key(key(KeyCode::Char('2'))), vec![]);
        assert_eq!(app.handle_key(key(KeyCode::Char('b'))), vec![]);
        assert_eq!(app.handle_key(key(KeyCode::Up)), vec![]);
        assert_eq!(
            app.handle_key(key(KeyCode::Char('c'))),
            vec![Action::LeaveStatisticsOrClear]
        );
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), vec![Action::Quit]);
    }

    #[test]
    fn live_view_navigation_keys() {
        let app = test_app();
        assert_eq!(app.handle_key(key(KeyCode::Home)), vec![Action::ResetViewport]);
        assert_eq!(app.handle_key(key(KeyCode::Left)), vec![Action::PanLeft]);
        assert_eq!(app.handle_key(key(KeyCode::Up)), vec![Action::ZoomIn]);
        assert_eq!(app.handle_key(key(KeyCode::Down)), vec![Action::ZoomOut]);
        assert_eq!(app.handle_key(key(KeyCode::Char('s'))), vec![Action::EnterStatistics]);
    }

    #[test]
    fn wheel_zoom_anchors_on_the_cursor_column() {
        let mut app = test_app();
        app.plot = PlotGeometry {
            area: Rect::new(10, 5, 100, 20),
            left: 0.0,
            right: 100.0,
        };

        // Column 60 is halfway across a 100-wide plot spanning 0..100s.
        let actions = app.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 60,
            row: 10,
            modifiers: KeyModifiers::NONE,
        });
        match actions.as_slice() {
            [Action::ZoomAbout(anchor, factor)] => {
                assert!((anchor - 50.0).abs() < 1e-9);
                assert!((factor - 1.0 / WHEEL_ZOOM_FACTOR).abs() < 1e-12);
            }
            other => panic!("unexpected actions: {other:?}"),
        }

        // Outside the plot: ignored.
        let actions = app.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 5,
            row: 10,
            modifiers: KeyModifiers::NONE,
        });
        assert!(actions.is_empty());
    }

    #[test]
    fn input_reader_exit_conditions_fire_once_the_loop_is_gone() {
        let (tx, rx) = mpsc::channel::<AppMessage>(8);
        assert!(!tx.is_closed());
        drop(rx);
        // Both exit paths of the reader task: an idle poll sees the
        // closed channel, and a send into it fails.
        assert!(tx.is_closed());
        assert!(tx.blocking_send(AppMessage::Sampled).is_err());
    }

    #[tokio::test]
    async fn entering_statistics_pauses_the_sampler_and_c_resumes() {
        let (live_tx, live_rx) = watch::channel(true);
        let mut app = App::new(LiveData::shared(), live_tx);

        app.dispatch(Action::EnterStatistics).await;
        assert_eq!(app.view_mode, ViewMode::Statistics);
        assert!(!*live_rx.borrow());

        app.dispatch(Action::LeaveStatisticsOrClear).await;
        assert_eq!(app.view_mode, ViewMode::Live);
        assert!(*live_rx.borrow());
    }

    #[tokio::test]
    async fn c_in_live_view_clears_and_resets_the_viewport() {
        let (live_tx, _live_rx) = watch::channel(true);
        let store = LiveData::shared();
        {
            let mut data = store.lock().await;
            data.append(epoch_now(), -40.0, -90.0);
            data.set_material(Material::Glass, epoch_now());
        }
        let mut app = App::new(store.clone(), live_tx);
        app.refresh_snapshot().await;
        app.viewport = app.viewport.pan(0.5, 100.0);
        app.session_start = 0.0;

        app.dispatch(Action::LeaveStatisticsOrClear).await;

        assert!(app.viewport.is_following());
        // The x-axis origin restarts with the cleared data.
        assert!(app.session_start > 0.0);
        assert!(app.snapshot.samples.is_empty());
        assert_eq!(app.snapshot.material, Material::Baseline);
        // The sentinel row survives in the export log.
        assert_eq!(store.lock().await.export_log().len(), 2);
    }
}
