//! Neru entrypoint: wires the navigation core against the external
//! collaborators defined in `neru-backend` and drives the worker loop that
//! turns tap events into mode transitions and accessibility actions.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

use neru_actions::{direct_action_for, hotkey_mode_for, route, DirectAction, GridManager, HintManager, RecursiveGridController, RouteOutcome};
use neru_backend::{
    AccessibilityPort, ActionType, ElementFilter, EventTap, MockAccessibilityPort, MockEventTap,
    MockOverlayBackend, MoveMouseRelative, Style,
};
use neru_config::{Config, StyleConfig};
use neru_events::{KeyEventExt, KeyToken, NeruError, NeruResult, TapEvent};
use neru_geometry::{Point, Rect};
use neru_grid::GridCache;
use neru_input::{spawn_event_tap_pump, EventTapPump};
use neru_labels::LabelCache;
use neru_model::{Element, HintCollection, Role};
use neru_render::OverlayRenderer;
use neru_state::{Mode, ModeStateMachine};

const RECURSIVE_GRID_COLS: usize = 2;
const RECURSIVE_GRID_ROWS: usize = 2;
const RECURSIVE_GRID_KEYS: &str = "UIJK";
const RECURSIVE_GRID_COMMIT: char = '\n';
const RECURSIVE_GRID_FLOOR: i32 = 10;
const COMMON_SCREEN_SIZES: &[(i32, i32)] = &[(1920, 1080), (1366, 768), (2560, 1440)];

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "neru", version, about = "Keyboard-driven mouse-replacement navigation layer")]
struct Args {
    /// Optional configuration file path (overrides discovery of `neru.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("neru.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "neru.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => self.log_guard = Some(guard),
            Err(_) => {
                // A subscriber is already installed (e.g. under a test harness); drop the guard.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: std::sync::Once = std::sync::Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn style_from_config(cfg: &StyleConfig) -> Style {
    Style {
        font_family: cfg.font_family.clone(),
        font_size: cfg.font_size,
        text_color: cfg.text_color.clone(),
        background_color: cfg.background_color.clone(),
        matched_color: cfg.matched_color.clone(),
        border_width: cfg.border_width,
        padding: cfg.padding,
        border_radius: cfg.border_radius,
    }
}

/// A synthetic clickable-element inventory standing in for a real
/// accessibility enumeration, since no native `AccessibilityPort` binding is
/// linked into this workspace (§6).
fn seed_elements(screen: Rect) -> Vec<Element> {
    let cols = 6;
    let rows = 4;
    let cell_w = screen.width() / cols;
    let cell_h = screen.height() / rows;
    let mut elements = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let x = screen.min.x + col * cell_w + 8;
            let y = screen.min.y + row * cell_h + 8;
            let bounds = Rect::from_xywh(x, y, cell_w - 16, cell_h - 16).expect("positive synthetic cell size");
            let id = format!("synthetic-{row}-{col}");
            elements.push(Element::new(id, bounds, Role::Button, None, None, true).expect("non-empty id"));
        }
    }
    elements
}

/// Every piece of mutable per-mode state the worker loop needs between
/// keystrokes. Constructed once; mode managers are rebuilt on mode entry
/// rather than kept alive across transitions (§4.8: managers are scoped to an
/// activation, not process-wide singletons).
struct NavigationCore {
    mode_machine: Arc<ModeStateMachine>,
    renderer: Arc<OverlayRenderer<MockOverlayBackend>>,
    accessibility: Arc<dyn AccessibilityPort>,
    tap: Arc<dyn EventTap>,
    pump: EventTapPump,
    config: Config,
    label_cache: LabelCache,
    grid_cache: GridCache,
    hint_manager: Mutex<Option<HintManager>>,
    grid_manager: Mutex<Option<Arc<GridManager>>>,
    recursive_grid: Mutex<Option<RecursiveGridController>>,
}

impl NavigationCore {
    fn exit_keys_for(&self, mode: Mode) -> Vec<String> {
        match mode {
            Mode::Hints => self.config.exit_keys.hints.clone(),
            Mode::Grid => self.config.exit_keys.grid.clone(),
            Mode::RecursiveGrid => self.config.exit_keys.recursive_grid.clone(),
            Mode::Scroll => self.config.exit_keys.scroll.clone(),
            Mode::Action => self.config.exit_keys.action.clone(),
            Mode::Idle => Vec::new(),
        }
    }

    /// Mode-entry setup (§4.8: "enabling/disabling is driven by a
    /// subscriber"). Runs on the `ModeStateMachine`'s subscriber callback, so
    /// it must not call `switch_to` itself.
    fn on_mode_changed(&self, prev: Mode, next: Mode) {
        if next.wants_event_tap() {
            self.tap.enable();
        } else {
            self.tap.disable();
        }

        match next {
            Mode::Idle => {
                *self.hint_manager.lock().unwrap() = None;
                *self.grid_manager.lock().unwrap() = None;
                *self.recursive_grid.lock().unwrap() = None;
                if let Err(err) = self.renderer.hide() {
                    warn!(target: "runtime", ?err, "failed to hide overlay on idle entry");
                }
            }
            Mode::Hints => {
                if let Err(err) = self.enter_hints() {
                    error!(target: "runtime", ?err, "failed to enter hints mode");
                    self.mode_machine.switch_to(Mode::Idle);
                }
            }
            Mode::Grid => {
                if let Err(err) = self.enter_grid() {
                    error!(target: "runtime", ?err, "failed to enter grid mode");
                    self.mode_machine.switch_to(Mode::Idle);
                }
            }
            Mode::RecursiveGrid => {
                if let Err(err) = self.enter_recursive_grid() {
                    error!(target: "runtime", ?err, "failed to enter recursive-grid mode");
                    self.mode_machine.switch_to(Mode::Idle);
                }
            }
            Mode::Scroll | Mode::Action => {
                // No overlay surface; direct keys act against the cursor position.
            }
        }

        info!(target: "mode.switch", ?prev, ?next, "mode entry handled");
    }

    fn enter_hints(&self) -> NeruResult<()> {
        let screen = self.accessibility.screen_bounds()?;
        let mut filter = ElementFilter::default();
        filter.include_menu_bar = self.config.features.include_menubar;
        let elements = self.accessibility.clickable_elements(&filter)?;
        let elements: Vec<Arc<Element>> = if elements.is_empty() {
            seed_elements(screen).into_iter().map(Arc::new).collect()
        } else {
            elements.into_iter().map(Arc::new).collect()
        };

        let collection = HintCollection::build(elements, &self.label_cache, &self.config.charsets.hints)?;
        let renderer = Arc::clone(&self.renderer);
        let manager = HintManager::new(
            collection,
            move |hints| {
                if let Err(err) = renderer.draw_hints(&hints, "") {
                    warn!(target: "runtime", ?err, "failed to draw hints");
                }
            },
            None,
        );
        *self.hint_manager.lock().unwrap() = Some(manager);
        self.renderer.show()
    }

    fn enter_grid(&self) -> NeruResult<()> {
        let screen = self.accessibility.screen_bounds()?;
        let grid = self.grid_cache.get_or_build(&self.config.charsets.grid_main, None, None, screen)?;
        if self.config.features.prewarm {
            if let Err(err) = self.grid_cache.prewarm(&self.config.charsets.grid_main, None, None, COMMON_SCREEN_SIZES) {
                warn!(target: "grid.build", ?err, "prewarm failed");
            }
        }

        let renderer = Arc::clone(&self.renderer);
        renderer.draw_grid(&grid, "")?;

        let sub_keys = self.config.charsets.grid_subgrid.clone();
        let sub_keys_for_closure = sub_keys.clone();
        let sub_renderer = Arc::clone(&self.renderer);
        let manager = Arc::new(GridManager::with_subgrid(
            grid,
            3,
            3,
            &sub_keys,
            Some(Arc::new(move |cell| {
                if let Err(err) = sub_renderer.show_subgrid(cell, 3, 3, &sub_keys_for_closure) {
                    warn!(target: "runtime", ?err, "failed to draw subgrid");
                }
            })),
        ));
        *self.grid_manager.lock().unwrap() = Some(manager);
        self.renderer.show()
    }

    fn enter_recursive_grid(&self) -> NeruResult<()> {
        let screen = self.accessibility.screen_bounds()?;
        let controller = RecursiveGridController::new(
            screen,
            RECURSIVE_GRID_COLS,
            RECURSIVE_GRID_ROWS,
            RECURSIVE_GRID_KEYS,
            RECURSIVE_GRID_COMMIT,
            RECURSIVE_GRID_FLOOR,
        )?;
        *self.recursive_grid.lock().unwrap() = Some(controller);
        self.renderer.show()
    }

    fn move_mouse_step(&self) -> i32 {
        self.config.move_mouse_step
    }

    /// Dispatches one normalized keystroke against whichever mode is active.
    /// Exit keys are handled uniformly before the mode-specific managers see
    /// anything.
    fn handle_key(&self, event: &KeyEventExt) -> NeruResult<()> {
        let mode = self.mode_machine.current();
        if mode == Mode::Idle {
            if let Some(target) = hotkey_mode_for(&event.token) {
                self.mode_machine.switch_to(target);
            }
            return Ok(());
        }

        let exit_keys = self.exit_keys_for(mode);
        let RouteOutcome { exit, token } = route(event.token.clone(), &exit_keys);
        if exit {
            self.mode_machine.switch_to(Mode::Idle);
            return Ok(());
        }
        let Some(token) = token else {
            return Ok(());
        };

        match mode {
            Mode::Hints => self.handle_hints_key(&token),
            Mode::Grid => self.handle_grid_key(&token),
            Mode::RecursiveGrid => self.handle_recursive_grid_key(&token),
            Mode::Action => self.handle_action_key(&token),
            Mode::Scroll => self.handle_scroll_key(&token),
            Mode::Idle => Ok(()),
        }
    }

    fn handle_hints_key(&self, token: &KeyToken) -> NeruResult<()> {
        let hint_manager = self.hint_manager.lock().unwrap();
        let Some(manager) = hint_manager.as_ref() else {
            return Ok(());
        };
        let (hint, completed) = manager.handle_key(token);
        drop(hint_manager);
        if completed {
            if let Some(hint) = hint {
                self.accessibility.perform_action(hint.element(), ActionType::LeftClick)?;
            }
            self.mode_machine.switch_to(Mode::Idle);
        }
        Ok(())
    }

    fn handle_grid_key(&self, token: &KeyToken) -> NeruResult<()> {
        let grid_manager = self.grid_manager.lock().unwrap();
        let Some(manager) = grid_manager.as_ref().cloned() else {
            return Ok(());
        };
        drop(grid_manager);
        let (point, completed) = manager.handle_key(token)?;
        if completed {
            if let Some(point) = point {
                self.accessibility.perform_action_at_point(ActionType::LeftClick, point)?;
            }
            self.mode_machine.switch_to(Mode::Idle);
        }
        Ok(())
    }

    fn handle_recursive_grid_key(&self, token: &KeyToken) -> NeruResult<()> {
        let Some(c) = token.as_plain_char() else {
            return Ok(());
        };
        let recursive_grid = self.recursive_grid.lock().unwrap();
        let Some(controller) = recursive_grid.as_ref() else {
            return Ok(());
        };
        let (point, completed) = controller.handle_key(c);
        drop(recursive_grid);
        if completed {
            if let Some(point) = point {
                self.accessibility.perform_action_at_point(ActionType::LeftClick, point)?;
            }
            self.mode_machine.switch_to(Mode::Idle);
        }
        Ok(())
    }

    fn handle_action_key(&self, token: &KeyToken) -> NeruResult<()> {
        let Some(direct) = direct_action_for(token, self.move_mouse_step()) else {
            return Ok(());
        };
        match direct {
            DirectAction::Move { dx, dy } => {
                let screen = self.accessibility.screen_bounds()?;
                let current = self.accessibility.cursor_position()?;
                let next = MoveMouseRelative::new(dx, dy).resolve(current, screen);
                self.accessibility.move_cursor_to(next, false)?;
            }
            DirectAction::Click(action) => {
                let point = self.accessibility.cursor_position()?;
                self.accessibility.perform_action_at_point(action, point)?;
            }
        }
        Ok(())
    }

    /// Scroll mode has no dedicated manager in the navigation core (§4 lists
    /// no Scroll-specific module); arrow keys issue a `Scroll` action at the
    /// current cursor position, reusing the action-mode arrow mapping.
    fn handle_scroll_key(&self, token: &KeyToken) -> NeruResult<()> {
        let Some(DirectAction::Move { .. }) = direct_action_for(token, self.move_mouse_step()) else {
            return Ok(());
        };
        let point = self.accessibility.cursor_position()?;
        self.accessibility.perform_action_at_point(ActionType::Scroll, point)?;
        Ok(())
    }
}

/// Consumes `TapEvent`s from the channel until `Shutdown`, `recv` returning
/// `None`, or a fatal error escapes a handler (§5 worker loop).
async fn run_worker(core: Arc<NavigationCore>, mut rx: mpsc::Receiver<TapEvent>, hooks_epoch: Instant) -> Result<()> {
    while let Some(event) = rx.recv().await {
        match event {
            TapEvent::Key(key) => {
                trace!(target: "runtime", micros = key.timestamp_micros, "tap_event");
                if let Err(err) = core.handle_key(&key) {
                    warn!(target: "runtime", ?err, "key handler error; returning to idle");
                    if !err.is_recoverable() {
                        return Err(err).context("unrecoverable error handling keystroke");
                    }
                    core.mode_machine.switch_to(Mode::Idle);
                }
            }
            TapEvent::HotkeysChanged => {
                info!(target: "runtime", "hotkeys changed");
            }
            TapEvent::Shutdown => {
                info!(target: "runtime.shutdown", "shutdown event received");
                break;
            }
        }
    }
    let _ = hooks_epoch;
    Ok(())
}

/// Registers the fixed Idle/Hints/Grid activation hotkeys on the event tap
/// (§6: hotkeys are delivered to the router as already-decoded tokens, so the
/// tap itself only needs the literal key strings to watch for).
fn register_hotkeys(tap: &dyn EventTap) {
    tap.set_hotkeys(&["f".to_string(), "g".to_string(), "r".to_string()]);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<NeruError>().map(NeruError::exit_code).unwrap_or(1)
}

async fn async_main(args: Args) -> Result<()> {
    let config = neru_config::load_from(args.config.clone()).context("loading configuration")?;

    let screen = Rect::from_xywh(0, 0, 1920, 1080).expect("fixed synthetic screen bounds are valid");
    let accessibility: Arc<dyn AccessibilityPort> =
        Arc::new(MockAccessibilityPort::new(seed_elements(screen), screen));
    if let Some(bundle_id) = accessibility.focused_app_bundle_id()? {
        if accessibility.is_app_excluded(&bundle_id) {
            return Err(NeruError::Permission(format!("{bundle_id} is excluded from navigation")).into());
        }
    }

    let overlay = Arc::new(MockOverlayBackend::default());
    let renderer = Arc::new(OverlayRenderer::new(Arc::clone(&overlay), style_from_config(&config.style)));
    renderer.set_hide_unmatched(config.features.hide_unmatched);

    let tap: Arc<dyn EventTap> = Arc::new(MockEventTap::default());
    register_hotkeys(tap.as_ref());

    let (tx, rx) = mpsc::channel(256);
    let pump = spawn_event_tap_pump(Arc::clone(&tap), tx, Arc::new(neru_events::NoopMetricsSink));

    let core = Arc::new(NavigationCore {
        mode_machine: Arc::new(ModeStateMachine::new()),
        renderer,
        accessibility,
        tap,
        pump,
        config,
        label_cache: LabelCache::new(),
        grid_cache: GridCache::default(),
        hint_manager: Mutex::new(None),
        grid_manager: Mutex::new(None),
        recursive_grid: Mutex::new(None),
    });

    let subscriber_core = Arc::clone(&core);
    core.mode_machine.subscribe(move |prev, next| subscriber_core.on_mode_changed(prev, next));

    // Mirrors the teacher's Ctrl-C shutdown stage: disable the tap and enqueue
    // a shutdown event rather than tearing the process down immediately.
    let shutdown_core = Arc::clone(&core);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(target: "runtime.shutdown", "ctrl-c received");
            shutdown_core.pump.shutdown();
        }
    });

    run_worker(core, rx, Instant::now()).await
}

fn main() -> std::process::ExitCode {
    let mut startup = AppStartup::new();
    if let Err(err) = startup.configure_logging() {
        eprintln!("failed to configure logging: {err:#}");
        return std::process::ExitCode::from(1);
    }
    AppStartup::install_panic_hook();

    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            error!(target: "runtime", ?err, "failed to build tokio runtime");
            return std::process::ExitCode::from(3);
        }
    };

    match runtime.block_on(async_main(args)) {
        Ok(()) => std::process::ExitCode::from(0),
        Err(err) => {
            let code = exit_code_for(&err);
            error!(target: "runtime", ?err, code, "fatal error");
            std::process::ExitCode::from(code as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neru_events::{KeyToken, NamedKey};

    fn test_core() -> Arc<NavigationCore> {
        let screen = Rect::from_xywh(0, 0, 800, 600).unwrap();
        let accessibility: Arc<dyn AccessibilityPort> =
            Arc::new(MockAccessibilityPort::new(seed_elements(screen), screen));
        let overlay = Arc::new(MockOverlayBackend::default());
        let renderer = Arc::new(OverlayRenderer::new(overlay, Style::default()));
        let tap: Arc<dyn EventTap> = Arc::new(MockEventTap::default());
        let (tx, _rx) = mpsc::channel(8);
        let pump = spawn_event_tap_pump(Arc::clone(&tap), tx, Arc::new(neru_events::NoopMetricsSink));

        Arc::new(NavigationCore {
            mode_machine: Arc::new(ModeStateMachine::new()),
            renderer,
            accessibility,
            tap,
            pump,
            config: Config::default(),
            label_cache: LabelCache::new(),
            grid_cache: GridCache::default(),
            hint_manager: Mutex::new(None),
            grid_manager: Mutex::new(None),
            recursive_grid: Mutex::new(None),
        })
    }

    #[test]
    fn entering_hints_mode_builds_a_hint_manager() {
        let core = test_core();
        let subscriber_core = Arc::clone(&core);
        core.mode_machine.subscribe(move |prev, next| subscriber_core.on_mode_changed(prev, next));

        core.mode_machine.switch_to(Mode::Hints);
        assert!(core.hint_manager.lock().unwrap().is_some());
        assert!(core.tap.is_enabled());
    }

    #[test]
    fn escape_in_hints_mode_returns_to_idle() {
        let core = test_core();
        let subscriber_core = Arc::clone(&core);
        core.mode_machine.subscribe(move |prev, next| subscriber_core.on_mode_changed(prev, next));
        core.mode_machine.switch_to(Mode::Hints);

        core.handle_key(&KeyEventExt::new(KeyToken::Named(NamedKey::Escape), Instant::now(), Instant::now())).unwrap();

        assert_eq!(core.mode_machine.current(), Mode::Idle);
        assert!(core.hint_manager.lock().unwrap().is_none());
    }

    #[test]
    fn action_mode_arrow_key_moves_the_cursor() {
        let core = test_core();
        let subscriber_core = Arc::clone(&core);
        core.mode_machine.subscribe(move |prev, next| subscriber_core.on_mode_changed(prev, next));
        core.mode_machine.switch_to(Mode::Action);

        core.handle_key(&KeyEventExt::new(KeyToken::Named(NamedKey::Right), Instant::now(), Instant::now())).unwrap();

        let moved = core.accessibility.cursor_position().unwrap();
        assert_eq!(moved, Point::new(core.move_mouse_step(), 0));
    }

    #[test]
    fn hotkey_from_idle_enters_the_matching_mode() {
        let core = test_core();
        let subscriber_core = Arc::clone(&core);
        core.mode_machine.subscribe(move |prev, next| subscriber_core.on_mode_changed(prev, next));
        assert_eq!(core.mode_machine.current(), Mode::Idle);

        core.handle_key(&KeyEventExt::new(KeyToken::Char('f'), Instant::now(), Instant::now())).unwrap();

        assert_eq!(core.mode_machine.current(), Mode::Hints);
        assert!(core.hint_manager.lock().unwrap().is_some());
    }

    #[test]
    fn non_hotkey_from_idle_stays_idle() {
        let core = test_core();
        let subscriber_core = Arc::clone(&core);
        core.mode_machine.subscribe(move |prev, next| subscriber_core.on_mode_changed(prev, next));

        core.handle_key(&KeyEventExt::new(KeyToken::Char('z'), Instant::now(), Instant::now())).unwrap();

        assert_eq!(core.mode_machine.current(), Mode::Idle);
    }

    #[tokio::test]
    async fn a_hotkey_dispatched_through_the_worker_loop_activates_its_mode() {
        let core = test_core();
        let subscriber_core = Arc::clone(&core);
        core.mode_machine.subscribe(move |prev, next| subscriber_core.on_mode_changed(prev, next));

        let (tx, rx) = mpsc::channel(8);
        tx.send(TapEvent::Key(KeyEventExt::new(KeyToken::Char('g'), Instant::now(), Instant::now())))
            .await
            .unwrap();
        tx.send(TapEvent::Shutdown).await.unwrap();

        run_worker(Arc::clone(&core), rx, Instant::now()).await.unwrap();

        assert_eq!(core.mode_machine.current(), Mode::Grid);
        assert!(core.grid_manager.lock().unwrap().is_some());
    }

    #[test]
    fn exit_code_for_permission_error_is_two() {
        let err: anyhow::Error = NeruError::Permission("no".into()).into();
        assert_eq!(exit_code_for(&err), 2);
    }

    #[test]
    fn exit_code_for_generic_anyhow_error_defaults_to_one() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(exit_code_for(&err), 1);
    }
}
