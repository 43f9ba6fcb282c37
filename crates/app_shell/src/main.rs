mod config_panel;
mod host;
mod log_panel;
mod viewport;

use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use cube_view::{CubeView, ViewError};
use host::EguiHost;
use settings::{ConfigDelta, DeepMerge, SettingsStore, UserSettings};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const APP_NAME: &str = "Magic Cube";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(log_panel::layer())
        .init();

    let settings_store = SettingsStore::new().context("settings store init failed")?;
    let user_settings = match settings_store.load() {
        Ok(settings) => settings,
        Err(err) => {
            warn!("Using default settings (failed to load): {err}");
            UserSettings::default()
        }
    };
    info!(path = %settings_store.path().display(), "settings loaded");

    let window = &user_settings.window;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_title(APP_NAME),
        ..Default::default()
    };

    let app =
        CubeViewerApp::new(settings_store, user_settings).context("failed to create cube view")?;

    eframe::run_native(APP_NAME, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|err| anyhow!("event loop error: {err}"))
}

struct CubeViewerApp {
    view: CubeView<EguiHost>,
    settings_store: SettingsStore,
    user_settings: UserSettings,
    last_frame_time: Option<Instant>,
    current_fps: f32,
    fps_accum_time: f32,
    fps_frame_count: u32,
    pending_save: PendingSave,
}

/// Settings edits not yet written to disk.
///
/// Sliders and colour pickers report a change on every repaint while held,
/// so writes wait until no pointer button is down.
#[derive(Debug, Default)]
struct PendingSave {
    dirty: bool,
}

impl PendingSave {
    fn mark(&mut self) {
        self.dirty = true;
    }

    /// True once per batch of edits, when the pointer has been released.
    fn take_ready(&mut self, pointer_down: bool) -> bool {
        if pointer_down || !self.dirty {
            return false;
        }
        self.dirty = false;
        true
    }
}

impl CubeViewerApp {
    fn new(settings_store: SettingsStore, user_settings: UserSettings) -> Result<Self, ViewError> {
        let view = create_view(&user_settings)?;
        Ok(Self {
            view,
            settings_store,
            user_settings,
            last_frame_time: None,
            current_fps: 0.0,
            fps_accum_time: 0.0,
            fps_frame_count: 0,
            pending_save: PendingSave::default(),
        })
    }

    /// Seconds since the previous repaint, also feeding the FPS readout.
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        match self.last_frame_time.replace(now) {
            Some(previous) => {
                let dt = (now - previous).as_secs_f32();
                self.fps_accum_time += dt;
                self.fps_frame_count += 1;
                if self.fps_accum_time >= 1.0 {
                    self.current_fps = self.fps_frame_count as f32 / self.fps_accum_time.max(1e-3);
                    self.fps_accum_time = 0.0;
                    self.fps_frame_count = 0;
                }
                dt
            }
            None => 0.016,
        }
    }

    fn apply(&mut self, delta: &ConfigDelta) {
        if let Err(err) = self.view.update_config(delta) {
            // An incomplete update still committed the new config.
            if !matches!(err, ViewError::Update(_)) {
                error!("Failed to apply cube settings: {err}");
                return;
            }
            warn!("Cube settings applied with host errors: {err}");
        }
        self.user_settings.cube.merge_from(delta);
        self.pending_save.mark();
    }

    fn reset(&mut self) {
        self.user_settings.cube = ConfigDelta::default();
        match create_view(&self.user_settings) {
            // Assigning drops the old view, which tears it down.
            Ok(view) => self.view = view,
            Err(err) => error!("Failed to recreate cube view: {err}"),
        }
        self.pending_save.mark();
    }

    fn save_settings(&self) {
        if let Err(err) = self.settings_store.save(&self.user_settings) {
            warn!("Failed to save settings: {err}");
        }
    }
}

fn create_view(settings: &UserSettings) -> Result<CubeView<EguiHost>, ViewError> {
    // Real canvas size arrives with the first layout pass.
    let initial = (
        settings.window.width.max(1.0) as u32,
        settings.window.height.max(1.0) as u32,
    );
    CubeView::create(EguiHost::new(initial), &settings.cube)
}

impl Drop for CubeViewerApp {
    fn drop(&mut self) {
        if self.pending_save.take_ready(false) {
            self.save_settings();
        }
    }
}

impl eframe::App for CubeViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = self.tick();

        let config = self.view.config();
        let output = config_panel::draw(ctx, &config, &mut self.user_settings);
        if output.reset_requested {
            self.reset();
        } else if !output.delta.is_empty() {
            self.apply(&output.delta);
        }
        if output.viewer_changed {
            self.pending_save.mark();
        }
        if self
            .pending_save
            .take_ready(ctx.input(|i| i.pointer.any_down()))
        {
            self.save_settings();
        }

        if self.user_settings.show_log_panel {
            log_panel::show(ctx);
        }

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{:.0} fps", self.current_fps));
                ui.separator();
                ui.label(format!("magic constant {}", magic_cube::MAGIC_CONSTANT));
                ui.separator();
                ui.label("drag to orbit, scroll to zoom");
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if let Err(err) = viewport::show(ui, &mut self.view, dt) {
                    error!("Cube frame failed: {err}");
                }
            });

        let fps_cap = self.user_settings.fps_cap.max(0.0);
        if fps_cap > 0.0 {
            ctx.request_repaint_after(Duration::from_secs_f32(1.0 / fps_cap));
        } else {
            ctx.request_repaint();
        }
    }
}
