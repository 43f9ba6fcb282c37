use egui::{Context, Ui};
use settings::{ConfigDelta, CubeConfig, DeepMerge, LineMode, Rgb, UserSettings};

/// What the user changed in the side panel this frame.
#[derive(Debug, Default)]
pub struct PanelOutput {
    /// Cube options touched this frame. Empty when nothing was edited.
    pub delta: ConfigDelta,
    /// Viewer preferences (frame pacing, log panel) were edited.
    pub viewer_changed: bool,
    pub reset_requested: bool,
}

pub fn draw(ctx: &Context, config: &CubeConfig, settings: &mut UserSettings) -> PanelOutput {
    let mut output = PanelOutput::default();

    egui::SidePanel::right("cube_config")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Magic cube");
                ui.separator();
                display_ui(ui, config, &mut output.delta);

                ui.add_space(12.0);
                ui.separator();
                ui.label("Motion");
                motion_ui(ui, config, &mut output.delta);

                ui.add_space(12.0);
                ui.separator();
                ui.label("Camera");
                camera_ui(ui, config, &mut output.delta);

                ui.add_space(12.0);
                ui.separator();
                ui.label("Colours");
                colors_ui(ui, config, &mut output.delta);

                ui.add_space(12.0);
                ui.separator();
                ui.label("Viewer");
                output.viewer_changed = viewer_ui(ui, settings);

                ui.add_space(12.0);
                if ui.button("Reset to defaults").clicked() {
                    output.reset_requested = true;
                }
            });
        });

    output
}

fn display_ui(ui: &mut Ui, config: &CubeConfig, delta: &mut ConfigDelta) {
    let mut value = config.show_nodes;
    if ui.checkbox(&mut value, "Nodes").changed() {
        delta.show_nodes = Some(value);
    }
    let mut value = config.show_node_numbers;
    if ui.checkbox(&mut value, "Node numbers").changed() {
        delta.show_node_numbers = Some(value);
    }
    let mut value = config.show_cube_wireframe;
    if ui.checkbox(&mut value, "Bounding wireframe").changed() {
        delta.show_cube_wireframe = Some(value);
    }

    let mut size = config.node_size;
    if ui
        .add(egui::Slider::new(&mut size, 0.05..=0.6).text("Node size"))
        .changed()
    {
        delta.node_size = Some(size);
    }

    let mut selected = config.line_mode.clone();
    egui::ComboBox::from_label("Sequence line")
        .selected_text(selected.as_str().to_owned())
        .show_ui(ui, |ui| {
            for mode in LineMode::ALL {
                let label = mode.as_str().to_owned();
                ui.selectable_value(&mut selected, mode, label);
            }
        });
    if selected != config.line_mode {
        delta.line_mode = Some(selected);
    }
}

fn motion_ui(ui: &mut Ui, config: &CubeConfig, delta: &mut ConfigDelta) {
    let mut value = config.auto_rotate;
    if ui.checkbox(&mut value, "Auto-rotate").changed() {
        delta.auto_rotate = Some(value);
    }
    let mut speed = config.rotation_speed;
    if ui
        .add(
            egui::Slider::new(&mut speed, 0.0..=0.05)
                .text("Rotation speed")
                .suffix(" rad/frame"),
        )
        .changed()
    {
        delta.rotation_speed = Some(speed);
    }
}

fn camera_ui(ui: &mut Ui, config: &CubeConfig, delta: &mut ConfigDelta) {
    let mut fov = config.camera.fov;
    if ui
        .add(egui::Slider::new(&mut fov, 10.0..=120.0).text("Vertical FOV (degrees)"))
        .changed()
    {
        delta.merge_from(&ConfigDelta::default().fov(fov));
    }
    let mut distance = config.camera.distance;
    if ui
        .add(egui::Slider::new(&mut distance, 5.0..=100.0).text("Distance"))
        .changed()
    {
        delta.merge_from(&ConfigDelta::default().distance(distance));
    }
}

fn colors_ui(ui: &mut Ui, config: &CubeConfig, delta: &mut ConfigDelta) {
    let colors = &config.colors;
    egui::Grid::new("cube_colors")
        .num_columns(2)
        .spacing([10.0, 6.0])
        .show(ui, |ui| {
            if let Some(rgb) = color_row(ui, "Background", colors.background) {
                delta.merge_from(&ConfigDelta::default().background(rgb));
            }
            if let Some(rgb) = color_row(ui, "Nodes", colors.nodes) {
                delta.merge_from(&ConfigDelta::default().node_color(rgb));
            }
            if let Some(rgb) = color_row(ui, "Wireframe", colors.wireframe) {
                delta.merge_from(&ConfigDelta::default().wireframe_color(rgb));
            }
            if let Some(rgb) = color_row(ui, "Sequence line", colors.sequence_line) {
                delta.merge_from(&ConfigDelta::default().sequence_line_color(rgb));
            }
        });
}

fn color_row(ui: &mut Ui, label: &str, current: Rgb) -> Option<Rgb> {
    ui.label(label);
    let mut channels = current.channels();
    let changed = ui.color_edit_button_srgb(&mut channels).changed();
    ui.end_row();
    let [r, g, b] = channels;
    changed.then_some(Rgb::from_channels(r, g, b))
}

fn viewer_ui(ui: &mut Ui, settings: &mut UserSettings) -> bool {
    let mut changed = ui
        .checkbox(&mut settings.show_log_panel, "Show log panel")
        .changed();

    let mut cap_str = if settings.fps_cap <= 0.0 {
        String::new()
    } else {
        format!("{:.0}", settings.fps_cap)
    };

    ui.horizontal(|ui| {
        ui.label("FPS cap (0 = uncapped):");
        let response = ui.add(
            egui::TextEdit::singleline(&mut cap_str)
                .desired_width(60.0)
                .hint_text("0"),
        );
        if response.changed() {
            let s = cap_str.trim();
            let parsed = if s.is_empty() {
                0.0
            } else if let Ok(v) = s.parse::<f32>() {
                v.max(0.0)
            } else {
                settings.fps_cap
            };
            if (parsed - settings.fps_cap).abs() > f32::EPSILON {
                settings.fps_cap = parsed;
                changed = true;
            }
        }
    });

    changed
}
