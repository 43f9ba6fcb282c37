use cube_view::{CubeView, ViewError};
use egui::{Align2, Color32, FontId, Painter, Rect, Sense, Ui};
use glam::Vec2;

use crate::host::EguiHost;

/// Scroll distance, in points, that counts as one zoom step.
const SCROLL_STEP: f32 = 50.0;
const LABEL_FONT_SIZE: f32 = 12.0;

/// Lay out the cube canvas, forward input, run a pending tick and paint.
pub fn show(ui: &mut Ui, view: &mut CubeView<EguiHost>, dt: f32) -> Result<(), ViewError> {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
    let rect = response.rect;

    let size = (rect.width().max(0.0) as u32, rect.height().max(0.0) as u32);
    if view.host_mut().set_container(size) {
        view.handle_resize();
    }

    if response.drag_started() {
        view.pointer_pressed();
    }
    if response.dragged() {
        let delta = response.drag_delta();
        view.pointer_moved(Vec2::new(delta.x, delta.y));
    }
    if response.drag_stopped() {
        view.pointer_released();
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            view.zoom(scroll / SCROLL_STEP);
        }
    }

    let id = view.id();
    if view.host_mut().take_frame(id).is_some() {
        view.frame(dt)?;
    }

    paint(&painter, rect, view);
    Ok(())
}

fn paint(painter: &Painter, rect: Rect, view: &CubeView<EguiHost>) {
    let host = view.host();
    let Some(frame) = host.frame_of(view.id()) else {
        return;
    };

    painter.rect_filled(rect, 0.0, frame.background);
    let offset = rect.min.to_vec2();
    painter.extend(frame.shapes.iter().cloned().map(|mut shape| {
        shape.translate(offset);
        shape
    }));

    let text_color = contrast_text(frame.background);
    let font = FontId::proportional(LABEL_FONT_SIZE);
    for (text, placement) in host.visible_labels(view.id()) {
        painter.text(
            rect.min + egui::vec2(placement.screen.x, placement.screen.y),
            Align2::CENTER_CENTER,
            text,
            font.clone(),
            text_color.gamma_multiply(placement.opacity),
        );
    }
}

fn contrast_text(bg: Color32) -> Color32 {
    let r = bg.r() as f32 / 255.0;
    let g = bg.g() as f32 / 255.0;
    let b = bg.b() as f32 / 255.0;
    let luminance = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    if luminance > 0.6 {
        Color32::from_rgb(30, 30, 30)
    } else {
        Color32::from_rgb(240, 240, 240)
    }
}
