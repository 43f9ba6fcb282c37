//! egui-backed [`Host`] for the desktop viewer.
//!
//! `render` flattens the scene into 2D shapes in container pixels; the
//! viewport later paints them translated to wherever egui placed the canvas.

use std::collections::{BTreeMap, BTreeSet};

use cube_view::{
    FrameRequest, Host, HostError, LabelId, LabelPlacement, PerspectiveCamera, Scene, ViewId,
};
use egui::{Color32, Pos2, Shape, Stroke};
use glam::{Mat4, Vec3};
use settings::Rgb;

const WIREFRAME_WIDTH: f32 = 1.0;
const SEQUENCE_WIDTH: f32 = 1.5;
const MIN_NODE_RADIUS_PX: f32 = 1.0;

pub fn color32(rgb: Rgb) -> Color32 {
    let [r, g, b] = rgb.channels();
    Color32::from_rgb(r, g, b)
}

#[derive(Debug, Clone)]
pub struct ScreenLabel {
    pub text: String,
    pub placement: Option<LabelPlacement>,
}

/// The last frame drawn for a view, in container pixels.
#[derive(Debug, Clone, Default)]
pub struct RenderedFrame {
    pub background: Color32,
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Default)]
pub struct EguiHost {
    container: Option<(u32, u32)>,
    surfaces: BTreeMap<ViewId, RenderedFrame>,
    label_layers: BTreeMap<ViewId, BTreeMap<u32, ScreenLabel>>,
    resize_listeners: BTreeSet<ViewId>,
    pending: BTreeMap<ViewId, FrameRequest>,
    next_frame: u64,
}

impl EguiHost {
    pub fn new(container: (u32, u32)) -> Self {
        Self {
            container: Some(container),
            ..Self::default()
        }
    }

    /// Record a new canvas size. Returns whether a listening view must be told.
    pub fn set_container(&mut self, size: (u32, u32)) -> bool {
        let changed = self.container != Some(size);
        self.container = Some(size);
        changed && !self.resize_listeners.is_empty()
    }

    /// Take the pending tick for `view`, if one was requested.
    pub fn take_frame(&mut self, view: ViewId) -> Option<FrameRequest> {
        self.pending.remove(&view)
    }

    pub fn frame_of(&self, view: ViewId) -> Option<&RenderedFrame> {
        self.surfaces.get(&view)
    }

    /// Visible labels of `view`, bottom of the stack first.
    pub fn visible_labels(&self, view: ViewId) -> Vec<(&str, LabelPlacement)> {
        let mut labels: Vec<_> = self
            .label_layers
            .get(&view)
            .into_iter()
            .flat_map(BTreeMap::values)
            .filter_map(|label| {
                label
                    .placement
                    .filter(|placement| placement.visible)
                    .map(|placement| (label.text.as_str(), placement))
            })
            .collect();
        labels.sort_by_key(|(_, placement)| placement.stack_order);
        labels
    }
}

impl Host for EguiHost {
    fn container_size(&self) -> Option<(u32, u32)> {
        self.container
    }

    fn attach_surface(&mut self, view: ViewId) -> Result<(), HostError> {
        self.surfaces.insert(view, RenderedFrame::default());
        Ok(())
    }

    fn detach_surface(&mut self, view: ViewId) -> Result<(), HostError> {
        self.surfaces
            .remove(&view)
            .map(|_| ())
            .ok_or(HostError::NotAttached(view))
    }

    fn create_label_layer(&mut self, view: ViewId) -> Result<(), HostError> {
        self.label_layers.entry(view).or_default();
        Ok(())
    }

    fn remove_label_layer(&mut self, view: ViewId) -> Result<(), HostError> {
        self.label_layers
            .remove(&view)
            .map(|_| ())
            .ok_or(HostError::NoLabelLayer(view))
    }

    fn insert_label(&mut self, label: LabelId, text: &str) -> Result<(), HostError> {
        let layer = self
            .label_layers
            .get_mut(&label.view)
            .ok_or(HostError::NoLabelLayer(label.view))?;
        layer.insert(
            label.number,
            ScreenLabel {
                text: text.to_owned(),
                placement: None,
            },
        );
        Ok(())
    }

    fn place_label(&mut self, label: LabelId, placement: &LabelPlacement) {
        if let Some(screen) = self
            .label_layers
            .get_mut(&label.view)
            .and_then(|layer| layer.get_mut(&label.number))
        {
            screen.placement = Some(*placement);
        }
    }

    fn remove_label(&mut self, label: LabelId) -> Result<(), HostError> {
        self.label_layers
            .get_mut(&label.view)
            .and_then(|layer| layer.remove(&label.number))
            .map(|_| ())
            .ok_or(HostError::UnknownLabel(label))
    }

    fn add_resize_listener(&mut self, view: ViewId) -> Result<(), HostError> {
        self.resize_listeners.insert(view);
        Ok(())
    }

    fn remove_resize_listener(&mut self, view: ViewId) -> Result<(), HostError> {
        self.resize_listeners
            .remove(&view)
            .then_some(())
            .ok_or(HostError::NoResizeListener(view))
    }

    fn request_frame(&mut self, view: ViewId) -> FrameRequest {
        self.next_frame += 1;
        let request = FrameRequest(self.next_frame);
        self.pending.insert(view, request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) -> Result<(), HostError> {
        // A request already taken by the viewport for this tick is not an error.
        self.pending.retain(|_, pending| *pending != request);
        Ok(())
    }

    fn render(
        &mut self,
        view: ViewId,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), HostError> {
        let size = self.container.unwrap_or_default();
        let frame = self
            .surfaces
            .get_mut(&view)
            .ok_or(HostError::NotAttached(view))?;
        *frame = Projector::new(scene, camera, size).frame();
        Ok(())
    }
}

/// Maps group-local positions to container pixels.
struct Projector<'a> {
    scene: &'a Scene,
    camera: &'a PerspectiveCamera,
    group_world: Mat4,
    view_projection: Mat4,
    width: f32,
    height: f32,
}

impl<'a> Projector<'a> {
    fn new(scene: &'a Scene, camera: &'a PerspectiveCamera, (width, height): (u32, u32)) -> Self {
        Self {
            scene,
            camera,
            group_world: scene.group.world_matrix(),
            view_projection: camera.view_projection(),
            width: width as f32,
            height: height as f32,
        }
    }

    /// Pixel position and NDC depth, or `None` outside the clip volume.
    fn project(&self, local: Vec3) -> Option<(Pos2, f32)> {
        let world = self.group_world.transform_point3(local);
        let ndc = self.view_projection.project_point3(world);
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        let pos = Pos2::new(
            (ndc.x * 0.5 + 0.5) * self.width,
            (-ndc.y * 0.5 + 0.5) * self.height,
        );
        Some((pos, ndc.z))
    }

    fn pixels_per_unit(&self, local: Vec3) -> f32 {
        let world = self.group_world.transform_point3(local);
        self.camera.pixels_per_unit(world, self.height)
    }

    fn frame(&self) -> RenderedFrame {
        let group = &self.scene.group;
        let mut shapes = Vec::new();

        if let Some(wireframe) = &group.wireframe {
            let stroke = Stroke::new(WIREFRAME_WIDTH, color32(wireframe.color));
            for &(start, end) in &wireframe.edges {
                let (Some((a, _)), Some((b, _))) = (self.project(start), self.project(end)) else {
                    continue;
                };
                let scale = self.pixels_per_unit((start + end) * 0.5);
                shapes.extend(Shape::dashed_line(
                    &[a, b],
                    stroke,
                    wireframe.dash_size * scale,
                    wireframe.gap_size * scale,
                ));
            }
        }

        if let Some(line) = &group.sequence_line {
            let points: Vec<Pos2> = line
                .points
                .iter()
                .filter_map(|&point| self.project(point).map(|(pos, _)| pos))
                .collect();
            if points.len() > 1 {
                shapes.push(Shape::line(
                    points,
                    Stroke::new(SEQUENCE_WIDTH, color32(line.color)),
                ));
            }
        }

        // Painter's algorithm: farthest spheres first.
        let mut nodes: Vec<(Pos2, f32, f32, Color32)> = group
            .nodes
            .iter()
            .filter_map(|node| {
                let (pos, depth) = self.project(node.position)?;
                let radius = (node.radius * self.pixels_per_unit(node.position))
                    .max(MIN_NODE_RADIUS_PX);
                Some((pos, depth, radius, color32(node.color)))
            })
            .collect();
        nodes.sort_by(|a, b| b.1.total_cmp(&a.1));
        shapes.extend(
            nodes
                .into_iter()
                .map(|(pos, _, radius, color)| Shape::circle_filled(pos, radius, color)),
        );

        RenderedFrame {
            background: color32(self.scene.background),
            shapes,
        }
    }
}
