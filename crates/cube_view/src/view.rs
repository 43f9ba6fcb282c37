use std::{collections::BTreeSet, mem};

use glam::Vec2;
use magic_cube::{CubeLayout, MagicCube, CUBE_SCALE};
use settings::{ConfigDelta, CubeConfig, DeepMerge};
use tracing::{debug, info, warn};

use crate::{
    camera::PerspectiveCamera,
    controls::{ControlEvent, OrbitControls},
    error::{HostError, ViewError},
    host::{FrameRequest, Host, LabelId, ViewId},
    labels::{project_label, NodeLabel},
    reconcile::{apply_update, RebuildAction},
    scene::{NodeMesh, Scene, SequenceLine, Wireframe},
};

/// Delay between the end of a drag and auto-rotation resuming.
pub const AUTO_ROTATE_RESUME_SECS: f32 = 0.5;

/// How many times each element family has been (re)built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    pub nodes: u32,
    pub wireframe: u32,
    pub sequence_line: u32,
}

/// Host resources currently held by the view.
#[derive(Debug, Default)]
struct Attachments {
    surface: bool,
    label_layer: bool,
    resize_listener: bool,
}

/// One interactive magic cube widget.
pub struct CubeView<H: Host> {
    id: ViewId,
    host: H,
    config: CubeConfig,
    cube: MagicCube,
    layout: CubeLayout,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    labels: Vec<NodeLabel>,
    viewport: (u32, u32),
    /// Runtime spin flag. Differs from `config.auto_rotate` while dragging.
    auto_rotate: bool,
    resume_in: Option<f32>,
    pending_frame: Option<FrameRequest>,
    attachments: Attachments,
    stats: RebuildStats,
    destroyed: bool,
}

impl<H: Host> CubeView<H> {
    /// Build a view inside `host`'s container with `delta` over the defaults.
    pub fn create(host: H, delta: &ConfigDelta) -> Result<Self, ViewError> {
        let viewport = host.container_size().ok_or(ViewError::InvalidContainer)?;
        let cube = MagicCube::trump_boyer()?;
        let layout = CubeLayout::build(&cube, CUBE_SCALE);
        let config = CubeConfig::default().merged(delta);

        let mut view = Self {
            id: ViewId::new(),
            host,
            scene: Scene::new(config.colors.background),
            camera: PerspectiveCamera::new(config.camera.fov, viewport, config.camera.distance),
            controls: OrbitControls::new(viewport),
            labels: Vec::new(),
            viewport,
            auto_rotate: config.auto_rotate,
            resume_in: None,
            pending_frame: None,
            attachments: Attachments::default(),
            stats: RebuildStats::default(),
            destroyed: false,
            config,
            cube,
            layout,
        };

        // On error the partially mounted view is dropped, which releases
        // whatever was acquired so far.
        view.mount()?;
        info!(view = %view.id, width = viewport.0, height = viewport.1, "cube view created");
        Ok(view)
    }

    fn mount(&mut self) -> Result<(), ViewError> {
        self.host.attach_surface(self.id)?;
        self.attachments.surface = true;

        self.host.create_label_layer(self.id)?;
        self.attachments.label_layer = true;

        let mut failures = Vec::new();
        self.rebuild_nodes(&mut failures);
        if let Some(err) = failures.into_iter().next() {
            return Err(err.into());
        }
        self.rebuild_wireframe();
        self.rebuild_sequence_line();

        self.host.add_resize_listener(self.id)?;
        self.attachments.resize_listener = true;

        self.pending_frame = Some(self.host.request_frame(self.id));
        Ok(())
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Copy of the effective configuration.
    pub fn config(&self) -> CubeConfig {
        self.config.clone()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn layout(&self) -> &CubeLayout {
        &self.layout
    }

    pub fn labels(&self) -> &[NodeLabel] {
        &self.labels
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    pub fn rebuild_stats(&self) -> RebuildStats {
        self.stats
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Merge `delta` into the config and rebuild only what it touches.
    ///
    /// The merged config is kept and every planned action runs even when a
    /// host call fails. Host failures are reported together afterwards.
    pub fn update_config(&mut self, delta: &ConfigDelta) -> Result<&mut Self, ViewError> {
        if self.destroyed {
            return Err(ViewError::Destroyed);
        }

        let (config, plan) = apply_update(&self.config, delta);
        self.config = config;

        let mut failures = Vec::new();
        for action in plan.iter() {
            match action {
                RebuildAction::Nodes => self.rebuild_nodes(&mut failures),
                RebuildAction::Wireframe => self.rebuild_wireframe(),
                RebuildAction::SequenceLine => self.rebuild_sequence_line(),
                RebuildAction::Background => {
                    self.scene.background = self.config.colors.background;
                }
                RebuildAction::CameraFov => self.camera.set_fov(self.config.camera.fov),
                RebuildAction::CameraDistance => {
                    self.camera.set_distance(self.config.camera.distance);
                }
                RebuildAction::AutoRotate => {
                    self.auto_rotate = self.config.auto_rotate;
                    self.resume_in = None;
                }
            }
        }

        if !failures.is_empty() {
            warn!(
                view = %self.id,
                actions = ?plan,
                failures = failures.len(),
                "config update incomplete"
            );
            return Err(ViewError::Update(failures));
        }
        debug!(view = %self.id, actions = ?plan, "applied config update");
        Ok(self)
    }

    /// Advance one display tick: spin, orbit, place labels, draw.
    pub fn frame(&mut self, dt_secs: f32) -> Result<(), ViewError> {
        if self.destroyed {
            return Ok(());
        }

        // The request that scheduled this tick has fired; ask for the next one
        // first so a failing draw does not stop the loop.
        self.pending_frame = Some(self.host.request_frame(self.id));

        if let Some(remaining) = self.resume_in.as_mut() {
            *remaining -= dt_secs;
            if *remaining <= 0.0 {
                self.resume_in = None;
                self.auto_rotate = self.config.auto_rotate;
            }
        }

        if self.auto_rotate {
            self.scene.group.rotation_y += self.config.rotation_speed;
        }

        self.controls.update(&mut self.camera);

        if self.config.show_node_numbers {
            self.place_labels();
        }

        self.host.render(self.id, &self.scene, &self.camera)?;
        Ok(())
    }

    fn place_labels(&mut self) {
        let group_world = self.scene.group.world_matrix();
        let view_projection = self.camera.view_projection();
        let viewport = Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32);

        for label in &self.labels {
            let placement = project_label(label.position, &group_world, &view_projection, viewport);
            self.host.place_label(label.id, &placement);
        }
    }

    /// Re-read the container size. Called by the host's resize listener.
    pub fn handle_resize(&mut self) {
        if self.destroyed || !self.attachments.resize_listener {
            return;
        }
        let Some(size) = self.host.container_size() else {
            return;
        };
        self.viewport = size;
        self.camera.set_viewport(size);
        self.controls.set_viewport(size);
        debug!(view = %self.id, width = size.0, height = size.1, "viewport resized");
    }

    pub fn pointer_pressed(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(ControlEvent::Start) = self.controls.pointer_pressed() {
            self.auto_rotate = false;
            self.resume_in = None;
        }
    }

    pub fn pointer_moved(&mut self, delta: Vec2) {
        if !self.destroyed {
            self.controls.pointer_moved(delta);
        }
    }

    pub fn pointer_released(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(ControlEvent::End) = self.controls.pointer_released() {
            if self.config.auto_rotate {
                self.resume_in = Some(AUTO_ROTATE_RESUME_SECS);
            }
        }
    }

    pub fn zoom(&mut self, steps: f32) {
        if !self.destroyed {
            self.controls.zoom(steps);
        }
    }

    /// Release nodes and labels, then recreate them from a fresh layout.
    ///
    /// Labels the host could not remove stay tracked and are not inserted
    /// twice, so the view and its label layer keep matching.
    fn rebuild_nodes(&mut self, failures: &mut Vec<HostError>) {
        let released_labels = self.release_labels(failures);
        let released_nodes = self.scene.group.nodes.len();
        self.scene.group.nodes.clear();

        self.layout = CubeLayout::build(&self.cube, CUBE_SCALE);

        if self.config.show_nodes {
            let radius = self.config.node_size;
            let color = self.config.colors.nodes;
            self.scene.group.nodes = self
                .layout
                .nodes()
                .map(|(number, position)| NodeMesh {
                    number,
                    position,
                    radius,
                    color,
                })
                .collect();
        }

        if self.config.show_node_numbers {
            let kept: BTreeSet<u32> = self.labels.iter().map(|label| label.number).collect();
            self.labels
                .reserve(self.layout.len().saturating_sub(kept.len()));
            for (number, position) in self.layout.nodes() {
                if kept.contains(&number) {
                    continue;
                }
                let id = LabelId {
                    view: self.id,
                    number,
                };
                match self.host.insert_label(id, &number.to_string()) {
                    Ok(()) => self.labels.push(NodeLabel {
                        id,
                        number,
                        position,
                    }),
                    Err(err) => failures.push(err),
                }
            }
        }

        self.stats.nodes += 1;
        debug!(
            view = %self.id,
            released_nodes,
            released_labels,
            nodes = self.scene.group.nodes.len(),
            labels = self.labels.len(),
            "rebuilt nodes"
        );
    }

    /// Remove tracked labels from the host. Returns how many were released.
    fn release_labels(&mut self, failures: &mut Vec<HostError>) -> usize {
        let mut released = 0;
        let labels = mem::take(&mut self.labels);
        for label in labels {
            match self.host.remove_label(label.id) {
                Ok(()) => released += 1,
                // Already gone from the host, stop tracking it.
                Err(err @ HostError::UnknownLabel(_)) => failures.push(err),
                Err(err) => {
                    failures.push(err);
                    self.labels.push(label);
                }
            }
        }
        released
    }

    fn rebuild_wireframe(&mut self) {
        self.scene.group.wireframe = self
            .config
            .show_cube_wireframe
            .then(|| Wireframe::new(CUBE_SCALE, self.config.colors.wireframe));
        self.stats.wireframe += 1;
    }

    fn rebuild_sequence_line(&mut self) {
        self.scene.group.sequence_line = SequenceLine::new(
            &self.layout,
            &self.config.line_mode,
            self.config.colors.sequence_line,
        );
        self.stats.sequence_line += 1;
    }

    /// Stop the frame loop and give every host resource back.
    ///
    /// All steps run even when some fail; failures are reported together.
    /// Calling this again is a no-op.
    pub fn destroy(&mut self) -> Result<(), ViewError> {
        if self.destroyed {
            return Ok(());
        }
        self.destroyed = true;

        let mut failures = Vec::new();

        if let Some(request) = self.pending_frame.take() {
            if let Err(err) = self.host.cancel_frame(request) {
                failures.push(err);
            }
        }

        if mem::take(&mut self.attachments.resize_listener) {
            if let Err(err) = self.host.remove_resize_listener(self.id) {
                failures.push(err);
            }
        }

        self.controls.dispose();

        // Removing the layer takes its labels with it.
        self.labels.clear();
        if mem::take(&mut self.attachments.label_layer) {
            if let Err(err) = self.host.remove_label_layer(self.id) {
                failures.push(err);
            }
        }

        if mem::take(&mut self.attachments.surface) {
            if let Err(err) = self.host.detach_surface(self.id) {
                failures.push(err);
            }
        }

        if failures.is_empty() {
            info!(view = %self.id, "cube view destroyed");
            Ok(())
        } else {
            warn!(view = %self.id, failures = failures.len(), "cube view teardown incomplete");
            Err(ViewError::Teardown(failures))
        }
    }
}

impl<H: Host> Drop for CubeView<H> {
    fn drop(&mut self) {
        if let Err(err) = self.destroy() {
            warn!(view = %self.id, "teardown on drop failed: {err}");
        }
    }
}

impl<H: Host> std::fmt::Debug for CubeView<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CubeView")
            .field("id", &self.id)
            .field("viewport", &self.viewport)
            .field("nodes", &self.scene.group.nodes.len())
            .field("labels", &self.labels.len())
            .field("auto_rotate", &self.auto_rotate)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
