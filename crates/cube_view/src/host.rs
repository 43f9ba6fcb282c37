use std::fmt;

use uuid::Uuid;

use crate::{camera::PerspectiveCamera, error::HostError, labels::LabelPlacement, scene::Scene};

/// Identity of one view instance. Scopes every host resource the view owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A node label element. One per cube number within a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId {
    pub view: ViewId,
    pub number: u32,
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.view, self.number)
    }
}

/// Token for a pending "call me next tick" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Everything a view needs from the platform it is embedded in.
///
/// The view acquires the surface, the label layer and the resize listener
/// once, and gives each of them back in `CubeView::destroy`.
pub trait Host {
    /// Pixel size of the container. `None` when there is no container.
    fn container_size(&self) -> Option<(u32, u32)>;

    fn attach_surface(&mut self, view: ViewId) -> Result<(), HostError>;
    fn detach_surface(&mut self, view: ViewId) -> Result<(), HostError>;

    /// Create the overlay that holds this view's labels.
    fn create_label_layer(&mut self, view: ViewId) -> Result<(), HostError>;
    /// Remove the overlay together with any labels still inside it.
    fn remove_label_layer(&mut self, view: ViewId) -> Result<(), HostError>;

    /// Add a label to its view's layer. New labels start hidden.
    fn insert_label(&mut self, label: LabelId, text: &str) -> Result<(), HostError>;
    fn place_label(&mut self, label: LabelId, placement: &LabelPlacement);
    fn remove_label(&mut self, label: LabelId) -> Result<(), HostError>;

    /// Start delivering container resizes to `CubeView::handle_resize`.
    fn add_resize_listener(&mut self, view: ViewId) -> Result<(), HostError>;
    fn remove_resize_listener(&mut self, view: ViewId) -> Result<(), HostError>;

    /// Ask for `CubeView::frame` to be called on the next display tick.
    fn request_frame(&mut self, view: ViewId) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest) -> Result<(), HostError>;

    fn render(
        &mut self,
        view: ViewId,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), HostError>;
}
