#![allow(dead_code)]

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use cube_view::{
    FrameRequest, Host, HostError, LabelId, LabelPlacement, PerspectiveCamera, Scene, ViewId,
};

#[derive(Debug, Clone)]
pub struct LabelRecord {
    pub text: String,
    pub placement: Option<LabelPlacement>,
}

/// Steps that can be told to fail, to exercise best-effort updates and teardown.
#[derive(Debug, Default, Clone, Copy)]
pub struct Failures {
    pub cancel_frame: bool,
    pub remove_resize_listener: bool,
    pub remove_label_layer: bool,
    pub insert_label: bool,
    pub remove_label: bool,
    pub detach_surface: bool,
    pub render: bool,
}

#[derive(Debug, Default)]
pub struct HostState {
    pub container: Option<(u32, u32)>,
    pub surfaces: BTreeSet<ViewId>,
    pub label_layers: BTreeMap<ViewId, BTreeMap<u32, LabelRecord>>,
    pub resize_listeners: BTreeSet<ViewId>,
    pub pending_frames: HashMap<FrameRequest, ViewId>,
    next_frame: u64,
    pub renders: u32,
    pub labels_inserted: u32,
    pub labels_removed: u32,
    pub fail: Failures,
}

impl HostState {
    /// Everything still attached to the host, across all views.
    pub fn residual_resources(&self) -> usize {
        self.surfaces.len()
            + self.label_layers.len()
            + self.label_layers.values().map(BTreeMap::len).sum::<usize>()
            + self.resize_listeners.len()
            + self.pending_frames.len()
    }

    pub fn labels_of(&self, view: ViewId) -> usize {
        self.label_layers.get(&view).map_or(0, BTreeMap::len)
    }

    pub fn label(&self, id: LabelId) -> Option<&LabelRecord> {
        self.label_layers.get(&id.view)?.get(&id.number)
    }
}

/// In-memory host shared between a test and the views it creates.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost(Rc<RefCell<HostState>>);

impl RecordingHost {
    pub fn with_container(width: u32, height: u32) -> Self {
        let host = Self::default();
        host.state_mut().container = Some((width, height));
        host
    }

    pub fn without_container() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Ref<'_, HostState> {
        self.0.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, HostState> {
        self.0.borrow_mut()
    }
}

fn backend(step: &str) -> HostError {
    HostError::Backend(format!("{step} failed"))
}

impl Host for RecordingHost {
    fn container_size(&self) -> Option<(u32, u32)> {
        self.state().container
    }

    fn attach_surface(&mut self, view: ViewId) -> Result<(), HostError> {
        self.state_mut().surfaces.insert(view);
        Ok(())
    }

    fn detach_surface(&mut self, view: ViewId) -> Result<(), HostError> {
        let mut state = self.state_mut();
        if state.fail.detach_surface {
            return Err(backend("detach_surface"));
        }
        state
            .surfaces
            .remove(&view)
            .then_some(())
            .ok_or(HostError::NotAttached(view))
    }

    fn create_label_layer(&mut self, view: ViewId) -> Result<(), HostError> {
        self.state_mut().label_layers.entry(view).or_default();
        Ok(())
    }

    fn remove_label_layer(&mut self, view: ViewId) -> Result<(), HostError> {
        let mut state = self.state_mut();
        if state.fail.remove_label_layer {
            return Err(backend("remove_label_layer"));
        }
        state
            .label_layers
            .remove(&view)
            .map(|_| ())
            .ok_or(HostError::NoLabelLayer(view))
    }

    fn insert_label(&mut self, label: LabelId, text: &str) -> Result<(), HostError> {
        let mut state = self.state_mut();
        if state.fail.insert_label {
            return Err(backend("insert_label"));
        }
        let layer = state
            .label_layers
            .get_mut(&label.view)
            .ok_or(HostError::NoLabelLayer(label.view))?;
        layer.insert(
            label.number,
            LabelRecord {
                text: text.to_owned(),
                placement: None,
            },
        );
        state.labels_inserted += 1;
        Ok(())
    }

    fn place_label(&mut self, label: LabelId, placement: &LabelPlacement) {
        if let Some(record) = self
            .state_mut()
            .label_layers
            .get_mut(&label.view)
            .and_then(|layer| layer.get_mut(&label.number))
        {
            record.placement = Some(*placement);
        }
    }

    fn remove_label(&mut self, label: LabelId) -> Result<(), HostError> {
        let mut state = self.state_mut();
        if state.fail.remove_label {
            return Err(backend("remove_label"));
        }
        state
            .label_layers
            .get_mut(&label.view)
            .and_then(|layer| layer.remove(&label.number))
            .ok_or(HostError::UnknownLabel(label))?;
        state.labels_removed += 1;
        Ok(())
    }

    fn add_resize_listener(&mut self, view: ViewId) -> Result<(), HostError> {
        self.state_mut().resize_listeners.insert(view);
        Ok(())
    }

    fn remove_resize_listener(&mut self, view: ViewId) -> Result<(), HostError> {
        let mut state = self.state_mut();
        if state.fail.remove_resize_listener {
            return Err(backend("remove_resize_listener"));
        }
        state
            .resize_listeners
            .remove(&view)
            .then_some(())
            .ok_or(HostError::NoResizeListener(view))
    }

    fn request_frame(&mut self, view: ViewId) -> FrameRequest {
        let mut state = self.state_mut();
        // A new request from the same view means its previous one fired.
        state.pending_frames.retain(|_, owner| *owner != view);
        state.next_frame += 1;
        let request = FrameRequest(state.next_frame);
        state.pending_frames.insert(request, view);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) -> Result<(), HostError> {
        let mut state = self.state_mut();
        if state.fail.cancel_frame {
            return Err(backend("cancel_frame"));
        }
        state
            .pending_frames
            .remove(&request)
            .map(|_| ())
            .ok_or(HostError::UnknownFrame(request))
    }

    fn render(
        &mut self,
        view: ViewId,
        _scene: &Scene,
        _camera: &PerspectiveCamera,
    ) -> Result<(), HostError> {
        let mut state = self.state_mut();
        if state.fail.render {
            return Err(backend("render"));
        }
        if !state.surfaces.contains(&view) {
            return Err(HostError::NotAttached(view));
        }
        state.renders += 1;
        Ok(())
    }
}
