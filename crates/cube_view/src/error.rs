use magic_cube::CubeError;
use thiserror::Error;

use crate::host::{FrameRequest, LabelId, ViewId};

/// Failures reported by a [`crate::Host`] implementation.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("view {0} has no attached surface")]
    NotAttached(ViewId),
    #[error("view {0} has no label layer")]
    NoLabelLayer(ViewId),
    #[error("label {0} does not exist")]
    UnknownLabel(LabelId),
    #[error("frame request {0:?} is not pending")]
    UnknownFrame(FrameRequest),
    #[error("view {0} has no resize listener")]
    NoResizeListener(ViewId),
    #[error("host backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("a cube view requires a valid container")]
    InvalidContainer,
    #[error("invalid cube dataset: {0}")]
    Cube(#[from] CubeError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("view has been destroyed")]
    Destroyed,
    #[error("update finished with {} failure(s): {}", .0.len(), join(.0))]
    Update(Vec<HostError>),
    #[error("teardown finished with {} failure(s): {}", .0.len(), join(.0))]
    Teardown(Vec<HostError>),
}

fn join(errors: &[HostError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
