//! Decide which parts of a view an update touches.
//!
//! Decisions look only at which fields the delta carries. A field that is
//! present triggers its action even when the value did not change.

use std::collections::BTreeSet;

use settings::{ConfigDelta, CubeConfig, DeepMerge};

/// One unit of work after a config update. Declaration order is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RebuildAction {
    /// Recreate every node sphere and label.
    Nodes,
    Wireframe,
    SequenceLine,
    /// Recolour the scene background in place.
    Background,
    /// Change the lens in place.
    CameraFov,
    /// Slide the camera along its view direction.
    CameraDistance,
    /// Flip the rotation flag. Nothing is rebuilt.
    AutoRotate,
}

impl RebuildAction {
    /// Whether the action recreates scene elements rather than patching state.
    pub fn is_rebuild(self) -> bool {
        matches!(
            self,
            RebuildAction::Nodes | RebuildAction::Wireframe | RebuildAction::SequenceLine
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildPlan {
    actions: BTreeSet<RebuildAction>,
}

impl RebuildPlan {
    pub fn for_delta(delta: &ConfigDelta) -> Self {
        let colors = delta.colors();
        let camera = delta.camera();
        let mut plan = Self::default();

        if delta.show_nodes.is_some()
            || delta.show_node_numbers.is_some()
            || delta.node_size.is_some()
            || colors.nodes.is_some()
        {
            plan.actions.insert(RebuildAction::Nodes);
        }
        if delta.show_cube_wireframe.is_some() || colors.wireframe.is_some() {
            plan.actions.insert(RebuildAction::Wireframe);
        }
        if delta.line_mode.is_some() || colors.sequence_line.is_some() {
            plan.actions.insert(RebuildAction::SequenceLine);
        }
        if colors.background.is_some() {
            plan.actions.insert(RebuildAction::Background);
        }
        if camera.fov.is_some() {
            plan.actions.insert(RebuildAction::CameraFov);
        }
        if camera.distance.is_some() {
            plan.actions.insert(RebuildAction::CameraDistance);
        }
        if delta.auto_rotate.is_some() {
            plan.actions.insert(RebuildAction::AutoRotate);
        }

        plan
    }

    pub fn contains(&self, action: RebuildAction) -> bool {
        self.actions.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Actions in execution order.
    pub fn iter(&self) -> impl Iterator<Item = RebuildAction> + '_ {
        self.actions.iter().copied()
    }

    /// Only the actions that recreate scene elements.
    pub fn rebuilds(&self) -> impl Iterator<Item = RebuildAction> + '_ {
        self.iter().filter(|action| action.is_rebuild())
    }
}

/// Merge `delta` over `current` and plan the work the change requires.
pub fn apply_update(current: &CubeConfig, delta: &ConfigDelta) -> (CubeConfig, RebuildPlan) {
    (current.merged(delta), RebuildPlan::for_delta(delta))
}
