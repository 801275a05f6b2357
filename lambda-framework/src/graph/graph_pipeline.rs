use super::*;
use lambda_api::{LambdaPipelineType, LambdaQueueType};
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderGraphSynchronizationType {
    /// Queue ownership moves to a queue that will read the resource
    OwnershipChangeRead,
    /// Queue ownership moves to a queue that will write the resource
    OwnershipChangeWrite,
    TransitionForRead,
    TransitionForWrite,
}

impl RenderGraphSynchronizationType {
    pub fn new(
        prev_queue: LambdaQueueType,
        next_queue: LambdaQueueType,
        next_binding_type: RenderGraphBindingType,
    ) -> Self {
        let next_writes = next_binding_type.is_write();
        match (prev_queue != next_queue, next_writes) {
            (true, false) => RenderGraphSynchronizationType::OwnershipChangeRead,
            (true, true) => RenderGraphSynchronizationType::OwnershipChangeWrite,
            (false, false) => RenderGraphSynchronizationType::TransitionForRead,
            (false, true) => RenderGraphSynchronizationType::TransitionForWrite,
        }
    }

    pub fn is_ownership_change(self) -> bool {
        match self {
            RenderGraphSynchronizationType::OwnershipChangeRead
            | RenderGraphSynchronizationType::OwnershipChangeWrite => true,
            _ => false,
        }
    }
}

/// Transition of one resource between two consecutive users. A `None` stage is the world outside
/// the graph: the presentation engine for the back buffer, the owner of an external resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderGraphSynchronizationDesc {
    pub resource_name: String,
    pub resource_type: RenderGraphResourceType,
    pub prev_render_stage: Option<String>,
    pub next_render_stage: Option<String>,
    pub prev_queue: LambdaQueueType,
    pub next_queue: LambdaQueueType,
    pub prev_binding_type: RenderGraphBindingType,
    pub next_binding_type: RenderGraphBindingType,
    pub synchronization_type: RenderGraphSynchronizationType,
}

impl RenderGraphSynchronizationDesc {
    /// Same queue on both sides and the same binding: nothing to do
    pub fn is_no_op(&self) -> bool {
        self.prev_queue == self.next_queue && self.prev_binding_type == self.next_binding_type
    }

    pub fn is_queue_transfer(&self) -> bool {
        self.prev_queue != self.next_queue
    }

    pub(super) fn update_synchronization_type(&mut self) {
        self.synchronization_type = RenderGraphSynchronizationType::new(
            self.prev_queue,
            self.next_queue,
            self.next_binding_type,
        );
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderGraphSynchronizationStageDesc {
    pub synchronizations: Vec<RenderGraphSynchronizationDesc>,
}

impl RenderGraphSynchronizationStageDesc {
    pub fn find_synchronization(
        &self,
        resource_name: &str,
    ) -> Option<&RenderGraphSynchronizationDesc> {
        self.synchronizations
            .iter()
            .find(|synchronization| synchronization.resource_name == resource_name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderGraphPipelineStageType {
    Render,
    Synchronization,
}

/// One element of the final execution order, indexing into either the render stages or the
/// synchronization stages of the plan
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RenderGraphPipelineStageDesc {
    pub stage_type: RenderGraphPipelineStageType,
    pub stage_index: usize,
}

impl RenderGraphPipelineStageDesc {
    pub fn render(stage_index: usize) -> Self {
        RenderGraphPipelineStageDesc {
            stage_type: RenderGraphPipelineStageType::Render,
            stage_index,
        }
    }

    pub fn synchronization(stage_index: usize) -> Self {
        RenderGraphPipelineStageDesc {
            stage_type: RenderGraphPipelineStageType::Synchronization,
            stage_index,
        }
    }
}

/// Layouts a render pass transitions an attachment from and to. Filled in when barriers around
/// the attachment are folded into the render pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderGraphAttachmentSynchronizations {
    pub prev_binding_type: Option<RenderGraphBindingType>,
    pub next_binding_type: Option<RenderGraphBindingType>,
    /// The value is produced earlier in the same frame
    pub prev_same_frame: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderGraphResourceState {
    pub resource_name: String,
    pub binding_type: RenderGraphBindingType,
    pub access: RenderGraphAccess,
    pub attachment_synchronizations: RenderGraphAttachmentSynchronizations,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderGraphRenderStageDesc {
    pub name: String,
    pub pipeline: RenderGraphStagePipeline,
    pub enabled: bool,
    pub custom_renderer: bool,
    pub weight: u32,
    pub resource_states: Vec<RenderGraphResourceState>,
}

impl RenderGraphRenderStageDesc {
    pub fn pipeline_type(&self) -> LambdaPipelineType {
        self.pipeline.pipeline_type()
    }

    pub fn queue_type(&self) -> LambdaQueueType {
        self.pipeline.pipeline_type().queue_type()
    }

    pub fn find_resource_state(
        &self,
        resource_name: &str,
    ) -> Option<&RenderGraphResourceState> {
        self.resource_states
            .iter()
            .find(|state| state.resource_name == resource_name)
    }

    /// Binding the stage starts using the resource with, reads first
    pub fn entry_binding(
        &self,
        resource_name: &str,
    ) -> Option<RenderGraphBindingType> {
        let mut states = self
            .resource_states
            .iter()
            .filter(|state| state.resource_name == resource_name);
        let first = states.clone().next();
        states
            .find(|state| state.access.is_input())
            .or(first)
            .map(|state| state.binding_type)
    }

    /// Binding the stage leaves the resource in
    pub fn exit_binding(
        &self,
        resource_name: &str,
    ) -> Option<RenderGraphBindingType> {
        let states = self
            .resource_states
            .iter()
            .filter(|state| state.resource_name == resource_name);
        let first = states.clone().next();
        states
            .rev()
            .find(|state| state.access == RenderGraphAccess::Output)
            .or(first)
            .map(|state| state.binding_type)
    }
}
