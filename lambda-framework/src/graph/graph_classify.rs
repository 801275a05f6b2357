use super::*;
use lambda_api::{LambdaPipelineType, LambdaQueueType};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct RenderGraphStageId(pub(super) usize);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct RenderGraphResourceStateId(pub(super) usize);

/// Direction of a resource access, derived from its binding type
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum RenderGraphAccess {
    Input,
    /// An input on a resource whose lifetime is owned outside of the graph
    ExternalInput,
    Output,
}

impl RenderGraphAccess {
    pub fn is_input(self) -> bool {
        self != RenderGraphAccess::Output
    }
}

#[derive(Debug, Clone)]
pub struct RenderGraphClassifiedResourceState {
    pub(super) stage: RenderGraphStageId,
    pub(super) resource: RenderGraphResourceId,
    pub(super) binding_type: RenderGraphBindingType,
    pub(super) access: RenderGraphAccess,
}

#[derive(Debug)]
pub struct RenderGraphClassifiedStage {
    pub(super) name: String,
    pub(super) queue: LambdaQueueType,
    // All resource states in declaration order
    pub(super) resource_states: Vec<RenderGraphResourceStateId>,
    pub(super) inputs: Vec<RenderGraphResourceStateId>,
    pub(super) external_inputs: Vec<RenderGraphResourceStateId>,
    pub(super) outputs: Vec<RenderGraphResourceStateId>,
}

impl RenderGraphClassifiedStage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queue(&self) -> LambdaQueueType {
        self.queue
    }

    pub fn inputs(&self) -> &[RenderGraphResourceStateId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[RenderGraphResourceStateId] {
        &self.outputs
    }
}

/// Every stage of a description with its resource states sorted into input, external input and
/// output buckets. Resource states live in one arena and are referred to by id everywhere else.
pub struct RenderGraphClassifiedStages {
    pub(super) stages: Vec<RenderGraphClassifiedStage>,
    pub(super) resource_states: Vec<RenderGraphClassifiedResourceState>,
}

impl RenderGraphClassifiedStages {
    pub fn stage(
        &self,
        stage_id: RenderGraphStageId,
    ) -> &RenderGraphClassifiedStage {
        &self.stages[stage_id.0]
    }

    pub fn resource_state(
        &self,
        resource_state_id: RenderGraphResourceStateId,
    ) -> &RenderGraphClassifiedResourceState {
        &self.resource_states[resource_state_id.0]
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage_ids(&self) -> impl Iterator<Item = RenderGraphStageId> {
        (0..self.stages.len()).map(RenderGraphStageId)
    }
}

/// Lookup table from binding type to access direction. Returns None if the binding can't be used
/// with this kind of resource or pipeline.
pub fn classify_binding(
    resource: &RenderGraphResourceDesc,
    is_back_buffer: bool,
    pipeline_type: LambdaPipelineType,
    resource_state: &RenderGraphResourceStateDesc,
) -> Option<RenderGraphAccess> {
    use RenderGraphResourceType::*;

    let access = match (resource_state.binding_type, resource.resource_type) {
        (RenderGraphBindingType::CombinedSampler, Texture) => RenderGraphAccess::Input,
        (RenderGraphBindingType::UnorderedAccessRead, Texture | Buffer) => {
            RenderGraphAccess::Input
        }
        (RenderGraphBindingType::UnorderedAccessWrite, Texture | Buffer) => {
            RenderGraphAccess::Output
        }
        (RenderGraphBindingType::UnorderedAccessReadWrite, Texture | Buffer) => {
            RenderGraphAccess::Output
        }
        (RenderGraphBindingType::ConstantBuffer, Buffer) => RenderGraphAccess::Input,
        (RenderGraphBindingType::AccelerationStructure, AccelerationStructure) => {
            RenderGraphAccess::Input
        }
        (RenderGraphBindingType::Attachment, Texture)
            if pipeline_type == LambdaPipelineType::Graphics =>
        {
            if resource_state.read_only {
                RenderGraphAccess::Input
            } else {
                RenderGraphAccess::Output
            }
        }
        (RenderGraphBindingType::Present, Texture) if is_back_buffer => RenderGraphAccess::Output,
        _ => return None,
    };

    if access == RenderGraphAccess::Input && resource.external {
        Some(RenderGraphAccess::ExternalInput)
    } else {
        Some(access)
    }
}

//
// Sort each stage's resource states into buckets. Fails on the first binding that has no
// classification.
//
#[profiling::function]
pub fn classify_stages(
    description: &RenderGraphDescription,
    registry: &RenderGraphResourceRegistry,
) -> RenderGraphResult<RenderGraphClassifiedStages> {
    let mut stages = Vec::with_capacity(description.render_stages.len());
    let mut resource_states = Vec::default();

    for (stage_index, render_stage) in description.render_stages.iter().enumerate() {
        let stage_id = RenderGraphStageId(stage_index);
        let pipeline_type = render_stage.pipeline_type();

        let mut classified_stage = RenderGraphClassifiedStage {
            name: render_stage.name.clone(),
            queue: pipeline_type.queue_type(),
            resource_states: Vec::with_capacity(render_stage.resource_states.len()),
            inputs: Vec::default(),
            external_inputs: Vec::default(),
            outputs: Vec::default(),
        };

        for resource_state in &render_stage.resource_states {
            let resource = registry.find(&resource_state.resource_name).ok_or_else(|| {
                RenderGraphError::malformed(format!(
                    "Render stage \"{}\" uses undeclared resource \"{}\"",
                    render_stage.name, resource_state.resource_name
                ))
            })?;

            let access = classify_binding(
                registry.resource(resource),
                registry.is_back_buffer(resource),
                pipeline_type,
                resource_state,
            )
            .ok_or_else(|| RenderGraphError::UnclassifiableBinding {
                stage: render_stage.name.clone(),
                resource: resource_state.resource_name.clone(),
                binding_type: resource_state.binding_type,
            })?;

            let resource_state_id = RenderGraphResourceStateId(resource_states.len());
            resource_states.push(RenderGraphClassifiedResourceState {
                stage: stage_id,
                resource,
                binding_type: resource_state.binding_type,
                access,
            });

            classified_stage.resource_states.push(resource_state_id);
            match access {
                RenderGraphAccess::Input => classified_stage.inputs.push(resource_state_id),
                RenderGraphAccess::ExternalInput => {
                    classified_stage.external_inputs.push(resource_state_id)
                }
                RenderGraphAccess::Output => classified_stage.outputs.push(resource_state_id),
            }
        }

        log::trace!(
            "Classified render stage {:?} {}: {} inputs, {} external inputs, {} outputs",
            stage_id,
            classified_stage.name,
            classified_stage.inputs.len(),
            classified_stage.external_inputs.len(),
            classified_stage.outputs.len()
        );

        stages.push(classified_stage);
    }

    Ok(RenderGraphClassifiedStages {
        stages,
        resource_states,
    })
}

/// The frame ends by presenting the back buffer, so some render stage has to write it
pub fn verify_back_buffer_output(
    classified: &RenderGraphClassifiedStages,
    registry: &RenderGraphResourceRegistry,
) -> RenderGraphResult<()> {
    let writer = classified.resource_states.iter().find(|resource_state| {
        resource_state.access == RenderGraphAccess::Output
            && registry.is_back_buffer(resource_state.resource)
    });

    match writer {
        Some(resource_state) => {
            log::trace!(
                "Back buffer is written by {}",
                classified.stage(resource_state.stage).name
            );
            Ok(())
        }
        None => {
            let resource = registry.resource(registry.back_buffer()).name.clone();
            log::error!("No render stage writes the back buffer {}", resource);
            Err(RenderGraphError::BackBufferNotWritten { resource })
        }
    }
}
