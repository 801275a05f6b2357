use super::*;
use fnv::FnvHashMap;
use lambda_api::{LambdaBufferFlags, LambdaTextureFlags, LambdaTextureViewFlags};
use serde::Serialize;

/// The compiled form of a render graph description: resolved resources, render stages in
/// execution order, the synchronization stages between them and the interleaved pipeline that
/// the execution engine walks every frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderGraphPlan {
    pub resource_descriptions: Vec<RenderGraphResolvedResourceDesc>,
    pub render_stage_descriptions: Vec<RenderGraphRenderStageDesc>,
    pub synchronization_stage_descriptions: Vec<RenderGraphSynchronizationStageDesc>,
    pub pipeline_stage_descriptions: Vec<RenderGraphPipelineStageDesc>,
    #[serde(skip)]
    pub warnings: Vec<RenderGraphWarning>,
}

//
// Usage flags for every resource, gathered from the bindings that survived into the plan
//
#[profiling::function]
fn resolve_resources(
    plan: &RenderGraphPlan,
    registry: &RenderGraphResourceRegistry,
    config: &RenderGraphConfig,
) -> Vec<RenderGraphResolvedResourceDesc> {
    let mut resolved: Vec<_> = registry
        .iter()
        .map(|(_, resource)| RenderGraphResolvedResourceDesc::new(resource))
        .collect();
    let mut used = vec![false; resolved.len()];

    let resolved_index: FnvHashMap<_, _> = registry
        .iter()
        .map(|(id, resource)| (resource.name.as_str(), id.0))
        .collect();

    for render_stage in &plan.render_stage_descriptions {
        for resource_state in &render_stage.resource_states {
            let index = match resolved_index.get(resource_state.resource_name.as_str()) {
                Some(&index) => index,
                None => continue,
            };
            used[index] = true;

            let resource = &mut resolved[index];
            match resource.resource_type {
                RenderGraphResourceType::Texture => match resource_state.binding_type {
                    RenderGraphBindingType::CombinedSampler => {
                        resource.texture_flags |= LambdaTextureFlags::SHADER_RESOURCE;
                        resource.texture_view_flags |= LambdaTextureViewFlags::SHADER_RESOURCE;
                    }
                    RenderGraphBindingType::UnorderedAccessRead
                    | RenderGraphBindingType::UnorderedAccessWrite
                    | RenderGraphBindingType::UnorderedAccessReadWrite => {
                        resource.texture_flags |= LambdaTextureFlags::UNORDERED_ACCESS;
                        resource.texture_view_flags |= LambdaTextureViewFlags::UNORDERED_ACCESS;
                    }
                    RenderGraphBindingType::Attachment => {
                        if resource.texture.format.has_depth_or_stencil() {
                            resource.texture_flags |= LambdaTextureFlags::DEPTH_STENCIL;
                            resource.texture_view_flags |= LambdaTextureViewFlags::DEPTH_STENCIL;
                        } else {
                            resource.texture_flags |= LambdaTextureFlags::RENDER_TARGET;
                            resource.texture_view_flags |= LambdaTextureViewFlags::RENDER_TARGET;
                        }
                    }
                    _ => {}
                },
                RenderGraphResourceType::Buffer => match resource_state.binding_type {
                    RenderGraphBindingType::ConstantBuffer => {
                        resource.buffer_flags |= LambdaBufferFlags::CONSTANT_BUFFER;
                    }
                    RenderGraphBindingType::UnorderedAccessRead
                    | RenderGraphBindingType::UnorderedAccessWrite
                    | RenderGraphBindingType::UnorderedAccessReadWrite => {
                        resource.buffer_flags |= LambdaBufferFlags::UNORDERED_ACCESS_BUFFER;
                    }
                    _ => {}
                },
                RenderGraphResourceType::AccelerationStructure => {}
            }
        }

        // Draw buffers are read by the input assembler rather than bound to a shader
        if let RenderGraphStagePipeline::Graphics {
            index_buffer,
            indirect_args_buffer,
            ..
        } = &render_stage.pipeline
        {
            let draw_buffers = index_buffer
                .iter()
                .map(|name| (name, LambdaBufferFlags::INDEX_BUFFER))
                .chain(
                    indirect_args_buffer
                        .iter()
                        .map(|name| (name, LambdaBufferFlags::INDIRECT_BUFFER)),
                );
            for (name, flags) in draw_buffers {
                if let Some(&index) = resolved_index.get(name.as_str()) {
                    used[index] = true;
                    resolved[index].buffer_flags |= flags;
                }
            }
        }
    }

    resolved
        .into_iter()
        .zip(used)
        .filter(|(resource, used)| {
            let keep = *used
                || !config.remove_unused_resources
                || resource.name == config.back_buffer_name;
            if !keep {
                log::trace!("  Removing unused resource {}", resource.name);
            }
            keep
        })
        .map(|(resource, _)| resource)
        .collect()
}

impl RenderGraphPlan {
    /// Compile a description. Either every phase succeeds and a complete plan is returned, or the
    /// first structural error is.
    #[profiling::function]
    pub fn new(
        description: &RenderGraphDescription,
        config: &RenderGraphConfig,
    ) -> RenderGraphResult<RenderGraphPlan> {
        log::trace!("-- Create render graph plan --");

        //
        // Check names and references, and build the resource table. The back buffer is added if
        // the description doesn't declare it.
        //
        let registry = description.validate(config)?;

        //
        // Sort every resource state of every stage into inputs and outputs
        //
        log::trace!("Classify render stages");
        let classified = classify_stages(description, &registry)?;

        //
        // Link inputs to the outputs that produce them. Cycles are rejected as edges are added.
        //
        log::trace!("Build dependencies");
        let dependencies = build_dependencies(&classified, &registry)?;

        if config.require_back_buffer_output {
            verify_back_buffer_output(&classified, &registry)?;
        }

        //
        // Stages that more stages depend on run earlier
        //
        let weights = weight_stages(&dependencies);
        let order = sort_stages(&weights);

        log::trace!("Execution order of render stages:");
        for &stage_id in &order {
            log::trace!(
                "  Stage {:?} {} (weight {})",
                stage_id,
                classified.stage(stage_id).name(),
                weights[stage_id.0]
            );
        }

        //
        // Transition every resource between consecutive users
        //
        let mut plan = synthesize_synchronizations(
            description,
            &registry,
            &classified,
            &dependencies,
            &weights,
            &order,
            config,
        );
        print_synchronization_stages(&plan, "Synthesized synchronization stages:");

        //
        // Drop what isn't needed and let render passes take over attachment transitions
        //
        plan.warnings = prune_synchronizations(&mut plan, &registry, config);
        print_synchronization_stages(&plan, "Pruned synchronization stages:");

        //
        // Resolve usage flags of the resources that are still used
        //
        plan.resource_descriptions = resolve_resources(&plan, &registry, config);

        print_pipeline_stages(&plan);

        log::debug!(
            "Compiled render graph: {} resources, {} render stages, {} synchronization stages, {} warnings",
            plan.resource_descriptions.len(),
            plan.render_stage_descriptions.len(),
            plan.synchronization_stage_descriptions.len(),
            plan.warnings.len()
        );

        Ok(plan)
    }

    pub fn find_resource(
        &self,
        name: &str,
    ) -> Option<&RenderGraphResolvedResourceDesc> {
        self.resource_descriptions
            .iter()
            .find(|resource| resource.name == name)
    }

    pub fn render_stage(
        &self,
        name: &str,
    ) -> Option<&RenderGraphRenderStageDesc> {
        self.render_stage_descriptions
            .iter()
            .find(|render_stage| render_stage.name == name)
    }

    /// Position of the render stage in the pipeline
    pub fn pipeline_position(
        &self,
        render_stage_name: &str,
    ) -> Option<usize> {
        self.pipeline_stage_descriptions
            .iter()
            .position(|pipeline_stage| {
                pipeline_stage.stage_type == RenderGraphPipelineStageType::Render
                    && self.render_stage_descriptions[pipeline_stage.stage_index].name
                        == render_stage_name
            })
    }

    /// Render stage names in execution order
    pub fn render_stage_names(&self) -> Vec<&str> {
        self.pipeline_stage_descriptions
            .iter()
            .filter(|pipeline_stage| {
                pipeline_stage.stage_type == RenderGraphPipelineStageType::Render
            })
            .map(|pipeline_stage| {
                self.render_stage_descriptions[pipeline_stage.stage_index]
                    .name
                    .as_str()
            })
            .collect()
    }

    /// Every synchronization in pipeline order, with the pipeline position of its stage
    pub fn synchronizations(
        &self
    ) -> impl Iterator<Item = (usize, &RenderGraphSynchronizationDesc)> {
        self.pipeline_stage_descriptions
            .iter()
            .enumerate()
            .filter(|(_, pipeline_stage)| {
                pipeline_stage.stage_type == RenderGraphPipelineStageType::Synchronization
            })
            .flat_map(move |(position, pipeline_stage)| {
                self.synchronization_stage_descriptions[pipeline_stage.stage_index]
                    .synchronizations
                    .iter()
                    .map(move |synchronization| (position, synchronization))
            })
    }

    pub fn to_json(&self) -> RenderGraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn print_synchronization_stages(
    plan: &RenderGraphPlan,
    header: &str,
) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }

    log::trace!("{}", header);
    for (index, synchronization_stage) in plan.synchronization_stage_descriptions.iter().enumerate()
    {
        log::trace!("  Synchronization stage {}", index);
        for synchronization in &synchronization_stage.synchronizations {
            log::trace!(
                "    {} {:?}: {:?} {:?} {:?} -> {:?} {:?} {:?}",
                synchronization.resource_name,
                synchronization.synchronization_type,
                synchronization.prev_render_stage,
                synchronization.prev_queue,
                synchronization.prev_binding_type,
                synchronization.next_render_stage,
                synchronization.next_queue,
                synchronization.next_binding_type
            );
        }
    }
}

fn print_pipeline_stages(plan: &RenderGraphPlan) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }

    log::trace!("Pipeline stages:");
    for pipeline_stage in &plan.pipeline_stage_descriptions {
        match pipeline_stage.stage_type {
            RenderGraphPipelineStageType::Render => {
                let render_stage = &plan.render_stage_descriptions[pipeline_stage.stage_index];
                log::trace!(
                    "  Render {} {:?} {:?}",
                    pipeline_stage.stage_index,
                    render_stage.name,
                    render_stage.queue_type()
                );
                for resource_state in &render_stage.resource_states {
                    log::trace!(
                        "    {} {:?} {:?} {:?}",
                        resource_state.resource_name,
                        resource_state.binding_type,
                        resource_state.access,
                        resource_state.attachment_synchronizations
                    );
                }
            }
            RenderGraphPipelineStageType::Synchronization => {
                let synchronization_stage =
                    &plan.synchronization_stage_descriptions[pipeline_stage.stage_index];
                log::trace!(
                    "  Synchronization {} ({} synchronizations)",
                    pipeline_stage.stage_index,
                    synchronization_stage.synchronizations.len()
                );
            }
        }
    }

    log::trace!("Resources:");
    for resource in &plan.resource_descriptions {
        log::trace!(
            "  {} {:?} {:?} {:?} {:?}",
            resource.name,
            resource.resource_type,
            resource.texture_flags,
            resource.texture_view_flags,
            resource.buffer_flags
        );
    }
}
