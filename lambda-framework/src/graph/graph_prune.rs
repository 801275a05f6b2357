use super::*;
use fnv::FnvHashSet;
use lambda_api::LambdaPipelineType;

// (synchronization stage index, synchronization index)
type SynchronizationKey = (usize, usize);

#[derive(Copy, Clone, Debug, PartialEq)]
enum SearchDirection {
    Backward,
    Forward,
}

// The nearest other stage using a resource in one direction, and the synchronizations for the
// resource that sit between it and the stage we searched from
struct AdjacentUsage {
    binding_type: Option<RenderGraphBindingType>,
    synchronizations: Vec<SynchronizationKey>,
}

fn find_adjacent_usage(
    plan: &RenderGraphPlan,
    pipeline_stage_index: usize,
    resource_name: &str,
    direction: SearchDirection,
    wrap_around: bool,
    removed: &FnvHashSet<SynchronizationKey>,
) -> AdjacentUsage {
    let pipeline_stage_count = plan.pipeline_stage_descriptions.len();
    let mut usage = AdjacentUsage {
        binding_type: None,
        synchronizations: Vec::default(),
    };

    let mut index = pipeline_stage_index;
    for _ in 1..pipeline_stage_count {
        index = match direction {
            SearchDirection::Backward if index == 0 => {
                if !wrap_around {
                    break;
                }
                pipeline_stage_count - 1
            }
            SearchDirection::Backward => index - 1,
            SearchDirection::Forward if index + 1 == pipeline_stage_count => {
                if !wrap_around {
                    break;
                }
                0
            }
            SearchDirection::Forward => index + 1,
        };

        let pipeline_stage = plan.pipeline_stage_descriptions[index];
        match pipeline_stage.stage_type {
            RenderGraphPipelineStageType::Synchronization => {
                let synchronization_stage =
                    &plan.synchronization_stage_descriptions[pipeline_stage.stage_index];
                for (synchronization_index, synchronization) in
                    synchronization_stage.synchronizations.iter().enumerate()
                {
                    let key = (pipeline_stage.stage_index, synchronization_index);
                    if synchronization.resource_name == resource_name && !removed.contains(&key) {
                        usage.synchronizations.push(key);
                    }
                }
            }
            RenderGraphPipelineStageType::Render => {
                let render_stage = &plan.render_stage_descriptions[pipeline_stage.stage_index];
                let binding_type = match direction {
                    SearchDirection::Backward => render_stage.exit_binding(resource_name),
                    SearchDirection::Forward => render_stage.entry_binding(resource_name),
                };

                if binding_type.is_some() {
                    usage.binding_type = binding_type;
                    break;
                }
            }
        }
    }

    usage
}

// Synchronization stages with nothing left in them are dropped, and the pipeline stages after the
// dropped slot are renumbered
fn remove_empty_synchronization_stages(plan: &mut RenderGraphPlan) {
    let mut pipeline_stage_index = 0;
    while pipeline_stage_index < plan.pipeline_stage_descriptions.len() {
        let pipeline_stage = plan.pipeline_stage_descriptions[pipeline_stage_index];
        let is_empty_synchronization_stage = pipeline_stage.stage_type
            == RenderGraphPipelineStageType::Synchronization
            && plan.synchronization_stage_descriptions[pipeline_stage.stage_index]
                .synchronizations
                .is_empty();

        if is_empty_synchronization_stage {
            for later_pipeline_stage in
                &mut plan.pipeline_stage_descriptions[pipeline_stage_index + 1..]
            {
                if later_pipeline_stage.stage_type == RenderGraphPipelineStageType::Synchronization
                {
                    later_pipeline_stage.stage_index -= 1;
                }
            }

            plan.synchronization_stage_descriptions
                .remove(pipeline_stage.stage_index);
            plan.pipeline_stage_descriptions
                .remove(pipeline_stage_index);
            continue;
        }

        pipeline_stage_index += 1;
    }
}

fn remove_redundant_synchronizations(plan: &mut RenderGraphPlan) {
    for synchronization_stage in &mut plan.synchronization_stage_descriptions {
        synchronization_stage.synchronizations.retain(|synchronization| {
            let ownership_unchanged = synchronization.synchronization_type.is_ownership_change()
                && !synchronization.is_queue_transfer();
            !synchronization.is_no_op() && !ownership_unchanged
        });
    }
}

fn is_depth_stencil(
    registry: &RenderGraphResourceRegistry,
    resource_name: &str,
) -> bool {
    registry
        .find(resource_name)
        .map(|id| registry.resource(id).texture.format.has_depth_or_stencil())
        .unwrap_or(false)
}

//
// Attachments of graphics stages get their layout transitions from the render pass. Record the
// binding the attachment arrives in and leaves in, then drop the barriers on either side of it.
// A barrier that also moves the resource between queues stays, but only does the ownership
// transfer.
//
fn fold_render_pass_transitions(
    plan: &mut RenderGraphPlan,
    registry: &RenderGraphResourceRegistry,
    config: &RenderGraphConfig,
    warnings: &mut Vec<RenderGraphWarning>,
) {
    let mut removed = FnvHashSet::<SynchronizationKey>::default();

    for pipeline_stage_index in 0..plan.pipeline_stage_descriptions.len() {
        let pipeline_stage = plan.pipeline_stage_descriptions[pipeline_stage_index];
        if pipeline_stage.stage_type != RenderGraphPipelineStageType::Render {
            continue;
        }

        let render_stage_index = pipeline_stage.stage_index;
        let render_stage = &plan.render_stage_descriptions[render_stage_index];
        if render_stage.pipeline_type() != LambdaPipelineType::Graphics {
            continue;
        }

        let stage_name = render_stage.name.clone();
        let attachments: Vec<_> = render_stage
            .resource_states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.binding_type == RenderGraphBindingType::Attachment)
            .map(|(index, state)| (index, state.resource_name.clone()))
            .collect();

        for (resource_state_index, resource_name) in attachments {
            // The back buffer is presented at the end of the frame, its uses never carry over
            let is_back_buffer = resource_name == config.back_buffer_name;

            let previous = find_adjacent_usage(
                plan,
                pipeline_stage_index,
                &resource_name,
                SearchDirection::Backward,
                !is_back_buffer,
                &removed,
            );
            let next = find_adjacent_usage(
                plan,
                pipeline_stage_index,
                &resource_name,
                SearchDirection::Forward,
                !is_back_buffer,
                &removed,
            );

            let next_binding_type = next.binding_type.or_else(|| {
                if is_back_buffer {
                    Some(RenderGraphBindingType::Present)
                } else if is_depth_stencil(registry, &resource_name) {
                    Some(RenderGraphBindingType::Attachment)
                } else {
                    None
                }
            });

            let attachment_synchronizations = &mut plan.render_stage_descriptions
                [render_stage_index]
                .resource_states[resource_state_index]
                .attachment_synchronizations;
            attachment_synchronizations.prev_binding_type = previous.binding_type;
            attachment_synchronizations.next_binding_type = next_binding_type;

            if next_binding_type.is_none() {
                let warning = RenderGraphWarning::AttachmentWithoutNextUser {
                    resource: resource_name.clone(),
                    stage: stage_name.clone(),
                };
                log::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            // Barriers leading into the render pass
            if previous.binding_type.is_some() {
                for &key in &previous.synchronizations {
                    let synchronization =
                        &mut plan.synchronization_stage_descriptions[key.0].synchronizations[key.1];
                    if synchronization.next_render_stage.as_deref() != Some(stage_name.as_str())
                        || synchronization.next_binding_type != RenderGraphBindingType::Attachment
                    {
                        continue;
                    }

                    if synchronization.is_queue_transfer() {
                        synchronization.next_binding_type = synchronization.prev_binding_type;
                        synchronization.update_synchronization_type();
                    } else {
                        removed.insert(key);
                    }
                }
            }

            // Barriers leading out of the render pass
            if next.binding_type.is_some() || is_back_buffer {
                for &key in &next.synchronizations {
                    if previous.synchronizations.contains(&key) {
                        continue;
                    }

                    let synchronization =
                        &mut plan.synchronization_stage_descriptions[key.0].synchronizations[key.1];
                    if synchronization.prev_render_stage.as_deref() != Some(stage_name.as_str())
                        || synchronization.prev_binding_type != RenderGraphBindingType::Attachment
                    {
                        continue;
                    }

                    if synchronization.is_queue_transfer() {
                        synchronization.prev_binding_type = synchronization.next_binding_type;
                        synchronization.update_synchronization_type();
                    } else {
                        removed.insert(key);
                    }
                }
            }
        }
    }

    for (synchronization_stage_index, synchronization_stage) in plan
        .synchronization_stage_descriptions
        .iter_mut()
        .enumerate()
    {
        let mut synchronization_index = 0;
        synchronization_stage.synchronizations.retain(|_| {
            let keep = !removed.contains(&(synchronization_stage_index, synchronization_index));
            synchronization_index += 1;
            keep
        });
    }
}

//
// Remove synchronizations that do nothing, then fold attachment transitions into render passes
// and drop whatever synchronization stages end up empty. Running this again on its own output
// changes nothing.
//
#[profiling::function]
pub fn prune_synchronizations(
    plan: &mut RenderGraphPlan,
    registry: &RenderGraphResourceRegistry,
    config: &RenderGraphConfig,
) -> Vec<RenderGraphWarning> {
    let mut warnings = Vec::default();

    remove_redundant_synchronizations(plan);
    remove_empty_synchronization_stages(plan);

    if config.fold_render_pass_transitions {
        fold_render_pass_transitions(plan, registry, config, &mut warnings);
        remove_empty_synchronization_stages(plan);
    }

    warnings
}
