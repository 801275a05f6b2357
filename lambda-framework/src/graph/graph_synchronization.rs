use super::*;
use fnv::FnvHashMap;
use lambda_api::LambdaQueueType;

// One side of a transition
struct SynchronizationEndpoint<'a> {
    render_stage: Option<&'a str>,
    queue: LambdaQueueType,
    binding_type: RenderGraphBindingType,
}

fn create_synchronization(
    resource: &RenderGraphResourceDesc,
    prev: SynchronizationEndpoint,
    next: SynchronizationEndpoint,
) -> RenderGraphSynchronizationDesc {
    RenderGraphSynchronizationDesc {
        resource_name: resource.name.clone(),
        resource_type: resource.resource_type,
        prev_render_stage: prev.render_stage.map(str::to_string),
        next_render_stage: next.render_stage.map(str::to_string),
        prev_queue: prev.queue,
        next_queue: next.queue,
        prev_binding_type: prev.binding_type,
        next_binding_type: next.binding_type,
        synchronization_type: RenderGraphSynchronizationType::new(
            prev.queue,
            next.queue,
            next.binding_type,
        ),
    }
}

fn create_render_stage(
    description: &RenderGraphDescription,
    classified: &RenderGraphClassifiedStages,
    dependencies: &RenderGraphDependencies,
    weights: &[u32],
    stage_id: RenderGraphStageId,
) -> RenderGraphRenderStageDesc {
    let stage_desc = &description.render_stages[stage_id.0];
    let classified_stage = classified.stage(stage_id);

    let resource_states = classified_stage
        .resource_states
        .iter()
        .zip(&stage_desc.resource_states)
        .map(|(&resource_state_id, resource_state_desc)| {
            let resource_state = classified.resource_state(resource_state_id);
            RenderGraphResourceState {
                resource_name: resource_state_desc.resource_name.clone(),
                binding_type: resource_state.binding_type,
                access: resource_state.access,
                attachment_synchronizations: RenderGraphAttachmentSynchronizations {
                    prev_same_frame: !dependencies.input_links(resource_state_id).is_empty(),
                    ..Default::default()
                },
            }
        })
        .collect();

    RenderGraphRenderStageDesc {
        name: stage_desc.name.clone(),
        pipeline: stage_desc.pipeline.clone(),
        enabled: stage_desc.enabled,
        custom_renderer: stage_desc.custom_renderer,
        weight: weights[stage_id.0],
        resource_states,
    }
}

//
// Walk the stages in execution order. After each stage, every resource it used is transitioned
// to the state and queue of the next stage that uses it. The last user of a resource in the frame
// hands it to the first user of the next frame, except:
//  - the back buffer, which goes to the graphics queue for presenting. A non-graphics first or
//    last user of the back buffer has its acquire/release deferred to the end-of-frame batch.
//  - external resources, which go back to their owner queue and are acquired again by their first
//    user.
// No-op synchronizations are emitted too, pruning removes them.
//
#[profiling::function]
pub fn synthesize_synchronizations(
    description: &RenderGraphDescription,
    registry: &RenderGraphResourceRegistry,
    classified: &RenderGraphClassifiedStages,
    dependencies: &RenderGraphDependencies,
    weights: &[u32],
    order: &[RenderGraphStageId],
    config: &RenderGraphConfig,
) -> RenderGraphPlan {
    let render_stage_descriptions: Vec<_> = order
        .iter()
        .map(|&stage_id| {
            create_render_stage(description, classified, dependencies, weights, stage_id)
        })
        .collect();

    // Distinct resources of each stage (in declaration order) and the positions of every stage
    // using each resource (in execution order)
    let mut stage_resources = Vec::with_capacity(order.len());
    let mut resource_users: FnvHashMap<RenderGraphResourceId, Vec<usize>> = FnvHashMap::default();
    for (position, &stage_id) in order.iter().enumerate() {
        let mut resources = Vec::default();
        for &resource_state_id in &classified.stage(stage_id).resource_states {
            let resource = classified.resource_state(resource_state_id).resource;
            if !resources.contains(&resource) {
                resources.push(resource);
                resource_users.entry(resource).or_default().push(position);
            }
        }
        stage_resources.push(resources);
    }

    let mut synchronizations_after_stage = vec![Vec::default(); order.len()];
    let mut end_of_frame_synchronizations = Vec::default();

    for (position, resources) in stage_resources.iter().enumerate() {
        let render_stage = &render_stage_descriptions[position];
        let queue = render_stage.queue_type();

        for &resource in resources {
            let resource_desc = registry.resource(resource);
            let is_back_buffer = registry.is_back_buffer(resource);

            let users = match resource_users.get(&resource) {
                Some(users) => users,
                None => continue,
            };
            let user_index = match users.iter().position(|&user| user == position) {
                Some(user_index) => user_index,
                None => continue,
            };
            let (entry_binding, exit_binding) = match (
                render_stage.entry_binding(&resource_desc.name),
                render_stage.exit_binding(&resource_desc.name),
            ) {
                (Some(entry_binding), Some(exit_binding)) => (entry_binding, exit_binding),
                _ => continue,
            };

            //
            // Acquire resources that arrive from outside the graph
            //
            if user_index == 0 {
                if is_back_buffer && queue != LambdaQueueType::Graphics {
                    end_of_frame_synchronizations.push(create_synchronization(
                        resource_desc,
                        SynchronizationEndpoint {
                            render_stage: None,
                            queue: LambdaQueueType::Graphics,
                            binding_type: RenderGraphBindingType::Present,
                        },
                        SynchronizationEndpoint {
                            render_stage: Some(render_stage.name.as_str()),
                            queue,
                            binding_type: entry_binding,
                        },
                    ));
                } else if resource_desc.external && !is_back_buffer {
                    // The release of the previous frame left the resource in its last user's exit
                    // binding
                    let released_binding = users
                        .last()
                        .and_then(|&last_position| {
                            render_stage_descriptions[last_position]
                                .exit_binding(&resource_desc.name)
                        })
                        .unwrap_or(exit_binding);
                    let acquire = create_synchronization(
                        resource_desc,
                        SynchronizationEndpoint {
                            render_stage: None,
                            queue: config.external_owner_queue,
                            binding_type: released_binding,
                        },
                        SynchronizationEndpoint {
                            render_stage: Some(render_stage.name.as_str()),
                            queue,
                            binding_type: entry_binding,
                        },
                    );

                    // The very first stage has nothing in front of it, its acquire happens at the
                    // frame boundary
                    if position > 0 {
                        synchronizations_after_stage[position - 1].push(acquire);
                    } else {
                        end_of_frame_synchronizations.push(acquire);
                    }
                }
            }

            let current = SynchronizationEndpoint {
                render_stage: Some(render_stage.name.as_str()),
                queue,
                binding_type: exit_binding,
            };

            //
            // Hand the resource to whoever uses it next
            //
            let next_position = users.get(user_index + 1).copied();
            let synchronization = if let Some(next_position) = next_position {
                let next_render_stage = &render_stage_descriptions[next_position];
                let next_binding = next_render_stage
                    .entry_binding(&resource_desc.name)
                    .unwrap_or(RenderGraphBindingType::None);
                create_synchronization(
                    resource_desc,
                    current,
                    SynchronizationEndpoint {
                        render_stage: Some(next_render_stage.name.as_str()),
                        queue: next_render_stage.queue_type(),
                        binding_type: next_binding,
                    },
                )
            } else if is_back_buffer {
                let release = create_synchronization(
                    resource_desc,
                    current,
                    SynchronizationEndpoint {
                        render_stage: None,
                        queue: LambdaQueueType::Graphics,
                        binding_type: RenderGraphBindingType::Present,
                    },
                );

                if queue != LambdaQueueType::Graphics {
                    end_of_frame_synchronizations.push(release);
                    continue;
                }

                release
            } else if resource_desc.external {
                create_synchronization(
                    resource_desc,
                    current,
                    SynchronizationEndpoint {
                        render_stage: None,
                        queue: config.external_owner_queue,
                        binding_type: exit_binding,
                    },
                )
            } else {
                // Wrap around to the first user of the next frame
                let first_render_stage = &render_stage_descriptions[users[0]];
                let first_binding = first_render_stage
                    .entry_binding(&resource_desc.name)
                    .unwrap_or(RenderGraphBindingType::None);
                create_synchronization(
                    resource_desc,
                    current,
                    SynchronizationEndpoint {
                        render_stage: Some(first_render_stage.name.as_str()),
                        queue: first_render_stage.queue_type(),
                        binding_type: first_binding,
                    },
                )
            };

            synchronizations_after_stage[position].push(synchronization);
        }
    }

    //
    // Interleave: Render, [Synchronization], Render, [Synchronization], ...
    //
    let mut synchronization_stage_descriptions = Vec::with_capacity(order.len() + 2);
    let mut pipeline_stage_descriptions = Vec::with_capacity(2 * order.len() + 2);
    for (position, synchronizations) in synchronizations_after_stage.into_iter().enumerate() {
        pipeline_stage_descriptions.push(RenderGraphPipelineStageDesc::render(position));

        if !synchronizations.is_empty() {
            synchronization_stage_descriptions
                .push(RenderGraphSynchronizationStageDesc { synchronizations });
            pipeline_stage_descriptions.push(RenderGraphPipelineStageDesc::synchronization(
                synchronization_stage_descriptions.len() - 1,
            ));
        }
    }

    //
    // End-of-frame batch, one synchronization stage per destination queue
    //
    let mut end_of_frame_queues = Vec::default();
    for synchronization in &end_of_frame_synchronizations {
        if !end_of_frame_queues.contains(&synchronization.next_queue) {
            end_of_frame_queues.push(synchronization.next_queue);
        }
    }

    for queue in end_of_frame_queues {
        let synchronizations = end_of_frame_synchronizations
            .iter()
            .filter(|synchronization| synchronization.next_queue == queue)
            .cloned()
            .collect();

        synchronization_stage_descriptions
            .push(RenderGraphSynchronizationStageDesc { synchronizations });
        pipeline_stage_descriptions.push(RenderGraphPipelineStageDesc::synchronization(
            synchronization_stage_descriptions.len() - 1,
        ));
    }

    RenderGraphPlan {
        resource_descriptions: Vec::default(),
        render_stage_descriptions,
        synchronization_stage_descriptions,
        pipeline_stage_descriptions,
        warnings: Vec::default(),
    }
}
