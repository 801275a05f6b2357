use super::*;
use lambda_api::{
    LambdaBufferFlags, LambdaFormat, LambdaQueueType, LambdaTextureFlags, LambdaTextureType,
    LambdaTextureViewFlags,
};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

// Most graphs here exercise a single phase and never draw to the back buffer
fn partial_graph_config() -> RenderGraphConfig {
    RenderGraphConfig {
        require_back_buffer_output: false,
        ..Default::default()
    }
}

fn compile(description: &RenderGraphDescription) -> RenderGraphResult<RenderGraphPlan> {
    RenderGraphPlan::new(description, &partial_graph_config())
}

// Everything up to and including synthesis, before anything gets pruned
fn synthesize(
    description: &RenderGraphDescription,
    config: &RenderGraphConfig,
) -> RenderGraphPlan {
    let registry = description.validate(config).unwrap();
    let classified = classify_stages(description, &registry).unwrap();
    let dependencies = build_dependencies(&classified, &registry).unwrap();
    let weights = weight_stages(&dependencies);
    let order = sort_stages(&weights);
    synthesize_synchronizations(
        description,
        &registry,
        &classified,
        &dependencies,
        &weights,
        &order,
        config,
    )
}

fn synchronizations_between<'a>(
    plan: &'a RenderGraphPlan,
    resource_name: &str,
    first: &str,
    second: &str,
) -> Vec<&'a RenderGraphSynchronizationDesc> {
    let begin = plan.pipeline_position(first).unwrap();
    let end = plan.pipeline_position(second).unwrap();
    plan.synchronizations()
        .filter(|(position, synchronization)| {
            *position > begin && *position < end && synchronization.resource_name == resource_name
        })
        .map(|(_, synchronization)| synchronization)
        .collect()
}

//
// A compute light culling pass and a geometry pass feeding compute lighting, composited onto the
// back buffer
//
fn deferred_description() -> RenderGraphDescription {
    let mut description = RenderGraphDescription::default();
    description
        .add_resource(RenderGraphResourceDesc::texture(
            "GBuffer",
            LambdaFormat::R8G8B8A8_UNORM,
        ))
        .add_resource(RenderGraphResourceDesc::texture(
            "Depth",
            LambdaFormat::D24_UNORM_S8_UINT,
        ))
        .add_resource(RenderGraphResourceDesc::buffer("Lights"))
        .add_resource(RenderGraphResourceDesc::texture(
            "Lit",
            LambdaFormat::R16G16B16A16_SFLOAT,
        ))
        .add_resource(
            RenderGraphResourceDesc::texture("Skybox", LambdaFormat::R8G8B8A8_UNORM)
                .with_texture_type(LambdaTextureType::TextureCube)
                .with_external(),
        )
        .add_resource(RenderGraphResourceDesc::buffer("Unused"));

    description
        .add_render_stage(
            RenderGraphStageDesc::compute("LightCull", "light_cull.comp")
                .with_resource_state("Lights", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::graphics("GeometryPass", RenderGraphDrawType::SceneIndirect)
                .with_resource_state("GBuffer", RenderGraphBindingType::Attachment)
                .with_resource_state("Depth", RenderGraphBindingType::Attachment),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("Lighting", "lighting.comp")
                .with_resource_state("GBuffer", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("Lights", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("Lit", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::graphics("Composite", RenderGraphDrawType::FullscreenQuad)
                .with_resource_state("Lit", RenderGraphBindingType::CombinedSampler)
                .with_resource_state("Skybox", RenderGraphBindingType::CombinedSampler)
                .with_read_only_attachment("Depth")
                .with_resource_state(BACK_BUFFER_NAME, RenderGraphBindingType::Attachment),
        );

    description
}

#[test]
fn attachment_then_sampler_folds_into_render_pass() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_resource(RenderGraphResourceDesc::texture(
        "R",
        LambdaFormat::R8G8B8A8_UNORM,
    ));
    description
        .add_render_stage(
            RenderGraphStageDesc::graphics("A", RenderGraphDrawType::SceneIndirect)
                .with_resource_state("R", RenderGraphBindingType::Attachment),
        )
        .add_render_stage(
            RenderGraphStageDesc::graphics("B", RenderGraphDrawType::FullscreenQuad)
                .with_resource_state("R", RenderGraphBindingType::CombinedSampler),
        );

    // Before pruning there is exactly one transition between the two stages
    let synthesized = synthesize(&description, &RenderGraphConfig::default());
    assert_eq!(synthesized.render_stage_names(), vec!["A", "B"]);
    let between = synchronizations_between(&synthesized, "R", "A", "B");
    assert_eq!(between.len(), 1);
    assert_eq!(
        between[0].synchronization_type,
        RenderGraphSynchronizationType::TransitionForRead
    );
    assert_eq!(between[0].prev_binding_type, RenderGraphBindingType::Attachment);
    assert_eq!(
        between[0].next_binding_type,
        RenderGraphBindingType::CombinedSampler
    );

    // The render pass of A does the transition instead
    let plan = compile(&description).unwrap();
    assert_eq!(plan.render_stage_names(), vec!["A", "B"]);
    assert!(plan.synchronization_stage_descriptions.is_empty());
    assert!(plan.warnings.is_empty());

    let attachment = plan.render_stage("A").unwrap().find_resource_state("R").unwrap();
    assert_eq!(
        attachment.attachment_synchronizations.prev_binding_type,
        Some(RenderGraphBindingType::CombinedSampler)
    );
    assert_eq!(
        attachment.attachment_synchronizations.next_binding_type,
        Some(RenderGraphBindingType::CombinedSampler)
    );

    let sampled = plan.render_stage("B").unwrap().find_resource_state("R").unwrap();
    assert!(sampled.attachment_synchronizations.prev_same_frame);
}

#[test]
fn attachment_then_sampler_without_folding() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_resource(RenderGraphResourceDesc::texture(
        "R",
        LambdaFormat::R8G8B8A8_UNORM,
    ));
    description
        .add_render_stage(
            RenderGraphStageDesc::graphics("A", RenderGraphDrawType::SceneIndirect)
                .with_resource_state("R", RenderGraphBindingType::Attachment),
        )
        .add_render_stage(
            RenderGraphStageDesc::graphics("B", RenderGraphDrawType::FullscreenQuad)
                .with_resource_state("R", RenderGraphBindingType::CombinedSampler),
        );

    let config = RenderGraphConfig {
        fold_render_pass_transitions: false,
        ..partial_graph_config()
    };
    let plan = RenderGraphPlan::new(&description, &config).unwrap();
    let between = synchronizations_between(&plan, "R", "A", "B");
    assert_eq!(between.len(), 1);
    assert_eq!(
        between[0].synchronization_type,
        RenderGraphSynchronizationType::TransitionForRead
    );
}

#[test]
fn compute_to_graphics_changes_queue_ownership() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_resource(RenderGraphResourceDesc::buffer("B1"));
    description
        .add_render_stage(
            RenderGraphStageDesc::graphics("C", RenderGraphDrawType::FullscreenQuad)
                .with_resource_state("B1", RenderGraphBindingType::ConstantBuffer),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("A", "fill.comp")
                .with_resource_state("B1", RenderGraphBindingType::UnorderedAccessWrite),
        );

    let plan = compile(&description).unwrap();
    assert_eq!(plan.render_stage_names(), vec!["A", "C"]);

    let between = synchronizations_between(&plan, "B1", "A", "C");
    assert_eq!(between.len(), 1);
    let synchronization = between[0];
    assert_eq!(
        synchronization.synchronization_type,
        RenderGraphSynchronizationType::OwnershipChangeRead
    );
    assert_eq!(synchronization.prev_queue, LambdaQueueType::Compute);
    assert_eq!(synchronization.next_queue, LambdaQueueType::Graphics);
    assert_eq!(
        synchronization.prev_binding_type,
        RenderGraphBindingType::UnorderedAccessWrite
    );
    assert_eq!(
        synchronization.next_binding_type,
        RenderGraphBindingType::ConstantBuffer
    );
    assert_eq!(synchronization.prev_render_stage.as_deref(), Some("A"));
    assert_eq!(synchronization.next_render_stage.as_deref(), Some("C"));

    // Next frame's write gets the buffer back on the compute queue
    let after_c: Vec<_> = plan
        .synchronizations()
        .filter(|(position, _)| *position > plan.pipeline_position("C").unwrap())
        .map(|(_, synchronization)| synchronization)
        .collect();
    assert_eq!(after_c.len(), 1);
    assert_eq!(
        after_c[0].synchronization_type,
        RenderGraphSynchronizationType::OwnershipChangeWrite
    );
    assert_eq!(after_c[0].next_render_stage.as_deref(), Some("A"));
}

#[test]
fn unconnected_input_is_rejected() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description
        .add_resource(RenderGraphResourceDesc::texture(
            "Z",
            LambdaFormat::R8G8B8A8_UNORM,
        ))
        .add_resource(RenderGraphResourceDesc::texture(
            "Out",
            LambdaFormat::R8G8B8A8_UNORM,
        ));
    description.add_render_stage(
        RenderGraphStageDesc::compute("X", "x.comp")
            .with_resource_state("Z", RenderGraphBindingType::UnorderedAccessRead)
            .with_resource_state("Out", RenderGraphBindingType::UnorderedAccessWrite),
    );

    match compile(&description) {
        Err(RenderGraphError::UnconnectedInput { resource, stage }) => {
            assert_eq!(resource, "Z");
            assert_eq!(stage, "X");
        }
        result => panic!("Expected an unconnected input, got {:?}", result),
    }
}

#[test]
fn inputs_with_several_writers_are_rejected() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_resource(RenderGraphResourceDesc::buffer("R"));
    description
        .add_render_stage(
            RenderGraphStageDesc::compute("A", "a.comp")
                .with_resource_state("R", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("B", "b.comp")
                .with_resource_state("R", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("C", "c.comp")
                .with_resource_state("R", RenderGraphBindingType::UnorderedAccessRead),
        );

    let config = RenderGraphConfig::default();
    let registry = description.validate(&config).unwrap();
    let classified = classify_stages(&description, &registry).unwrap();
    match build_dependencies(&classified, &registry) {
        Err(RenderGraphError::MultipleProducers {
            resource,
            stage,
            producers,
        }) => {
            assert_eq!(resource, "R");
            assert_eq!(stage, "C");
            assert_eq!(producers, vec!["A".to_string(), "B".to_string()]);
        }
        Err(e) => panic!("Expected several producers, got {:?}", e),
        Ok(_) => panic!("Expected several producers, got a graph"),
    }

    let result = compile(&description);
    assert!(matches!(
        result,
        Err(RenderGraphError::MultipleProducers { .. })
    ));
    assert!(result.unwrap_err().is_structural());

    // Reading its own earlier write doesn't make a stage a second producer
    let mut single_writer = RenderGraphDescription::default();
    single_writer.add_resource(RenderGraphResourceDesc::buffer("R"));
    single_writer
        .add_render_stage(
            RenderGraphStageDesc::compute("A", "a.comp")
                .with_resource_state("R", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("C", "c.comp")
                .with_resource_state("R", RenderGraphBindingType::UnorderedAccessRead),
        );
    assert_eq!(
        compile(&single_writer).unwrap().render_stage_names(),
        vec!["A", "C"]
    );
}

#[test]
fn unwritten_back_buffer_is_rejected() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_resource(RenderGraphResourceDesc::buffer("Particles"));
    description.add_render_stage(
        RenderGraphStageDesc::compute("Simulate", "simulate.comp")
            .with_resource_state("Particles", RenderGraphBindingType::UnorderedAccessWrite),
    );

    let result = RenderGraphPlan::new(&description, &RenderGraphConfig::default());
    match &result {
        Err(RenderGraphError::BackBufferNotWritten { resource }) => {
            assert_eq!(resource, BACK_BUFFER_NAME);
        }
        result => panic!("Expected an unwritten back buffer, got {:?}", result),
    }
    assert!(result.unwrap_err().is_structural());

    // A graphics stage that draws somewhere else doesn't count
    description.add_render_stage(
        RenderGraphStageDesc::graphics("Draw", RenderGraphDrawType::FullscreenQuad)
            .with_resource_state("Particles", RenderGraphBindingType::UnorderedAccessRead),
    );
    assert!(matches!(
        RenderGraphPlan::new(&description, &RenderGraphConfig::default()),
        Err(RenderGraphError::BackBufferNotWritten { .. })
    ));

    // Cycles are reported before the missing output
    assert!(matches!(
        RenderGraphPlan::new(&cyclic_description(), &RenderGraphConfig::default()),
        Err(RenderGraphError::CyclicDependency { .. })
    ));

    let plan = compile(&description).unwrap();
    assert_eq!(plan.render_stage_names(), vec!["Simulate", "Draw"]);

    description.render_stages[1]
        .resource_states
        .push(RenderGraphResourceStateDesc {
            resource_name: BACK_BUFFER_NAME.to_string(),
            binding_type: RenderGraphBindingType::Attachment,
            read_only: false,
        });
    assert!(RenderGraphPlan::new(&description, &RenderGraphConfig::default()).is_ok());
}

fn cyclic_description() -> RenderGraphDescription {
    let mut description = RenderGraphDescription::default();
    description
        .add_resource(RenderGraphResourceDesc::buffer("T1"))
        .add_resource(RenderGraphResourceDesc::buffer("T2"));
    description
        .add_render_stage(
            RenderGraphStageDesc::compute("P", "p.comp")
                .with_resource_state("T1", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("T2", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("Q", "q.comp")
                .with_resource_state("T2", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("T1", RenderGraphBindingType::UnorderedAccessWrite),
        );
    description
}

#[test]
fn cyclic_dependency_is_rejected() {
    init_logging();

    match compile(&cyclic_description()) {
        Err(RenderGraphError::CyclicDependency {
            ancestor,
            descendant,
        }) => {
            assert_eq!(ancestor, "P");
            assert_eq!(descendant, "Q");
        }
        result => panic!("Expected a cyclic dependency, got {:?}", result),
    }
}

#[test]
fn compute_only_back_buffer_synchronizes_at_end_of_frame() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_render_stage(
        RenderGraphStageDesc::compute("C", "raymarch.comp")
            .with_resource_state(BACK_BUFFER_NAME, RenderGraphBindingType::UnorderedAccessWrite),
    );

    let plan = compile(&description).unwrap();
    let c_position = plan.pipeline_position("C").unwrap();
    assert_eq!(c_position, 0);

    let synchronizations: Vec<_> = plan.synchronizations().collect();
    assert_eq!(synchronizations.len(), 2);
    assert_eq!(plan.synchronization_stage_descriptions.len(), 2);
    assert!(synchronizations
        .iter()
        .all(|(position, _)| *position > c_position));

    // graphics -> compute before the write
    let acquire = synchronizations[0].1;
    assert_eq!(acquire.prev_queue, LambdaQueueType::Graphics);
    assert_eq!(acquire.next_queue, LambdaQueueType::Compute);
    assert_eq!(acquire.prev_binding_type, RenderGraphBindingType::Present);
    assert_eq!(
        acquire.next_binding_type,
        RenderGraphBindingType::UnorderedAccessWrite
    );
    assert_eq!(acquire.next_render_stage.as_deref(), Some("C"));

    // compute -> graphics for presenting
    let release = synchronizations[1].1;
    assert_eq!(release.prev_queue, LambdaQueueType::Compute);
    assert_eq!(release.next_queue, LambdaQueueType::Graphics);
    assert_eq!(release.next_binding_type, RenderGraphBindingType::Present);
    assert_eq!(release.prev_render_stage.as_deref(), Some("C"));
    assert_eq!(release.next_render_stage, None);
    assert_eq!(
        release.synchronization_type,
        RenderGraphSynchronizationType::OwnershipChangeRead
    );
}

#[test]
fn identical_consecutive_uses_need_no_synchronization() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_resource(RenderGraphResourceDesc::buffer("Buf"));
    description
        .add_render_stage(
            RenderGraphStageDesc::compute("W", "w.comp")
                .with_resource_state("Buf", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("R1", "r1.comp")
                .with_resource_state("Buf", RenderGraphBindingType::UnorderedAccessRead),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("R2", "r2.comp")
                .with_resource_state("Buf", RenderGraphBindingType::UnorderedAccessRead),
        );

    let synthesized = synthesize(&description, &RenderGraphConfig::default());
    let between = synchronizations_between(&synthesized, "Buf", "R1", "R2");
    assert_eq!(between.len(), 1);
    assert!(between[0].is_no_op());

    let plan = compile(&description).unwrap();
    assert_eq!(plan.render_stage_names(), vec!["W", "R1", "R2"]);
    assert!(synchronizations_between(&plan, "Buf", "R1", "R2").is_empty());

    let between = synchronizations_between(&plan, "Buf", "W", "R1");
    assert_eq!(between.len(), 1);
    assert_eq!(
        between[0].synchronization_type,
        RenderGraphSynchronizationType::TransitionForRead
    );
}

#[test]
fn heavier_stages_run_first_and_ties_keep_declaration_order() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description
        .add_resource(RenderGraphResourceDesc::buffer("X"))
        .add_resource(RenderGraphResourceDesc::buffer("Y"))
        .add_resource(RenderGraphResourceDesc::buffer("Z"));

    // Declared consumers first
    description
        .add_render_stage(
            RenderGraphStageDesc::compute("D", "d.comp")
                .with_resource_state("X", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("Y", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("Z", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("B", "b.comp")
                .with_resource_state("Y", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("A", "a.comp")
                .with_resource_state("X", RenderGraphBindingType::UnorderedAccessWrite),
        );

    let plan = compile(&description).unwrap();
    assert_eq!(plan.render_stage_names(), vec!["B", "A", "D"]);
    assert_eq!(plan.render_stage("A").unwrap().weight, 1);
    assert_eq!(plan.render_stage("B").unwrap().weight, 1);
    assert_eq!(plan.render_stage("D").unwrap().weight, 0);
}

#[test]
fn chain_weights_count_all_descendants() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description
        .add_resource(RenderGraphResourceDesc::buffer("X"))
        .add_resource(RenderGraphResourceDesc::buffer("Y"))
        .add_resource(RenderGraphResourceDesc::buffer("Z"));
    description
        .add_render_stage(
            RenderGraphStageDesc::compute("C", "c.comp")
                .with_resource_state("Y", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("Z", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("B", "b.comp")
                .with_resource_state("X", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("Y", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("A", "a.comp")
                .with_resource_state("X", RenderGraphBindingType::UnorderedAccessWrite),
        );

    let config = RenderGraphConfig::default();
    let registry = description.validate(&config).unwrap();
    let classified = classify_stages(&description, &registry).unwrap();
    let dependencies = build_dependencies(&classified, &registry).unwrap();
    assert_eq!(weight_stages(&dependencies), vec![0, 1, 2]);

    let plan = compile(&description).unwrap();
    assert_eq!(plan.render_stage_names(), vec!["A", "B", "C"]);
}

#[test]
fn dependencies_are_acyclic_and_respected_by_the_order() {
    init_logging();

    let description = deferred_description();
    let config = RenderGraphConfig::default();
    let registry = description.validate(&config).unwrap();
    let classified = classify_stages(&description, &registry).unwrap();
    let dependencies = build_dependencies(&classified, &registry).unwrap();

    for stage in classified.stage_ids() {
        for &child in dependencies.children(stage) {
            assert!(!dependencies.is_descendant(child, stage));
        }
    }

    let plan = compile(&description).unwrap();
    assert_eq!(
        plan.render_stage_names(),
        vec!["LightCull", "GeometryPass", "Lighting", "Composite"]
    );

    assert!(!dependencies.links().is_empty());
    for link in dependencies.links() {
        let producer = classified
            .stage(classified.resource_state(link.src).stage)
            .name();
        let consumer = classified
            .stage(classified.resource_state(link.dst).stage)
            .name();
        assert!(
            plan.pipeline_position(producer).unwrap() < plan.pipeline_position(consumer).unwrap(),
            "{} must run before {}",
            producer,
            consumer
        );
    }
}

#[test]
fn every_internal_input_has_one_link() {
    init_logging();

    let description = deferred_description();
    let config = RenderGraphConfig::default();
    let registry = description.validate(&config).unwrap();
    let classified = classify_stages(&description, &registry).unwrap();
    let dependencies = build_dependencies(&classified, &registry).unwrap();

    for stage in classified.stage_ids() {
        for &input in &classified.stage(stage).inputs {
            assert!(!dependencies.is_temporal_input(input));
            assert_eq!(dependencies.input_links(input).len(), 1);
        }

        // The skybox comes from outside of the graph
        for &input in &classified.stage(stage).external_inputs {
            assert!(dependencies.input_links(input).is_empty());
        }
    }
}

#[test]
fn temporal_inputs_create_no_edges() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description
        .add_resource(
            RenderGraphResourceDesc::texture("History", LambdaFormat::R16G16B16A16_SFLOAT)
                .with_temporal(),
        )
        .add_resource(RenderGraphResourceDesc::texture(
            "Accumulation",
            LambdaFormat::R16G16B16A16_SFLOAT,
        ))
        .add_resource(RenderGraphResourceDesc::texture(
            "Out",
            LambdaFormat::R16G16B16A16_SFLOAT,
        ));

    description
        .add_render_stage(
            RenderGraphStageDesc::compute("Resolve", "resolve.comp")
                .with_resource_state("History", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("Accumulation", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("Accumulation", RenderGraphBindingType::UnorderedAccessWrite)
                .with_resource_state("Out", RenderGraphBindingType::UnorderedAccessWrite),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("StoreHistory", "store.comp")
                .with_resource_state("Out", RenderGraphBindingType::UnorderedAccessRead)
                .with_resource_state("History", RenderGraphBindingType::UnorderedAccessWrite),
        );

    let config = RenderGraphConfig::default();
    let registry = description.validate(&config).unwrap();
    let classified = classify_stages(&description, &registry).unwrap();
    let dependencies = build_dependencies(&classified, &registry).unwrap();
    assert_eq!(dependencies.links().len(), 1);

    let resolve = classified.stage(RenderGraphStageId(0));
    for &input in &resolve.inputs {
        assert!(dependencies.is_temporal_input(input));
    }

    let plan = compile(&description).unwrap();
    assert_eq!(plan.render_stage_names(), vec!["Resolve", "StoreHistory"]);

    let resolve = plan.render_stage("Resolve").unwrap();
    assert!(
        !resolve
            .find_resource_state("History")
            .unwrap()
            .attachment_synchronizations
            .prev_same_frame
    );
    let store = plan.render_stage("StoreHistory").unwrap();
    assert!(
        store
            .find_resource_state("Out")
            .unwrap()
            .attachment_synchronizations
            .prev_same_frame
    );

    // History written at the end of the frame is read at the start of the next
    let between = synchronizations_between(&plan, "History", "Resolve", "StoreHistory");
    assert_eq!(between.len(), 1);
    assert_eq!(
        between[0].synchronization_type,
        RenderGraphSynchronizationType::TransitionForWrite
    );
}

#[test]
fn adjacent_uses_are_synchronized_exactly_when_they_differ() {
    init_logging();

    let description = deferred_description();
    let config = RenderGraphConfig {
        fold_render_pass_transitions: false,
        ..Default::default()
    };
    let plan = RenderGraphPlan::new(&description, &config).unwrap();
    let names = plan.render_stage_names();

    for resource in &plan.resource_descriptions {
        let users: Vec<_> = names
            .iter()
            .filter(|name| {
                plan.render_stage(name)
                    .unwrap()
                    .find_resource_state(&resource.name)
                    .is_some()
            })
            .collect();

        for pair in users.windows(2) {
            let prev = plan.render_stage(pair[0]).unwrap();
            let next = plan.render_stage(pair[1]).unwrap();
            let differs = prev.queue_type() != next.queue_type()
                || prev.exit_binding(&resource.name) != next.entry_binding(&resource.name);

            let between = synchronizations_between(&plan, &resource.name, pair[0], pair[1]);
            if differs {
                assert!(
                    !between.is_empty(),
                    "{} needs a synchronization between {} and {}",
                    resource.name,
                    pair[0],
                    pair[1]
                );
            } else {
                assert!(
                    between.is_empty(),
                    "{} needs no synchronization between {} and {}",
                    resource.name,
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    // Depth is only used as an attachment on the graphics queue
    assert!(synchronizations_between(&plan, "Depth", "GeometryPass", "Composite").is_empty());
    let gbuffer = synchronizations_between(&plan, "GBuffer", "GeometryPass", "Lighting");
    assert_eq!(gbuffer.len(), 1);
    assert_eq!(
        gbuffer[0].synchronization_type,
        RenderGraphSynchronizationType::OwnershipChangeRead
    );
}

#[test]
fn pruning_twice_changes_nothing() {
    init_logging();

    for fold_render_pass_transitions in [true, false] {
        let description = deferred_description();
        let config = RenderGraphConfig {
            fold_render_pass_transitions,
            ..Default::default()
        };
        let registry = description.validate(&config).unwrap();

        let plan = RenderGraphPlan::new(&description, &config).unwrap();
        let mut pruned_again = plan.clone();
        let warnings = prune_synchronizations(&mut pruned_again, &registry, &config);

        assert_eq!(warnings, plan.warnings);
        assert_eq!(
            pruned_again.render_stage_descriptions,
            plan.render_stage_descriptions
        );
        assert_eq!(
            pruned_again.synchronization_stage_descriptions,
            plan.synchronization_stage_descriptions
        );
        assert_eq!(
            pruned_again.pipeline_stage_descriptions,
            plan.pipeline_stage_descriptions
        );
    }
}

#[test]
fn cross_queue_attachment_barriers_keep_the_ownership_transfer() {
    init_logging();

    let plan = compile(&deferred_description()).unwrap();

    let gbuffer = synchronizations_between(&plan, "GBuffer", "GeometryPass", "Lighting");
    assert_eq!(gbuffer.len(), 1);
    assert!(gbuffer[0].is_queue_transfer());
    assert_eq!(
        gbuffer[0].prev_binding_type,
        RenderGraphBindingType::UnorderedAccessRead
    );
    assert_eq!(
        gbuffer[0].next_binding_type,
        RenderGraphBindingType::UnorderedAccessRead
    );

    let attachment = plan
        .render_stage("GeometryPass")
        .unwrap()
        .find_resource_state("GBuffer")
        .unwrap();
    assert_eq!(
        attachment.attachment_synchronizations.next_binding_type,
        Some(RenderGraphBindingType::UnorderedAccessRead)
    );

    // The back buffer leaves the composite render pass ready to present
    let back_buffer = plan
        .render_stage("Composite")
        .unwrap()
        .find_resource_state(BACK_BUFFER_NAME)
        .unwrap();
    assert_eq!(
        back_buffer.attachment_synchronizations.prev_binding_type,
        None
    );
    assert_eq!(
        back_buffer.attachment_synchronizations.next_binding_type,
        Some(RenderGraphBindingType::Present)
    );
    assert!(plan
        .synchronizations()
        .all(|(_, synchronization)| synchronization.resource_name != BACK_BUFFER_NAME));
    assert!(plan.warnings.is_empty());
}

#[test]
fn attachment_without_next_user_warns() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description
        .add_resource(RenderGraphResourceDesc::texture(
            "Color",
            LambdaFormat::R8G8B8A8_UNORM,
        ))
        .add_resource(RenderGraphResourceDesc::texture(
            "ShadowMap",
            LambdaFormat::D24_UNORM_S8_UINT,
        ));
    description.add_render_stage(
        RenderGraphStageDesc::graphics("Scene", RenderGraphDrawType::SceneIndirect)
            .with_resource_state("Color", RenderGraphBindingType::Attachment)
            .with_resource_state("ShadowMap", RenderGraphBindingType::Attachment),
    );

    let plan = compile(&description).unwrap();
    assert_eq!(
        plan.warnings,
        vec![RenderGraphWarning::AttachmentWithoutNextUser {
            resource: "Color".to_string(),
            stage: "Scene".to_string(),
        }]
    );

    // Depth targets stay attachments
    let shadow_map = plan
        .render_stage("Scene")
        .unwrap()
        .find_resource_state("ShadowMap")
        .unwrap();
    assert_eq!(
        shadow_map.attachment_synchronizations.next_binding_type,
        Some(RenderGraphBindingType::Attachment)
    );
}

#[test]
fn external_resources_are_acquired_and_released() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_resource(
        RenderGraphResourceDesc::texture("Irradiance", LambdaFormat::R16G16B16A16_SFLOAT)
            .with_external(),
    );
    description.add_render_stage(
        RenderGraphStageDesc::compute("UpdateIrradiance", "irradiance.comp")
            .with_resource_state("Irradiance", RenderGraphBindingType::UnorderedAccessWrite),
    );

    let plan = compile(&description).unwrap();
    let synchronizations: Vec<_> = plan
        .synchronizations()
        .map(|(_, synchronization)| synchronization)
        .collect();
    assert_eq!(synchronizations.len(), 2);

    let release = synchronizations[0];
    assert_eq!(release.prev_render_stage.as_deref(), Some("UpdateIrradiance"));
    assert_eq!(release.next_render_stage, None);
    assert_eq!(release.next_queue, LambdaQueueType::Graphics);

    let acquire = synchronizations[1];
    assert_eq!(acquire.prev_render_stage, None);
    assert_eq!(acquire.prev_queue, LambdaQueueType::Graphics);
    assert_eq!(acquire.next_queue, LambdaQueueType::Compute);
    assert_eq!(
        acquire.synchronization_type,
        RenderGraphSynchronizationType::OwnershipChangeWrite
    );
}

#[test]
fn external_resources_are_reacquired_in_the_binding_they_were_released_in() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description.add_resource(
        RenderGraphResourceDesc::texture("Environment", LambdaFormat::R16G16B16A16_SFLOAT)
            .with_external(),
    );
    description
        .add_render_stage(
            RenderGraphStageDesc::graphics("Shade", RenderGraphDrawType::FullscreenQuad)
                .with_resource_state("Environment", RenderGraphBindingType::CombinedSampler),
        )
        .add_render_stage(
            RenderGraphStageDesc::compute("Trace", "trace.comp")
                .with_resource_state("Environment", RenderGraphBindingType::UnorderedAccessRead),
        );

    let plan = compile(&description).unwrap();
    assert_eq!(plan.render_stage_names(), vec!["Shade", "Trace"]);

    let synchronizations: Vec<_> = plan
        .synchronizations()
        .map(|(_, synchronization)| synchronization)
        .collect();

    let release: Vec<_> = synchronizations
        .iter()
        .filter(|synchronization| {
            synchronization.prev_render_stage.as_deref() == Some("Trace")
                && synchronization.next_render_stage.is_none()
        })
        .collect();
    assert_eq!(release.len(), 1);
    assert_eq!(release[0].next_queue, LambdaQueueType::Graphics);
    assert_eq!(
        release[0].next_binding_type,
        RenderGraphBindingType::UnorderedAccessRead
    );

    // The owner still holds it for unordered access, the sampler needs a transition
    let acquire: Vec<_> = synchronizations
        .iter()
        .filter(|synchronization| {
            synchronization.prev_render_stage.is_none()
                && synchronization.next_render_stage.as_deref() == Some("Shade")
        })
        .collect();
    assert_eq!(acquire.len(), 1);
    assert_eq!(acquire[0].prev_queue, LambdaQueueType::Graphics);
    assert_eq!(acquire[0].next_queue, LambdaQueueType::Graphics);
    assert_eq!(
        acquire[0].prev_binding_type,
        release[0].next_binding_type
    );
    assert_eq!(
        acquire[0].next_binding_type,
        RenderGraphBindingType::CombinedSampler
    );
    assert_eq!(
        acquire[0].synchronization_type,
        RenderGraphSynchronizationType::TransitionForRead
    );
}

#[test]
fn resource_flags_follow_bindings() {
    init_logging();

    let plan = compile(&deferred_description()).unwrap();

    let gbuffer = plan.find_resource("GBuffer").unwrap();
    assert_eq!(
        gbuffer.texture_flags,
        LambdaTextureFlags::RENDER_TARGET | LambdaTextureFlags::UNORDERED_ACCESS
    );
    assert_eq!(
        plan.find_resource("Depth").unwrap().texture_flags,
        LambdaTextureFlags::DEPTH_STENCIL
    );
    assert_eq!(
        plan.find_resource("Lights").unwrap().buffer_flags,
        LambdaBufferFlags::UNORDERED_ACCESS_BUFFER
    );

    let lit = plan.find_resource("Lit").unwrap();
    assert_eq!(
        lit.texture_flags,
        LambdaTextureFlags::UNORDERED_ACCESS | LambdaTextureFlags::SHADER_RESOURCE
    );
    assert_eq!(
        lit.texture_view_flags,
        LambdaTextureViewFlags::UNORDERED_ACCESS | LambdaTextureViewFlags::SHADER_RESOURCE
    );

    assert_eq!(
        plan.find_resource("Skybox").unwrap().texture_flags,
        LambdaTextureFlags::CUBE_COMPATIBLE | LambdaTextureFlags::SHADER_RESOURCE
    );
    assert_eq!(
        plan.find_resource(BACK_BUFFER_NAME).unwrap().texture_flags,
        LambdaTextureFlags::RENDER_TARGET
    );

    assert!(plan.find_resource("Unused").is_none());

    let config = RenderGraphConfig {
        remove_unused_resources: false,
        ..Default::default()
    };
    let plan = RenderGraphPlan::new(&deferred_description(), &config).unwrap();
    assert!(plan.find_resource("Unused").is_some());
}

#[test]
fn draw_buffers_get_draw_flags() {
    init_logging();

    let mut description = RenderGraphDescription::default();
    description
        .add_resource(RenderGraphResourceDesc::buffer("Indices"))
        .add_resource(RenderGraphResourceDesc::buffer("DrawArgs"));
    description.add_render_stage(
        RenderGraphStageDesc::new(
            "Scene",
            RenderGraphStagePipeline::Graphics {
                draw_type: RenderGraphDrawType::SceneIndirect,
                index_buffer: Some("Indices".to_string()),
                indirect_args_buffer: Some("DrawArgs".to_string()),
                shaders: Default::default(),
            },
        )
        .with_resource_state(BACK_BUFFER_NAME, RenderGraphBindingType::Attachment),
    );

    let plan = compile(&description).unwrap();
    assert_eq!(
        plan.find_resource("Indices").unwrap().buffer_flags,
        LambdaBufferFlags::INDEX_BUFFER
    );
    assert_eq!(
        plan.find_resource("DrawArgs").unwrap().buffer_flags,
        LambdaBufferFlags::INDIRECT_BUFFER
    );
}

#[test]
fn back_buffer_is_added_when_missing() {
    init_logging();

    let plan = compile(&RenderGraphDescription::default()).unwrap();
    assert_eq!(plan.resource_descriptions.len(), 1);
    let back_buffer = &plan.resource_descriptions[0];
    assert_eq!(back_buffer.name, BACK_BUFFER_NAME);
    assert_eq!(back_buffer.resource_type, RenderGraphResourceType::Texture);
    assert_eq!(back_buffer.sub_resource_count, 1);
    assert_eq!(back_buffer.texture.format, LambdaFormat::B8G8R8A8_UNORM);
    assert!(plan.pipeline_stage_descriptions.is_empty());

    let mut description = RenderGraphDescription::default();
    description.add_resource(RenderGraphResourceDesc::buffer(BACK_BUFFER_NAME));
    assert!(matches!(
        compile(&description),
        Err(RenderGraphError::MalformedDescription(_))
    ));
}

#[test]
fn unclassifiable_bindings_are_rejected() {
    init_logging();

    let cases = vec![
        (
            RenderGraphResourceDesc::texture("Tex", LambdaFormat::R8G8B8A8_UNORM),
            RenderGraphStageDesc::graphics("S", RenderGraphDrawType::FullscreenQuad)
                .with_resource_state("Tex", RenderGraphBindingType::ConstantBuffer),
        ),
        (
            RenderGraphResourceDesc::texture("Tex", LambdaFormat::R8G8B8A8_UNORM),
            RenderGraphStageDesc::compute("S", "s.comp")
                .with_resource_state("Tex", RenderGraphBindingType::Attachment),
        ),
        (
            RenderGraphResourceDesc::texture("Tex", LambdaFormat::R8G8B8A8_UNORM),
            RenderGraphStageDesc::graphics("S", RenderGraphDrawType::FullscreenQuad)
                .with_resource_state("Tex", RenderGraphBindingType::Present),
        ),
        (
            RenderGraphResourceDesc::buffer("Tex"),
            RenderGraphStageDesc::compute("S", "s.comp")
                .with_resource_state("Tex", RenderGraphBindingType::None),
        ),
        (
            RenderGraphResourceDesc::buffer("Tex"),
            RenderGraphStageDesc::ray_tracing("S", "raygen.rgen")
                .with_resource_state("Tex", RenderGraphBindingType::AccelerationStructure),
        ),
    ];

    for (resource, render_stage) in cases {
        let expected_binding_type = render_stage.resource_states[0].binding_type;
        let mut description = RenderGraphDescription::default();
        description
            .add_resource(resource)
            .add_render_stage(render_stage);

        match compile(&description) {
            Err(RenderGraphError::UnclassifiableBinding {
                stage,
                resource,
                binding_type,
            }) => {
                assert_eq!(stage, "S");
                assert_eq!(resource, "Tex");
                assert_eq!(binding_type, expected_binding_type);
            }
            result => panic!("Expected an unclassifiable binding, got {:?}", result),
        }
    }
}

#[test]
fn malformed_descriptions_are_rejected() {
    init_logging();

    let mut duplicate_resources = RenderGraphDescription::default();
    duplicate_resources
        .add_resource(RenderGraphResourceDesc::buffer("A"))
        .add_resource(RenderGraphResourceDesc::buffer("A"));

    let mut undeclared_resource = RenderGraphDescription::default();
    undeclared_resource.add_render_stage(
        RenderGraphStageDesc::compute("S", "s.comp")
            .with_resource_state("Missing", RenderGraphBindingType::UnorderedAccessWrite),
    );

    let mut duplicate_stages = RenderGraphDescription::default();
    duplicate_stages
        .add_render_stage(RenderGraphStageDesc::compute("S", "s.comp"))
        .add_render_stage(RenderGraphStageDesc::compute("S", "s.comp"));

    let mut texture_index_buffer = RenderGraphDescription::default();
    texture_index_buffer
        .add_resource(RenderGraphResourceDesc::texture(
            "Indices",
            LambdaFormat::R8G8B8A8_UNORM,
        ))
        .add_render_stage(RenderGraphStageDesc::new(
            "S",
            RenderGraphStagePipeline::Graphics {
                draw_type: RenderGraphDrawType::SceneIndirect,
                index_buffer: Some("Indices".to_string()),
                indirect_args_buffer: None,
                shaders: Default::default(),
            },
        ));

    let mut no_sub_resources = RenderGraphDescription::default();
    no_sub_resources.add_resource(RenderGraphResourceDesc::buffer("A").with_sub_resources(0, false));

    for description in &[
        duplicate_resources,
        undeclared_resource,
        duplicate_stages,
        texture_index_buffer,
        no_sub_resources,
    ] {
        let result = compile(description);
        assert!(
            matches!(result, Err(RenderGraphError::MalformedDescription(_))),
            "Expected a malformed description, got {:?}",
            result
        );
        assert!(result.unwrap_err().is_structural());
    }
}

#[test]
fn saved_description_round_trips() {
    init_logging();

    let description = deferred_description();
    let config = RenderGraphConfig::default();

    let json = save_render_graph(&description, &config, &mut IdAllocator::new()).unwrap();
    let loaded = load_render_graph(&json, &config).unwrap();
    assert_eq!(loaded, description);
    assert_eq!(
        RenderGraphPlan::new(&loaded, &config).unwrap(),
        RenderGraphPlan::new(&description, &config).unwrap()
    );

    let document: serde_json::Value = serde_json::from_str(&json).unwrap();
    let registry = description.validate(&config).unwrap();
    let classified = classify_stages(&description, &registry).unwrap();
    let dependencies = build_dependencies(&classified, &registry).unwrap();
    assert_eq!(
        document["links"].as_array().unwrap().len(),
        dependencies.links().len()
    );

    // Separate allocators hand out the same ids
    let again = save_render_graph(&description, &config, &mut IdAllocator::new()).unwrap();
    assert_eq!(json, again);
}

#[test]
fn cyclic_description_still_saves() {
    init_logging();

    let description = cyclic_description();
    let config = RenderGraphConfig::default();
    let json = save_render_graph(&description, &config, &mut IdAllocator::new()).unwrap();
    assert_eq!(load_render_graph(&json, &config).unwrap(), description);
}

#[test]
fn broken_documents_fail_to_load() {
    init_logging();

    let config = RenderGraphConfig::default();

    let wrong_resources = r#"
    {
        "resources": [
            { "name": "A", "type": "BUFFER" },
            { "name": "B", "type": "BUFFER" }
        ],
        "render_stages": [
            {
                "name": "W",
                "pipeline": { "type": "COMPUTE", "shader_name": "w.comp" },
                "resource_states": [
                    { "resource_name": "A", "binding_type": "UNORDERED_ACCESS_WRITE", "attribute_index": 0 }
                ]
            },
            {
                "name": "R",
                "pipeline": { "type": "COMPUTE", "shader_name": "r.comp" },
                "resource_states": [
                    { "resource_name": "B", "binding_type": "UNORDERED_ACCESS_READ", "attribute_index": 2 }
                ]
            }
        ],
        "links": [
            { "link_index": 0, "src_attribute_index": 1, "dst_attribute_index": 2 }
        ]
    }"#;
    assert!(matches!(
        load_render_graph(wrong_resources, &config),
        Err(RenderGraphError::MalformedDescription(_))
    ));

    let missing_attribute = wrong_resources.replace("\"dst_attribute_index\": 2", "\"dst_attribute_index\": 8");
    assert!(matches!(
        load_render_graph(&missing_attribute, &config),
        Err(RenderGraphError::MalformedDescription(_))
    ));

    let missing_field = r#"{ "resources": [ { "name": "A" } ] }"#;
    assert!(matches!(
        load_render_graph(missing_field, &config),
        Err(RenderGraphError::MalformedDescription(_))
    ));

    assert!(matches!(
        load_render_graph("{ \"resources\": [", &config),
        Err(RenderGraphError::JsonError(_))
    ));

    // A link dropped from the list, along with every reference to it, no longer matches the
    // resource names it was derived from
    let json = save_render_graph(&deferred_description(), &config, &mut IdAllocator::new()).unwrap();
    let mut document: serde_json::Value = serde_json::from_str(&json).unwrap();
    let dropped = document["links"].as_array_mut().unwrap().remove(0);
    let dropped_index = dropped["link_index"].clone();
    for render_stage in document["render_stages"].as_array_mut().unwrap() {
        for resource_state in render_stage["resource_states"].as_array_mut().unwrap() {
            if resource_state["input_link_index"] == dropped_index {
                resource_state["input_link_index"] = serde_json::Value::Null;
            }
            resource_state["output_link_indices"]
                .as_array_mut()
                .unwrap()
                .retain(|link_index| *link_index != dropped_index);
        }
    }

    match load_render_graph(&document.to_string(), &config) {
        Err(RenderGraphError::MalformedDescription(message)) => {
            assert!(message.contains("Missing link"), "{}", message);
        }
        result => panic!("Expected a malformed description, got {:?}", result),
    }

    // Leaving the links out entirely derives them
    document.as_object_mut().unwrap().remove("links");
    for render_stage in document["render_stages"].as_array_mut().unwrap() {
        for resource_state in render_stage["resource_states"].as_array_mut().unwrap() {
            resource_state["input_link_index"] = serde_json::Value::Null;
            resource_state["output_link_indices"] = serde_json::Value::Array(Vec::default());
        }
    }
    assert_eq!(
        load_render_graph(&document.to_string(), &config).unwrap(),
        deferred_description()
    );
}

#[test]
fn missing_files_report_their_path() {
    init_logging();

    let path = std::env::temp_dir().join("lambda-render-graph-that-does-not-exist.json");
    match load_from_file(&path, &RenderGraphConfig::default()) {
        Err(e @ RenderGraphError::IoError { .. }) => {
            assert!(!e.is_structural());
            assert!(e.to_string().contains("lambda-render-graph-that-does-not-exist.json"));
            if let RenderGraphError::IoError { path: error_path, error } = e {
                assert_eq!(error_path, path);
                assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
            }
        }
        result => panic!("Expected an io error, got {:?}", result),
    }
}

#[test]
fn graph_viz_lists_every_stage() {
    init_logging();

    let plan = compile(&deferred_description()).unwrap();
    let dot = write_graph_viz(&plan);
    assert!(dot.starts_with("digraph RenderGraph {\n"));
    assert!(dot.ends_with("}\n"));
    for name in plan.render_stage_names() {
        assert!(dot.contains(name));
    }
    assert!(dot.contains("OwnershipChangeRead"));

    // One node per pipeline stage, chained in execution order
    let stage_count = plan.pipeline_stage_descriptions.len();
    let edges: Vec<_> = dot.lines().filter(|line| line.contains(" -> ")).collect();
    assert_eq!(edges.len(), stage_count - 1);
    for (index, edge) in edges.iter().enumerate() {
        assert_eq!(*edge, format!("  s{} -> s{};", index, index + 1));
    }
    let light_cull = "  s0 [label=\"LightCull\\nCompute\\nLights UnorderedAccessWrite\", shape=box, style=solid];";
    assert!(dot.lines().any(|line| line == light_cull), "{}", dot);
}

#[test]
fn failed_recreate_keeps_previous_plan() {
    init_logging();

    let mut render_graph = RenderGraph::new(RenderGraphConfig::default());
    assert!(render_graph.plan().is_none());

    let first = render_graph.recreate(&deferred_description()).unwrap();

    let result = render_graph.recreate(&cyclic_description());
    assert!(matches!(
        result,
        Err(RenderGraphError::CyclicDependency { .. })
    ));

    let current = render_graph.plan().unwrap();
    assert!(Arc::ptr_eq(&first, &current));
    assert_eq!(
        current.render_stage_names(),
        vec!["LightCull", "GeometryPass", "Lighting", "Composite"]
    );
}

#[test]
fn demo_render_graph_compiles() {
    init_logging();

    let config = RenderGraphConfig::default();
    let description = load_render_graph(
        include_str!("../../../demo/render_graphs/deferred.json"),
        &config,
    )
    .unwrap();
    let plan = RenderGraphPlan::new(&description, &config).unwrap();
    assert_eq!(
        plan.render_stage_names(),
        vec!["LIGHT_CULL", "GEOMETRY_PASS", "LIGHTING", "COMPOSITE"]
    );
    assert!(plan.warnings.is_empty());
}
