use super::*;
use fnv::{FnvHashMap, FnvHashSet};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct RenderGraphLinkId(pub(super) usize);

/// Producer -> consumer edge between two resource states of different stages
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderGraphLink {
    pub src: RenderGraphResourceStateId,
    pub dst: RenderGraphResourceStateId,
}

/// Directed graph of stages, built from the links between their resource states
pub struct RenderGraphDependencies {
    pub(super) links: Vec<RenderGraphLink>,
    pub(super) input_links: FnvHashMap<RenderGraphResourceStateId, Vec<RenderGraphLinkId>>,
    pub(super) output_links: FnvHashMap<RenderGraphResourceStateId, Vec<RenderGraphLinkId>>,
    // Inputs reading the value of a previous frame. These never create an edge.
    pub(super) temporal_inputs: FnvHashSet<RenderGraphResourceStateId>,
    pub(super) parents: Vec<Vec<RenderGraphStageId>>,
    pub(super) children: Vec<Vec<RenderGraphStageId>>,
}

impl RenderGraphDependencies {
    pub fn links(&self) -> &[RenderGraphLink] {
        &self.links
    }

    pub fn link(
        &self,
        link_id: RenderGraphLinkId,
    ) -> RenderGraphLink {
        self.links[link_id.0]
    }

    pub fn input_links(
        &self,
        resource_state: RenderGraphResourceStateId,
    ) -> &[RenderGraphLinkId] {
        self.input_links
            .get(&resource_state)
            .map(|links| links.as_slice())
            .unwrap_or(&[])
    }

    pub fn output_links(
        &self,
        resource_state: RenderGraphResourceStateId,
    ) -> &[RenderGraphLinkId] {
        self.output_links
            .get(&resource_state)
            .map(|links| links.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_temporal_input(
        &self,
        resource_state: RenderGraphResourceStateId,
    ) -> bool {
        self.temporal_inputs.contains(&resource_state)
    }

    pub fn parents(
        &self,
        stage: RenderGraphStageId,
    ) -> &[RenderGraphStageId] {
        &self.parents[stage.0]
    }

    pub fn children(
        &self,
        stage: RenderGraphStageId,
    ) -> &[RenderGraphStageId] {
        &self.children[stage.0]
    }

    /// True if `to` can be reached from `from` by following child edges
    pub fn is_descendant(
        &self,
        from: RenderGraphStageId,
        to: RenderGraphStageId,
    ) -> bool {
        let mut visited = vec![false; self.children.len()];
        let mut stack = vec![from];

        while let Some(stage) = stack.pop() {
            if stage == to {
                return true;
            }

            if visited[stage.0] {
                continue;
            }
            visited[stage.0] = true;

            stack.extend(self.children[stage.0].iter().copied());
        }

        false
    }

    fn add_edge(
        &mut self,
        parent: RenderGraphStageId,
        child: RenderGraphStageId,
    ) {
        if !self.children[parent.0].contains(&child) {
            self.children[parent.0].push(child);
        }

        if !self.parents[child.0].contains(&parent) {
            self.parents[child.0].push(parent);
        }
    }

    fn add_link(
        &mut self,
        src: RenderGraphResourceStateId,
        dst: RenderGraphResourceStateId,
    ) {
        let link_id = RenderGraphLinkId(self.links.len());
        self.links.push(RenderGraphLink { src, dst });
        self.output_links.entry(src).or_default().push(link_id);
        self.input_links.entry(dst).or_default().push(link_id);
    }
}

//
// Connect every input to the one output of another stage that writes the same resource. Inputs on a
// resource the stage also writes, or on a resource flagged temporal, read last frame's value and
// are only tracked. Every edge is checked against the edges already accepted so a cycle is
// rejected here rather than corrupting the sort.
//
#[profiling::function]
pub fn build_dependencies(
    classified: &RenderGraphClassifiedStages,
    registry: &RenderGraphResourceRegistry,
) -> RenderGraphResult<RenderGraphDependencies> {
    let stage_count = classified.stage_count();
    let mut dependencies = RenderGraphDependencies {
        links: Vec::default(),
        input_links: FnvHashMap::default(),
        output_links: FnvHashMap::default(),
        temporal_inputs: FnvHashSet::default(),
        parents: vec![Vec::default(); stage_count],
        children: vec![Vec::default(); stage_count],
    };

    // Producers of each resource, in declaration order
    let mut producers: FnvHashMap<RenderGraphResourceId, Vec<RenderGraphResourceStateId>> =
        FnvHashMap::default();
    for stage_id in classified.stage_ids() {
        for &output in &classified.stage(stage_id).outputs {
            producers
                .entry(classified.resource_state(output).resource)
                .or_default()
                .push(output);
        }
    }

    for stage_id in classified.stage_ids() {
        let stage = classified.stage(stage_id);

        let inputs = stage
            .inputs
            .iter()
            .map(|&input| (input, false))
            .chain(stage.external_inputs.iter().map(|&input| (input, true)));

        for (input, is_external) in inputs {
            let resource = classified.resource_state(input).resource;
            let resource_desc = registry.resource(resource);

            let written_by_same_stage = stage.outputs.iter().any(|&output| {
                classified.resource_state(output).resource == resource
            });

            if written_by_same_stage || resource_desc.temporal {
                log::trace!(
                    "  Input {} of {} is temporal",
                    resource_desc.name,
                    stage.name
                );
                dependencies.temporal_inputs.insert(input);
                continue;
            }

            let resource_producers = producers
                .get(&resource)
                .map(|producers| producers.as_slice())
                .unwrap_or(&[]);

            if resource_producers.is_empty() {
                // External resources are allowed to arrive from outside the graph
                if is_external {
                    continue;
                }

                log::error!(
                    "Input {} of render stage {} has no connected output",
                    resource_desc.name,
                    stage.name
                );
                return Err(RenderGraphError::UnconnectedInput {
                    resource: resource_desc.name.clone(),
                    stage: stage.name.clone(),
                });
            }

            // Which of several writers an input reads from is ambiguous
            if resource_producers.len() > 1 {
                let producers: Vec<String> = resource_producers
                    .iter()
                    .map(|&output| {
                        let producer_stage = classified.resource_state(output).stage;
                        classified.stage(producer_stage).name.clone()
                    })
                    .collect();
                log::error!(
                    "Input {} of render stage {} is written by {}",
                    resource_desc.name,
                    stage.name,
                    producers.join(", ")
                );
                return Err(RenderGraphError::MultipleProducers {
                    resource: resource_desc.name.clone(),
                    stage: stage.name.clone(),
                    producers,
                });
            }

            let output = resource_producers[0];
            let producer_stage = classified.resource_state(output).stage;

            if dependencies.is_descendant(stage_id, producer_stage) {
                let ancestor = classified.stage(producer_stage).name.clone();
                let descendant = stage.name.clone();
                log::error!(
                    "Cyclic render stage dependency detected between {} and {}",
                    ancestor,
                    descendant
                );
                return Err(RenderGraphError::CyclicDependency {
                    ancestor,
                    descendant,
                });
            }

            log::trace!(
                "  Link {} {} -> {}",
                resource_desc.name,
                classified.stage(producer_stage).name,
                stage.name
            );
            dependencies.add_link(output, input);
            dependencies.add_edge(producer_stage, stage_id);
        }
    }

    Ok(dependencies)
}
