use super::*;
use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hands out the node, attribute and link ids of saved documents. Owned by whoever saves, so
/// separate documents (or separate tests) never share counters.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_node_id: u32,
    next_attribute_id: u32,
    next_link_id: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn allocate_node(&mut self) -> u32 {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    /// Every resource state owns a pair of attributes: the even one is its input side, the odd
    /// one its output side
    pub fn allocate_attribute_pair(&mut self) -> u32 {
        let id = self.next_attribute_id;
        self.next_attribute_id += 2;
        id
    }

    pub fn allocate_link(&mut self) -> u32 {
        let id = self.next_link_id;
        self.next_link_id += 1;
        id
    }
}

#[derive(Serialize, Deserialize)]
struct SavedResourceState {
    resource_name: String,
    binding_type: RenderGraphBindingType,
    #[serde(default)]
    read_only: bool,
    attribute_index: u32,
    #[serde(default)]
    input_link_index: Option<u32>,
    #[serde(default)]
    output_link_indices: Vec<u32>,
}

#[derive(Serialize, Deserialize)]
struct SavedRenderStage {
    name: String,
    #[serde(default)]
    node_index: u32,
    pipeline: RenderGraphStagePipeline,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    custom_renderer: bool,
    #[serde(default)]
    resource_states: Vec<SavedResourceState>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
struct SavedLink {
    link_index: u32,
    src_attribute_index: u32,
    dst_attribute_index: u32,
}

#[derive(Serialize, Deserialize)]
struct SavedRenderGraph {
    #[serde(default)]
    resources: Vec<RenderGraphResourceDesc>,
    #[serde(default)]
    render_stages: Vec<SavedRenderStage>,
    // Hand-written documents may leave the links out entirely, they are derived on load
    #[serde(default)]
    links: Option<Vec<SavedLink>>,
}

// Links are derived from the description. One that doesn't compile is still saved, just
// without links.
fn find_links(
    description: &RenderGraphDescription,
    config: &RenderGraphConfig,
) -> RenderGraphResult<Vec<RenderGraphLink>> {
    let registry = description.validate(config)?;
    let classified = classify_stages(description, &registry)?;
    let dependencies = build_dependencies(&classified, &registry)?;
    Ok(dependencies.links().to_vec())
}

#[profiling::function]
pub fn save_render_graph(
    description: &RenderGraphDescription,
    config: &RenderGraphConfig,
    id_allocator: &mut IdAllocator,
) -> RenderGraphResult<String> {
    let links = find_links(description, config).unwrap_or_else(|e| {
        log::warn!("Saving render graph without links: {}", e);
        Vec::default()
    });

    // Resource states are numbered in declaration order, the same order the classifier stores
    // them in
    let mut render_stages = Vec::with_capacity(description.render_stages.len());
    let mut attribute_bases = Vec::default();
    for render_stage in &description.render_stages {
        let resource_states = render_stage
            .resource_states
            .iter()
            .map(|resource_state| {
                let attribute_index = id_allocator.allocate_attribute_pair();
                attribute_bases.push(attribute_index);
                SavedResourceState {
                    resource_name: resource_state.resource_name.clone(),
                    binding_type: resource_state.binding_type,
                    read_only: resource_state.read_only,
                    attribute_index,
                    input_link_index: None,
                    output_link_indices: Vec::default(),
                }
            })
            .collect();

        render_stages.push(SavedRenderStage {
            name: render_stage.name.clone(),
            node_index: id_allocator.allocate_node(),
            pipeline: render_stage.pipeline.clone(),
            enabled: render_stage.enabled,
            custom_renderer: render_stage.custom_renderer,
            resource_states,
        });
    }

    let mut saved_links = Vec::with_capacity(links.len());
    for link in links {
        let link_index = id_allocator.allocate_link();
        saved_links.push(SavedLink {
            link_index,
            src_attribute_index: attribute_bases[link.src.0] + 1,
            dst_attribute_index: attribute_bases[link.dst.0],
        });

        for render_stage in &mut render_stages {
            for resource_state in &mut render_stage.resource_states {
                if resource_state.attribute_index == attribute_bases[link.src.0] {
                    resource_state.output_link_indices.push(link_index);
                }
                if resource_state.attribute_index == attribute_bases[link.dst.0]
                    && resource_state.input_link_index.is_none()
                {
                    resource_state.input_link_index = Some(link_index);
                }
            }
        }
    }

    let saved = SavedRenderGraph {
        resources: description.resources.clone(),
        render_stages,
        links: Some(saved_links),
    };

    Ok(serde_json::to_string_pretty(&saved)?)
}

//
// The links of a document are redundant with its resource names. Derive them again and require
// the document to agree, so an edited link list can't silently disagree with what gets compiled.
// A description that doesn't compile was saved without links and is left for the compiler to
// report.
//
fn verify_saved_links(
    description: &RenderGraphDescription,
    config: &RenderGraphConfig,
    attribute_indices: &[u32],
    saved_links: &[SavedLink],
) -> RenderGraphResult<()> {
    let links = match find_links(description, config) {
        Ok(links) => links,
        Err(e) => {
            log::warn!("Links of the loaded render graph can't be verified: {}", e);
            return Ok(());
        }
    };

    let derived: FnvHashSet<(u32, u32)> = links
        .iter()
        .map(|link| {
            (
                attribute_indices[link.src.0] + 1,
                attribute_indices[link.dst.0],
            )
        })
        .collect();
    let saved: FnvHashSet<(u32, u32)> = saved_links
        .iter()
        .map(|link| (link.src_attribute_index, link.dst_attribute_index))
        .collect();

    if saved.len() != saved_links.len() {
        return Err(RenderGraphError::malformed(
            "Multiple links connect the same pair of attributes",
        ));
    }

    if let Some(&(src, dst)) = derived.difference(&saved).next() {
        return Err(RenderGraphError::malformed(format!(
            "Missing link from attribute {} to attribute {}",
            src, dst
        )));
    }

    if let Some(&(src, dst)) = saved.difference(&derived).next() {
        return Err(RenderGraphError::malformed(format!(
            "Link from attribute {} to attribute {} doesn't connect a producer to its consumer",
            src, dst
        )));
    }

    Ok(())
}

#[profiling::function]
pub fn load_render_graph(
    json: &str,
    config: &RenderGraphConfig,
) -> RenderGraphResult<RenderGraphDescription> {
    let saved: SavedRenderGraph = serde_json::from_str(json)?;
    let saved_links = saved.links.as_deref().unwrap_or(&[]);

    // attribute pair base -> (stage name, resource name)
    let mut resource_states_by_attribute = FnvHashMap::default();
    for render_stage in &saved.render_stages {
        for resource_state in &render_stage.resource_states {
            if resource_state.attribute_index % 2 != 0 {
                return Err(RenderGraphError::malformed(format!(
                    "Resource state \"{}\" of render stage \"{}\" has odd attribute index {}",
                    resource_state.resource_name, render_stage.name, resource_state.attribute_index
                )));
            }

            let previous = resource_states_by_attribute.insert(
                resource_state.attribute_index,
                (
                    render_stage.name.as_str(),
                    resource_state.resource_name.as_str(),
                ),
            );
            if previous.is_some() {
                return Err(RenderGraphError::malformed(format!(
                    "Attribute index {} is used by multiple resource states",
                    resource_state.attribute_index
                )));
            }
        }
    }

    let mut links_by_index = FnvHashMap::default();
    for link in saved_links {
        if link.src_attribute_index % 2 != 1 || link.dst_attribute_index % 2 != 0 {
            return Err(RenderGraphError::malformed(format!(
                "Link {} must run from an output attribute to an input attribute",
                link.link_index
            )));
        }

        let src = resource_states_by_attribute.get(&(link.src_attribute_index - 1));
        let dst = resource_states_by_attribute.get(&link.dst_attribute_index);
        let (src, dst) = match (src, dst) {
            (Some(src), Some(dst)) => (src, dst),
            _ => {
                return Err(RenderGraphError::malformed(format!(
                    "Link {} refers to an attribute that doesn't exist",
                    link.link_index
                )))
            }
        };

        if src.1 != dst.1 {
            return Err(RenderGraphError::malformed(format!(
                "Link {} connects different resources \"{}\" and \"{}\"",
                link.link_index, src.1, dst.1
            )));
        }

        if links_by_index.insert(link.link_index, link).is_some() {
            return Err(RenderGraphError::malformed(format!(
                "Link index {} is used multiple times",
                link.link_index
            )));
        }
    }

    // The per state link references have to agree with the link list
    let mut referenced_links = FnvHashSet::default();
    for render_stage in &saved.render_stages {
        for resource_state in &render_stage.resource_states {
            if let Some(input_link_index) = resource_state.input_link_index {
                let matches = links_by_index
                    .get(&input_link_index)
                    .map(|link| link.dst_attribute_index == resource_state.attribute_index)
                    .unwrap_or(false);
                if !matches {
                    return Err(RenderGraphError::malformed(format!(
                        "Input link {} of \"{}\" in render stage \"{}\" is not a link into it",
                        input_link_index, resource_state.resource_name, render_stage.name
                    )));
                }
                referenced_links.insert(input_link_index);
            }

            for &output_link_index in &resource_state.output_link_indices {
                let matches = links_by_index
                    .get(&output_link_index)
                    .map(|link| link.src_attribute_index == resource_state.attribute_index + 1)
                    .unwrap_or(false);
                if !matches {
                    return Err(RenderGraphError::malformed(format!(
                        "Output link {} of \"{}\" in render stage \"{}\" is not a link out of it",
                        output_link_index, resource_state.resource_name, render_stage.name
                    )));
                }
                referenced_links.insert(output_link_index);
            }
        }
    }

    log::trace!(
        "Loaded render graph: {} resources, {} render stages, {} links ({} referenced by resource states)",
        saved.resources.len(),
        saved.render_stages.len(),
        saved_links.len(),
        referenced_links.len()
    );

    // Attribute indices in declaration order, the order the classifier numbers resource states in
    let attribute_indices: Vec<u32> = saved
        .render_stages
        .iter()
        .flat_map(|render_stage| {
            render_stage
                .resource_states
                .iter()
                .map(|resource_state| resource_state.attribute_index)
        })
        .collect();

    let render_stages = saved
        .render_stages
        .into_iter()
        .map(|render_stage| RenderGraphStageDesc {
            name: render_stage.name,
            pipeline: render_stage.pipeline,
            resource_states: render_stage
                .resource_states
                .into_iter()
                .map(|resource_state| RenderGraphResourceStateDesc {
                    resource_name: resource_state.resource_name,
                    binding_type: resource_state.binding_type,
                    read_only: resource_state.read_only,
                })
                .collect(),
            enabled: render_stage.enabled,
            custom_renderer: render_stage.custom_renderer,
        })
        .collect();

    let description = RenderGraphDescription {
        resources: saved.resources,
        render_stages,
    };

    if let Some(saved_links) = &saved.links {
        verify_saved_links(&description, config, &attribute_indices, saved_links)?;
    }

    Ok(description)
}

pub fn save_to_file<P: AsRef<Path>>(
    path: P,
    description: &RenderGraphDescription,
    config: &RenderGraphConfig,
    id_allocator: &mut IdAllocator,
) -> RenderGraphResult<()> {
    let path = path.as_ref();
    log::debug!("Saving render graph to {}", path.display());
    let json = save_render_graph(description, config, id_allocator)?;
    std::fs::write(path, json).map_err(|e| RenderGraphError::io(path, e))?;
    Ok(())
}

pub fn load_from_file<P: AsRef<Path>>(
    path: P,
    config: &RenderGraphConfig,
) -> RenderGraphResult<RenderGraphDescription> {
    let path = path.as_ref();
    log::debug!("Loading render graph from {}", path.display());
    let json = std::fs::read_to_string(path).map_err(|e| RenderGraphError::io(path, e))?;
    load_render_graph(&json, config)
}
