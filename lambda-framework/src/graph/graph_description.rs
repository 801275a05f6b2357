use super::*;
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

/// Declarative render graph: the resources that exist and the stages that use them. This is what
/// gets edited and saved. Everything else is derived from it by compiling a `RenderGraphPlan`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGraphDescription {
    #[serde(default)]
    pub resources: Vec<RenderGraphResourceDesc>,
    #[serde(default)]
    pub render_stages: Vec<RenderGraphStageDesc>,
}

impl RenderGraphDescription {
    pub fn add_resource(
        &mut self,
        resource: RenderGraphResourceDesc,
    ) -> &mut Self {
        self.resources.push(resource);
        self
    }

    pub fn add_render_stage(
        &mut self,
        render_stage: RenderGraphStageDesc,
    ) -> &mut Self {
        self.render_stages.push(render_stage);
        self
    }

    pub fn find_resource(
        &self,
        name: &str,
    ) -> Option<&RenderGraphResourceDesc> {
        self.resources.iter().find(|resource| resource.name == name)
    }

    pub fn find_render_stage(
        &self,
        name: &str,
    ) -> Option<&RenderGraphStageDesc> {
        self.render_stages.iter().find(|stage| stage.name == name)
    }

    /// Checks everything that can be checked without building the graph: names are present and
    /// unique, and every name a stage refers to is a declared resource (or the back buffer).
    pub fn validate(
        &self,
        config: &RenderGraphConfig,
    ) -> RenderGraphResult<RenderGraphResourceRegistry> {
        let registry = RenderGraphResourceRegistry::new(&self.resources, config)?;

        let mut stage_names = FnvHashSet::default();
        for render_stage in &self.render_stages {
            if render_stage.name.is_empty() {
                return Err(RenderGraphError::malformed("A render stage has an empty name"));
            }

            if !stage_names.insert(render_stage.name.as_str()) {
                return Err(RenderGraphError::malformed(format!(
                    "Multiple render stages with the same name are not allowed, name: \"{}\"",
                    render_stage.name
                )));
            }

            for resource_state in &render_stage.resource_states {
                if resource_state.resource_name.is_empty() {
                    return Err(RenderGraphError::malformed(format!(
                        "Render stage \"{}\" has a resource state without a resource name",
                        render_stage.name
                    )));
                }

                if registry.find(&resource_state.resource_name).is_none() {
                    return Err(RenderGraphError::malformed(format!(
                        "Render stage \"{}\" uses undeclared resource \"{}\"",
                        render_stage.name, resource_state.resource_name
                    )));
                }
            }

            for buffer_name in render_stage.pipeline.draw_buffers() {
                let is_buffer = registry
                    .find(buffer_name)
                    .map(|id| registry.resource(id).resource_type == RenderGraphResourceType::Buffer)
                    .unwrap_or(false);

                if !is_buffer {
                    return Err(RenderGraphError::malformed(format!(
                        "Render stage \"{}\" draws with \"{}\" which is not a declared buffer",
                        render_stage.name, buffer_name
                    )));
                }
            }
        }

        Ok(registry)
    }
}
