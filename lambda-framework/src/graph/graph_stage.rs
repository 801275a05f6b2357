use lambda_api::{LambdaPipelineType, LambdaQueueType};
use serde::{Deserialize, Serialize};

/// The GPU-visible access mode a stage binds a resource with
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderGraphBindingType {
    None,
    AccelerationStructure,
    CombinedSampler,
    UnorderedAccessRead,
    UnorderedAccessWrite,
    UnorderedAccessReadWrite,
    ConstantBuffer,
    Attachment,
    Present,
}

impl RenderGraphBindingType {
    pub fn is_read_only(self) -> bool {
        match self {
            RenderGraphBindingType::AccelerationStructure
            | RenderGraphBindingType::CombinedSampler
            | RenderGraphBindingType::UnorderedAccessRead
            | RenderGraphBindingType::ConstantBuffer
            | RenderGraphBindingType::Present => true,
            _ => false,
        }
    }

    pub fn is_write(self) -> bool {
        match self {
            RenderGraphBindingType::UnorderedAccessWrite
            | RenderGraphBindingType::UnorderedAccessReadWrite
            | RenderGraphBindingType::Attachment => true,
            _ => false,
        }
    }
}

/// One stage's access to one resource, as authored
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGraphResourceStateDesc {
    pub resource_name: String,
    pub binding_type: RenderGraphBindingType,
    /// Only meaningful for attachments. A read only attachment (depth testing without depth
    /// writes, for example) consumes the resource instead of producing it.
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderGraphDrawType {
    SceneIndirect,
    FullscreenQuad,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderGraphGraphicsShaders {
    pub task_shader: String,
    pub mesh_shader: String,
    pub vertex_shader: String,
    pub geometry_shader: String,
    pub hull_shader: String,
    pub domain_shader: String,
    pub pixel_shader: String,
}

/// Pipeline-kind specific part of a stage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderGraphStagePipeline {
    Graphics {
        draw_type: RenderGraphDrawType,
        /// Name of a buffer resource holding indices
        #[serde(default)]
        index_buffer: Option<String>,
        /// Name of a buffer resource holding indirect draw arguments
        #[serde(default)]
        indirect_args_buffer: Option<String>,
        #[serde(default)]
        shaders: RenderGraphGraphicsShaders,
    },
    Compute {
        shader_name: String,
    },
    RayTracing {
        raygen_shader: String,
        #[serde(default)]
        miss_shaders: Vec<String>,
        #[serde(default)]
        closest_hit_shaders: Vec<String>,
    },
}

impl RenderGraphStagePipeline {
    pub fn pipeline_type(&self) -> LambdaPipelineType {
        match self {
            RenderGraphStagePipeline::Graphics { .. } => LambdaPipelineType::Graphics,
            RenderGraphStagePipeline::Compute { .. } => LambdaPipelineType::Compute,
            RenderGraphStagePipeline::RayTracing { .. } => LambdaPipelineType::RayTracing,
        }
    }

    /// Buffers the pipeline reads outside of its resource states
    pub fn draw_buffers(&self) -> impl Iterator<Item = &str> {
        let (index_buffer, indirect_args_buffer) = match self {
            RenderGraphStagePipeline::Graphics {
                index_buffer,
                indirect_args_buffer,
                ..
            } => (index_buffer.as_deref(), indirect_args_buffer.as_deref()),
            _ => (None, None),
        };

        index_buffer.into_iter().chain(indirect_args_buffer)
    }
}

fn default_enabled() -> bool {
    true
}

/// A named unit of GPU work and the resources it accesses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGraphStageDesc {
    pub name: String,
    pub pipeline: RenderGraphStagePipeline,
    #[serde(default)]
    pub resource_states: Vec<RenderGraphResourceStateDesc>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Recorded by engine code instead of the generic pipeline driven renderer
    #[serde(default)]
    pub custom_renderer: bool,
}

impl RenderGraphStageDesc {
    pub fn new(
        name: &str,
        pipeline: RenderGraphStagePipeline,
    ) -> Self {
        RenderGraphStageDesc {
            name: name.to_string(),
            pipeline,
            resource_states: Vec::default(),
            enabled: true,
            custom_renderer: false,
        }
    }

    pub fn graphics(
        name: &str,
        draw_type: RenderGraphDrawType,
    ) -> Self {
        Self::new(
            name,
            RenderGraphStagePipeline::Graphics {
                draw_type,
                index_buffer: None,
                indirect_args_buffer: None,
                shaders: Default::default(),
            },
        )
    }

    pub fn compute(
        name: &str,
        shader_name: &str,
    ) -> Self {
        Self::new(
            name,
            RenderGraphStagePipeline::Compute {
                shader_name: shader_name.to_string(),
            },
        )
    }

    pub fn ray_tracing(
        name: &str,
        raygen_shader: &str,
    ) -> Self {
        Self::new(
            name,
            RenderGraphStagePipeline::RayTracing {
                raygen_shader: raygen_shader.to_string(),
                miss_shaders: Vec::default(),
                closest_hit_shaders: Vec::default(),
            },
        )
    }

    pub fn with_resource_state(
        mut self,
        resource_name: &str,
        binding_type: RenderGraphBindingType,
    ) -> Self {
        self.resource_states.push(RenderGraphResourceStateDesc {
            resource_name: resource_name.to_string(),
            binding_type,
            read_only: false,
        });
        self
    }

    pub fn with_read_only_attachment(
        mut self,
        resource_name: &str,
    ) -> Self {
        self.resource_states.push(RenderGraphResourceStateDesc {
            resource_name: resource_name.to_string(),
            binding_type: RenderGraphBindingType::Attachment,
            read_only: true,
        });
        self
    }

    pub fn pipeline_type(&self) -> LambdaPipelineType {
        self.pipeline.pipeline_type()
    }

    pub fn queue_type(&self) -> LambdaQueueType {
        self.pipeline.pipeline_type().queue_type()
    }

    pub fn find_resource_state(
        &self,
        resource_name: &str,
    ) -> Option<&RenderGraphResourceStateDesc> {
        self.resource_states
            .iter()
            .find(|state| state.resource_name == resource_name)
    }
}
