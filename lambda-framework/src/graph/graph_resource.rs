use super::{RenderGraphConfig, RenderGraphError, RenderGraphResult};
use fnv::FnvHashMap;
use lambda_api::{
    LambdaBufferFlags, LambdaFormat, LambdaTextureFlags, LambdaTextureType, LambdaTextureViewFlags,
};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderGraphResourceType {
    Texture,
    Buffer,
    AccelerationStructure,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGraphTextureParams {
    #[serde(default)]
    pub format: LambdaFormat,
    #[serde(default)]
    pub texture_type: LambdaTextureType,
}

fn default_sub_resource_count() -> u32 {
    1
}

/// A named GPU-visible object tracked by the graph. The name is the key every stage uses to refer
/// to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGraphResourceDesc {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: RenderGraphResourceType,
    /// Array layers or distinct elements, at least 1
    #[serde(default = "default_sub_resource_count")]
    pub sub_resource_count: u32,
    #[serde(default)]
    pub sub_resource_array: bool,
    /// Lifetime is owned outside of the graph
    #[serde(default)]
    pub external: bool,
    /// Value persists and is read again next frame
    #[serde(default)]
    pub temporal: bool,
    #[serde(default)]
    pub texture: RenderGraphTextureParams,
}

impl RenderGraphResourceDesc {
    fn new(
        name: &str,
        resource_type: RenderGraphResourceType,
    ) -> Self {
        RenderGraphResourceDesc {
            name: name.to_string(),
            resource_type,
            sub_resource_count: 1,
            sub_resource_array: false,
            external: false,
            temporal: false,
            texture: Default::default(),
        }
    }

    pub fn texture(
        name: &str,
        format: LambdaFormat,
    ) -> Self {
        let mut resource = Self::new(name, RenderGraphResourceType::Texture);
        resource.texture.format = format;
        resource
    }

    pub fn buffer(name: &str) -> Self {
        Self::new(name, RenderGraphResourceType::Buffer)
    }

    pub fn acceleration_structure(name: &str) -> Self {
        Self::new(name, RenderGraphResourceType::AccelerationStructure)
    }

    pub fn with_external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn with_temporal(mut self) -> Self {
        self.temporal = true;
        self
    }

    pub fn with_texture_type(
        mut self,
        texture_type: LambdaTextureType,
    ) -> Self {
        self.texture.texture_type = texture_type;
        self
    }

    pub fn with_sub_resources(
        mut self,
        sub_resource_count: u32,
        sub_resource_array: bool,
    ) -> Self {
        self.sub_resource_count = sub_resource_count;
        self.sub_resource_array = sub_resource_array;
        self
    }

    pub(super) fn back_buffer(config: &RenderGraphConfig) -> Self {
        Self::texture(&config.back_buffer_name, config.back_buffer_format)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct RenderGraphResourceId(pub(super) usize);

/// Flat table of every resource a compile may touch. The back buffer is always present, even if
/// the description never declares it.
pub struct RenderGraphResourceRegistry {
    resources: Vec<RenderGraphResourceDesc>,
    resources_by_name: FnvHashMap<String, RenderGraphResourceId>,
    back_buffer: RenderGraphResourceId,
}

impl RenderGraphResourceRegistry {
    pub fn new(
        resources: &[RenderGraphResourceDesc],
        config: &RenderGraphConfig,
    ) -> RenderGraphResult<Self> {
        let mut registry_resources = Vec::with_capacity(resources.len() + 1);
        let mut resources_by_name = FnvHashMap::default();

        for resource in resources {
            if resource.name.is_empty() {
                return Err(RenderGraphError::malformed("A resource has an empty name"));
            }

            if resource.sub_resource_count == 0 {
                return Err(RenderGraphError::malformed(format!(
                    "Resource \"{}\" has a sub resource count of 0",
                    resource.name
                )));
            }

            let id = RenderGraphResourceId(registry_resources.len());
            if resources_by_name.insert(resource.name.clone(), id).is_some() {
                return Err(RenderGraphError::malformed(format!(
                    "Multiple resources with the same name are not allowed, name: \"{}\"",
                    resource.name
                )));
            }

            registry_resources.push(resource.clone());
        }

        let back_buffer = match resources_by_name.get(&config.back_buffer_name) {
            Some(&id) => {
                if registry_resources[id.0].resource_type != RenderGraphResourceType::Texture {
                    return Err(RenderGraphError::malformed(format!(
                        "The back buffer \"{}\" must be a texture",
                        config.back_buffer_name
                    )));
                }
                id
            }
            None => {
                let id = RenderGraphResourceId(registry_resources.len());
                registry_resources.push(RenderGraphResourceDesc::back_buffer(config));
                resources_by_name.insert(config.back_buffer_name.clone(), id);
                id
            }
        };

        Ok(RenderGraphResourceRegistry {
            resources: registry_resources,
            resources_by_name,
            back_buffer,
        })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resource(
        &self,
        id: RenderGraphResourceId,
    ) -> &RenderGraphResourceDesc {
        &self.resources[id.0]
    }

    pub fn find(
        &self,
        name: &str,
    ) -> Option<RenderGraphResourceId> {
        self.resources_by_name.get(name).copied()
    }

    pub fn back_buffer(&self) -> RenderGraphResourceId {
        self.back_buffer
    }

    pub fn is_back_buffer(
        &self,
        id: RenderGraphResourceId,
    ) -> bool {
        self.back_buffer == id
    }

    pub fn iter(&self) -> impl Iterator<Item = (RenderGraphResourceId, &RenderGraphResourceDesc)> {
        self.resources
            .iter()
            .enumerate()
            .map(|(index, resource)| (RenderGraphResourceId(index), resource))
    }
}

/// A resource as the execution engine needs to create it, with usage flags gathered from every
/// stage that binds it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderGraphResolvedResourceDesc {
    pub name: String,
    pub resource_type: RenderGraphResourceType,
    pub sub_resource_count: u32,
    pub sub_resource_array: bool,
    pub external: bool,
    pub temporal: bool,
    pub texture: RenderGraphTextureParams,
    pub texture_flags: LambdaTextureFlags,
    pub texture_view_flags: LambdaTextureViewFlags,
    pub buffer_flags: LambdaBufferFlags,
}

impl RenderGraphResolvedResourceDesc {
    pub(super) fn new(resource: &RenderGraphResourceDesc) -> Self {
        let mut texture_flags = LambdaTextureFlags::empty();
        if resource.resource_type == RenderGraphResourceType::Texture
            && resource.texture.texture_type == LambdaTextureType::TextureCube
        {
            texture_flags |= LambdaTextureFlags::CUBE_COMPATIBLE;
        }

        RenderGraphResolvedResourceDesc {
            name: resource.name.clone(),
            resource_type: resource.resource_type,
            sub_resource_count: resource.sub_resource_count,
            sub_resource_array: resource.sub_resource_array,
            external: resource.external,
            temporal: resource.temporal,
            texture: resource.texture.clone(),
            texture_flags,
            texture_view_flags: LambdaTextureViewFlags::empty(),
            buffer_flags: LambdaBufferFlags::empty(),
        }
    }
}
