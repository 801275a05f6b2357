#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Used to indicate which type of queue to use. Work and resources are owned by exactly one queue
/// at a time, moving them between queues requires an ownership transfer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum LambdaQueueType {
    /// Graphics queues generally supports all operations and are a safe default choice
    Graphics,

    /// Compute queues run compute and ray tracing dispatches
    Compute,
}

impl Default for LambdaQueueType {
    fn default() -> Self {
        LambdaQueueType::Graphics
    }
}

/// The kind of pipeline a unit of GPU work is recorded with
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum LambdaPipelineType {
    Graphics,
    Compute,
    RayTracing,
}

impl LambdaPipelineType {
    /// Ray tracing is dispatched alongside compute work
    pub fn queue_type(self) -> LambdaQueueType {
        match self {
            LambdaPipelineType::Graphics => LambdaQueueType::Graphics,
            LambdaPipelineType::Compute | LambdaPipelineType::RayTracing => {
                LambdaQueueType::Compute
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum LambdaTextureType {
    Texture2D,
    TextureCube,
}

impl Default for LambdaTextureType {
    fn default() -> Self {
        LambdaTextureType::Texture2D
    }
}

bitflags::bitflags! {
    /// How a texture will be used, determines what the device layer allocates it with
    #[derive(Default)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct LambdaTextureFlags: u32 {
        const NONE = 0;
        const RENDER_TARGET = 1<<0;
        const SHADER_RESOURCE = 1<<1;
        const UNORDERED_ACCESS = 1<<2;
        const DEPTH_STENCIL = 1<<3;
        /// Similar to vulkan's CUBE_COMPATIBLE image create flag
        const CUBE_COMPATIBLE = 1<<4;
    }
}

bitflags::bitflags! {
    /// Which views need to be created for a texture
    #[derive(Default)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct LambdaTextureViewFlags: u32 {
        const NONE = 0;
        const RENDER_TARGET = 1<<0;
        const SHADER_RESOURCE = 1<<1;
        const UNORDERED_ACCESS = 1<<2;
        const DEPTH_STENCIL = 1<<3;
    }
}

bitflags::bitflags! {
    /// How a buffer will be used
    #[derive(Default)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct LambdaBufferFlags: u32 {
        const NONE = 0;
        const CONSTANT_BUFFER = 1<<0;
        const UNORDERED_ACCESS_BUFFER = 1<<1;
        const INDEX_BUFFER = 1<<2;
        const INDIRECT_BUFFER = 1<<3;
    }
}
