#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Texture formats a render graph resource may be declared with
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum LambdaFormat {
    UNDEFINED,
    R8_UNORM,
    R16_UNORM,
    R16_SFLOAT,
    R8G8B8A8_UNORM,
    R8G8B8A8_SNORM,
    B8G8R8A8_UNORM,
    R16G16_SFLOAT,
    R32G32_SFLOAT,
    R11G11B10_SFLOAT,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_UINT,
    R32G32B32A32_SFLOAT,
    D24_UNORM_S8_UINT,
}

impl Default for LambdaFormat {
    fn default() -> Self {
        LambdaFormat::R8G8B8A8_UNORM
    }
}

impl LambdaFormat {
    pub fn has_depth(self) -> bool {
        match self {
            LambdaFormat::D24_UNORM_S8_UINT => true,
            _ => false,
        }
    }

    pub fn has_stencil(self) -> bool {
        match self {
            LambdaFormat::D24_UNORM_S8_UINT => true,
            _ => false,
        }
    }

    pub fn has_depth_or_stencil(self) -> bool {
        self.has_depth() || self.has_stencil()
    }
}
