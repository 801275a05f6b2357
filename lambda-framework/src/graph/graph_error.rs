use super::RenderGraphBindingType;
use std::path::PathBuf;
use std::sync::Arc;

pub type RenderGraphResult<T> = Result<T, RenderGraphError>;

/// Errors that abort compiling a render graph. Nothing compiled from a description that produced
/// one of these is ever published.
#[derive(Debug, Clone)]
pub enum RenderGraphError {
    /// A non-temporal, non-external input that no stage produces
    UnconnectedInput { resource: String, stage: String },
    /// More than one output writes the resource an input reads, so the input can't be linked
    MultipleProducers {
        resource: String,
        stage: String,
        producers: Vec<String>,
    },
    /// No render stage writes the back buffer, the frame would present an image nobody drew
    BackBufferNotWritten { resource: String },
    /// Adding the producer -> consumer edge between these stages would close a cycle
    CyclicDependency { ancestor: String, descendant: String },
    /// The binding type can't be used with this resource/stage combination
    UnclassifiableBinding {
        stage: String,
        resource: String,
        binding_type: RenderGraphBindingType,
    },
    MalformedDescription(String),
    /// Reading or writing a render graph file failed
    IoError {
        path: PathBuf,
        error: Arc<std::io::Error>,
    },
    JsonError(Arc<serde_json::Error>),
}

impl RenderGraphError {
    pub fn malformed<T: Into<String>>(message: T) -> Self {
        RenderGraphError::MalformedDescription(message.into())
    }

    pub fn io<P: Into<PathBuf>>(
        path: P,
        error: std::io::Error,
    ) -> Self {
        RenderGraphError::IoError {
            path: path.into(),
            error: Arc::new(error),
        }
    }

    /// Structural errors are problems with the description itself rather than with I/O
    pub fn is_structural(&self) -> bool {
        match self {
            RenderGraphError::UnconnectedInput { .. }
            | RenderGraphError::MultipleProducers { .. }
            | RenderGraphError::BackBufferNotWritten { .. }
            | RenderGraphError::CyclicDependency { .. }
            | RenderGraphError::UnclassifiableBinding { .. }
            | RenderGraphError::MalformedDescription(_) => true,
            RenderGraphError::IoError { .. } | RenderGraphError::JsonError(_) => false,
        }
    }
}

impl std::error::Error for RenderGraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            RenderGraphError::UnconnectedInput { .. } => None,
            RenderGraphError::MultipleProducers { .. } => None,
            RenderGraphError::BackBufferNotWritten { .. } => None,
            RenderGraphError::CyclicDependency { .. } => None,
            RenderGraphError::UnclassifiableBinding { .. } => None,
            RenderGraphError::MalformedDescription(_) => None,
            RenderGraphError::IoError { ref error, .. } => Some(&**error),
            RenderGraphError::JsonError(ref e) => Some(&**e),
        }
    }
}

impl core::fmt::Display for RenderGraphError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            RenderGraphError::UnconnectedInput {
                ref resource,
                ref stage,
            } => write!(
                fmt,
                "Input \"{}\" of render stage \"{}\" has no connected output",
                resource, stage
            ),
            RenderGraphError::MultipleProducers {
                ref resource,
                ref stage,
                ref producers,
            } => write!(
                fmt,
                "Input \"{}\" of render stage \"{}\" is written by more than one render stage: {}",
                resource,
                stage,
                producers.join(", ")
            ),
            RenderGraphError::BackBufferNotWritten { ref resource } => write!(
                fmt,
                "No render stage writes the back buffer \"{}\"",
                resource
            ),
            RenderGraphError::CyclicDependency {
                ref ancestor,
                ref descendant,
            } => write!(
                fmt,
                "Cyclic render stage dependency detected between \"{}\" and \"{}\"",
                ancestor, descendant
            ),
            RenderGraphError::UnclassifiableBinding {
                ref stage,
                ref resource,
                binding_type,
            } => write!(
                fmt,
                "Binding type {:?} of resource \"{}\" in render stage \"{}\" can not be classified",
                binding_type, resource, stage
            ),
            RenderGraphError::MalformedDescription(ref e) => {
                write!(fmt, "Malformed render graph description: {}", e)
            }
            RenderGraphError::IoError {
                ref path,
                ref error,
            } => write!(fmt, "{}: {}", path.display(), error),
            RenderGraphError::JsonError(ref e) => e.fmt(fmt),
        }
    }
}

impl From<serde_json::Error> for RenderGraphError {
    fn from(error: serde_json::Error) -> Self {
        // Valid json that doesn't fit the description types means the description is malformed
        match error.classify() {
            serde_json::error::Category::Data => {
                RenderGraphError::MalformedDescription(error.to_string())
            }
            _ => RenderGraphError::JsonError(Arc::new(error)),
        }
    }
}

/// Problems found while compiling that still leave a runnable (if less optimal) plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderGraphWarning {
    /// The attachment has no later user, so the render pass can't fold its final transition and
    /// the surrounding barriers are kept as they are
    AttachmentWithoutNextUser { resource: String, stage: String },
}

impl core::fmt::Display for RenderGraphWarning {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            RenderGraphWarning::AttachmentWithoutNextUser {
                ref resource,
                ref stage,
            } => write!(
                fmt,
                "Resource \"{}\" is used as an attachment in render stage \"{}\" but is not used in later stages",
                resource, stage
            ),
        }
    }
}
