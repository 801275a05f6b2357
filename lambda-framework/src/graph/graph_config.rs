use lambda_api::{LambdaFormat, LambdaQueueType};

pub const BACK_BUFFER_NAME: &str = "BACK_BUFFER_TEXTURE";

/// Settings for compiling a render graph description into a plan
#[derive(Clone, Debug)]
pub struct RenderGraphConfig {
    /// The resource that is presented at the end of the frame
    pub back_buffer_name: String,
    /// Format used when the description doesn't declare the back buffer itself
    pub back_buffer_format: LambdaFormat,
    /// Queue that owns external resources while the graph isn't using them
    pub external_owner_queue: LambdaQueueType,
    /// Let render passes perform attachment layout transitions instead of standalone barriers
    pub fold_render_pass_transitions: bool,
    pub remove_unused_resources: bool,
    /// Reject descriptions where no render stage writes the back buffer. Turn off when something
    /// outside of the graph (an overlay renderer) draws the final image.
    pub require_back_buffer_output: bool,
}

impl Default for RenderGraphConfig {
    fn default() -> Self {
        RenderGraphConfig {
            back_buffer_name: BACK_BUFFER_NAME.to_string(),
            back_buffer_format: LambdaFormat::B8G8R8A8_UNORM,
            external_owner_queue: LambdaQueueType::Graphics,
            fold_render_pass_transitions: true,
            remove_unused_resources: true,
            require_back_buffer_output: true,
        }
    }
}
