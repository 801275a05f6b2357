use lambda_api::LambdaQueueType;
use lambda_framework::graph::RenderGraphConfig;
use std::path::PathBuf;
use structopt::StructOpt;

/// Compiles a render graph description and reports the resulting pipeline.
///
/// # Examples
///
/// ```bash
/// demo render_graphs/deferred.json --dot deferred.dot
/// ```
#[derive(StructOpt, Debug, Clone)]
#[structopt(name = "demo")]
pub struct DemoArgs {
    /// Render graph description to compile
    #[structopt(parse(from_os_str))]
    pub description: PathBuf,

    /// Write the compiled pipeline as GraphViz DOT
    #[structopt(name = "dot", long, parse(from_os_str))]
    pub dot_file: Option<PathBuf>,

    /// Save the description again, with links regenerated
    #[structopt(name = "save", long, parse(from_os_str))]
    pub save_file: Option<PathBuf>,

    /// Print the compiled pipeline as json
    #[structopt(long)]
    pub json: bool,

    /// Keep attachment transitions as standalone barriers
    #[structopt(long)]
    pub no_fold: bool,

    /// Keep resources that no stage uses
    #[structopt(long)]
    pub keep_unused: bool,

    /// Let the compute queue own external resources between frames
    #[structopt(long)]
    pub external_on_compute: bool,
}

impl DemoArgs {
    pub fn render_graph_config(&self) -> RenderGraphConfig {
        let external_owner_queue = if self.external_on_compute {
            LambdaQueueType::Compute
        } else {
            LambdaQueueType::Graphics
        };

        RenderGraphConfig {
            external_owner_queue,
            fold_render_pass_transitions: !self.no_fold,
            remove_unused_resources: !self.keep_unused,
            ..Default::default()
        }
    }
}
