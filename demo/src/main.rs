mod demo_args;
use demo_args::DemoArgs;

use lambda_framework::graph::{
    load_from_file, save_to_file, write_graph_viz_to_file, IdAllocator, RenderGraph,
    RenderGraphPipelineStageType, RenderGraphResult,
};
use structopt::StructOpt;

pub fn logging_init() {
    #[cfg(not(debug_assertions))]
    let log_level = log::LevelFilter::Info;
    #[cfg(debug_assertions)]
    let log_level = log::LevelFilter::Debug;

    // Setup logging
    env_logger::Builder::from_default_env()
        .default_format_timestamp_nanos(true)
        .filter_module("lambda_framework::graph", log::LevelFilter::Debug)
        .filter_module(
            "lambda_framework::graph::graph_plan",
            log::LevelFilter::Info,
        )
        .filter_module("demo", log::LevelFilter::Debug)
        .filter_level(log_level)
        .init();
}

fn run(args: &DemoArgs) -> RenderGraphResult<()> {
    let config = args.render_graph_config();
    let description = load_from_file(&args.description, &config)?;

    let mut render_graph = RenderGraph::new(config);
    let plan = render_graph.recreate(&description)?;

    log::info!(
        "Compiled {:?}: {} render stages, {} synchronization stages, {} resources",
        args.description,
        plan.render_stage_descriptions.len(),
        plan.synchronization_stage_descriptions.len(),
        plan.resource_descriptions.len()
    );

    for pipeline_stage in &plan.pipeline_stage_descriptions {
        match pipeline_stage.stage_type {
            RenderGraphPipelineStageType::Render => {
                let render_stage = &plan.render_stage_descriptions[pipeline_stage.stage_index];
                log::info!(
                    "  {} ({:?}, weight {})",
                    render_stage.name,
                    render_stage.queue_type(),
                    render_stage.weight
                );
            }
            RenderGraphPipelineStageType::Synchronization => {
                let synchronization_stage =
                    &plan.synchronization_stage_descriptions[pipeline_stage.stage_index];
                for synchronization in &synchronization_stage.synchronizations {
                    log::info!(
                        "    {} {:?}: {:?} -> {:?}",
                        synchronization.resource_name,
                        synchronization.synchronization_type,
                        synchronization.prev_binding_type,
                        synchronization.next_binding_type
                    );
                }
            }
        }
    }

    if let Some(dot_file) = &args.dot_file {
        write_graph_viz_to_file(&plan, dot_file)?;
    }

    if let Some(save_file) = &args.save_file {
        save_to_file(
            save_file,
            &description,
            render_graph.config(),
            &mut IdAllocator::new(),
        )?;
    }

    if args.json {
        println!("{}", plan.to_json()?);
    }

    Ok(())
}

fn main() {
    logging_init();

    let args = DemoArgs::from_args();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
