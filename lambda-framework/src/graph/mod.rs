mod graph_error;
pub use graph_error::*;

mod graph_config;
pub use graph_config::*;

mod graph_resource;
pub use graph_resource::*;

mod graph_stage;
pub use graph_stage::*;

mod graph_description;
pub use graph_description::*;

mod graph_classify;
pub use graph_classify::*;

mod graph_builder;
pub use graph_builder::*;

mod graph_order;
pub use graph_order::*;

mod graph_pipeline;
pub use graph_pipeline::*;

mod graph_synchronization;
pub use graph_synchronization::*;

mod graph_prune;
pub use graph_prune::*;

mod graph_plan;
pub use graph_plan::*;

mod graph_serializer;
pub use graph_serializer::*;

mod graph_viz;
pub use graph_viz::*;

mod render_graph;
pub use render_graph::*;

#[cfg(test)]
mod graph_tests;
