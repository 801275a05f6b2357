use super::*;
use std::path::Path;

// Quotes end a label and braces, bars and angle brackets are record syntax
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '{' | '}' | '|' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// DOT text of the pipeline: render stages as boxes, synchronization stages as records listing
/// their transitions, chained in execution order
pub fn write_graph_viz(plan: &RenderGraphPlan) -> String {
    let mut dot = String::from("digraph RenderGraph {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [fontname=\"monospace\"];\n");

    for (position, pipeline_stage) in plan.pipeline_stage_descriptions.iter().enumerate() {
        match pipeline_stage.stage_type {
            RenderGraphPipelineStageType::Render => {
                let render_stage = &plan.render_stage_descriptions[pipeline_stage.stage_index];
                let mut label = format!(
                    "{}\\n{:?}",
                    escape(&render_stage.name),
                    render_stage.queue_type()
                );
                for resource_state in &render_stage.resource_states {
                    label.push_str(&format!(
                        "\\n{} {:?}",
                        escape(&resource_state.resource_name),
                        resource_state.binding_type
                    ));
                }

                let style = if render_stage.enabled { "solid" } else { "dashed" };
                dot.push_str(&format!(
                    "  s{} [label=\"{}\", shape=box, style={}];\n",
                    position, label, style
                ));
            }
            RenderGraphPipelineStageType::Synchronization => {
                let synchronization_stage =
                    &plan.synchronization_stage_descriptions[pipeline_stage.stage_index];
                let mut label = format!("Synchronization {}", pipeline_stage.stage_index);
                for synchronization in &synchronization_stage.synchronizations {
                    label.push_str(&format!(
                        "|{} {:?}\\n{:?} {:?} to {:?} {:?}",
                        escape(&synchronization.resource_name),
                        synchronization.synchronization_type,
                        synchronization.prev_queue,
                        synchronization.prev_binding_type,
                        synchronization.next_queue,
                        synchronization.next_binding_type
                    ));
                }

                dot.push_str(&format!(
                    "  s{} [label=\"{{{}}}\", shape=record, style=rounded];\n",
                    position, label
                ));
            }
        }
    }

    for position in 1..plan.pipeline_stage_descriptions.len() {
        dot.push_str(&format!("  s{} -> s{};\n", position - 1, position));
    }

    dot.push_str("}\n");
    dot
}

pub fn write_graph_viz_to_file<P: AsRef<Path>>(
    plan: &RenderGraphPlan,
    path: P,
) -> RenderGraphResult<()> {
    let path = path.as_ref();
    log::debug!("Writing render graph to {}", path.display());
    std::fs::write(path, write_graph_viz(plan)).map_err(|e| RenderGraphError::io(path, e))?;
    Ok(())
}
