use super::*;

//
// weight(stage) = number of distinct stages that depend on it, directly or transitively. Each
// stage walks its ancestors once (the visited set also keeps this finite if a cycle ever slipped
// through) and bumps every ancestor it finds.
//
#[profiling::function]
pub fn weight_stages(dependencies: &RenderGraphDependencies) -> Vec<u32> {
    let stage_count = dependencies.parents.len();
    let mut weights = vec![0; stage_count];

    let mut visited = vec![false; stage_count];
    let mut stack = Vec::default();
    for stage_index in 0..stage_count {
        visited.iter_mut().for_each(|visited| *visited = false);
        visited[stage_index] = true;
        stack.push(RenderGraphStageId(stage_index));

        while let Some(stage) = stack.pop() {
            for &parent in dependencies.parents(stage) {
                if !visited[parent.0] {
                    visited[parent.0] = true;
                    weights[parent.0] += 1;
                    stack.push(parent);
                }
            }
        }
    }

    weights
}

//
// Heaviest first. An ancestor always has every descendant of its children plus the children
// themselves, so it strictly outweighs them. Equal weights keep declaration order.
//
#[profiling::function]
pub fn sort_stages(weights: &[u32]) -> Vec<RenderGraphStageId> {
    let mut order: Vec<_> = (0..weights.len()).map(RenderGraphStageId).collect();
    order.sort_by(|a, b| weights[b.0].cmp(&weights[a.0]));
    order
}
