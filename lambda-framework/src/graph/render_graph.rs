use super::*;
use std::sync::Arc;

/// Owns the currently published plan. A new plan replaces the old one only once it compiled
/// completely, so the execution engine never sees a partial or broken graph.
pub struct RenderGraph {
    config: RenderGraphConfig,
    plan: Option<Arc<RenderGraphPlan>>,
}

impl RenderGraph {
    pub fn new(config: RenderGraphConfig) -> Self {
        RenderGraph { config, plan: None }
    }

    pub fn config(&self) -> &RenderGraphConfig {
        &self.config
    }

    /// The last plan that compiled successfully
    pub fn plan(&self) -> Option<Arc<RenderGraphPlan>> {
        self.plan.clone()
    }

    /// Compile the description and publish the result. On failure the error is logged and
    /// returned, and the previously published plan stays active.
    pub fn recreate(
        &mut self,
        description: &RenderGraphDescription,
    ) -> RenderGraphResult<Arc<RenderGraphPlan>> {
        match RenderGraphPlan::new(description, &self.config) {
            Ok(plan) => {
                let plan = Arc::new(plan);
                self.plan = Some(plan.clone());
                Ok(plan)
            }
            Err(e) => {
                if self.plan.is_some() {
                    log::error!(
                        "Failed to recreate render graph, keeping the previous one: {}",
                        e
                    );
                } else {
                    log::error!("Failed to create render graph: {}", e);
                }
                Err(e)
            }
        }
    }
}
