//! Vocabulary shared between the render graph and the graphics device layer. The render graph
//! never talks to a device directly, it only names queues, formats and usage flags that the
//! device layer later turns into real objects.

mod types;
pub use types::*;
