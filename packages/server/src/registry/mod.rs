//! Process-wide registries shared by every request.
//!
//! Both registries only ever grow. They live in [`AppState`](crate::state::AppState)
//! and are rebuilt from traffic after a restart.

mod etag;
mod tier;

pub use etag::EtagRegistry;
pub use tier::{ParamError, ResizeTier, TierRegistry};
