//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use rogue_ecs::prelude::*;
//! ```

pub use crate::command::CommandBuffer;
pub use crate::component::Component;
pub use crate::config::WorldConfig;
pub use crate::debug::WorldInspector;
pub use crate::entity::Entity;
pub use crate::error::{EcsError, Result};
pub use crate::tag::Tag;
pub use crate::world::World;
