//! Map overlay coordination
//!
//! The rendering surface is an external collaborator. Instead of letting map
//! callbacks mutate shared view state, the surface and the tracker send typed
//! [`MapEvent`]s to a single [`MapCoordinator`], which owns every redraw
//! decision and answers with [`RenderCommand`]s.
//!
//! # Architecture
//!
//! ```text
//! Map surface ──MapEvent──────────┐
//!                                 ▼
//! PathTracker ──watch──► forward_path_changes ──MapEvent──► MapCoordinator
//!                                                              │
//! Map surface ◄──────────────── RenderCommand ─────────────────┘
//! ```
//!
//! Path geometry is converted with a [`Converter`](crate::transform::Converter)
//! right before it leaves the coordinator, so the tracker only ever stores raw
//! WGS-84 points.

mod coordinator;
mod events;

pub use coordinator::{forward_path_changes, MapCoordinator, DEFAULT_INITIAL_SPAN_M};
pub use events::{MapEvent, RenderCommand};
