//! Framecue Sequencer Core (renderer-agnostic)
//!
//! A cooperative, frame-stepped animation sequencing engine: scene
//! procedures yield combinator trees of tween/delay operations, the
//! scheduler drives each procedure one resumption per tick, and interpolated
//! values are committed into a registry of host-provided property targets.
//! The host renders from those targets; this crate never touches pixels.

pub mod clock;
pub mod config;
pub mod ease;
pub mod engine;
pub mod error;
pub mod ids;
pub mod interp;
pub mod ops;
pub mod outputs;
pub mod procedure;
pub mod property;
pub mod schedule;
pub(crate) mod stepping;
pub mod stored_ops;
pub mod timeline;
pub mod tween;

// Re-exports for consumers (hosts and scene authors)
pub use clock::FrameClock;
pub use config::Config;
pub use ease::Easing;
pub use engine::Engine;
pub use error::SequencerError;
pub use ids::{EntryId, PropId, TaskId};
pub use interp::{interpolate, Extrapolate, InterpOptions};
pub use ops::{delay, parallel, repeat, repeat_forever, sequential, stagger, Op};
pub use outputs::{Change, Outputs, SequencerEvent};
pub use procedure::{Procedure, Script};
pub use property::{PropertyBook, PropertyTarget};
pub use schedule::{Scheduler, TaskState};
pub use stored_ops::{parse_op_json, parse_ops_json};
pub use timeline::{NoopHost, SubtreeHost, Timeline, TimelineEntry};
pub use tween::Tween;

pub use framecue_api_core::{PropPath, Value, ValueKind, WriteBatch, WriteOp};
