//! Concrete task kinds.
//!
//! Each kind has a builder implementing
//! [`NodeBuilder`](crate::core::NodeBuilder); tasks are created through
//! [`Tasks::create`](crate::core::Container::create) or through the
//! definition-file [`Registry`](crate::definition::Registry).

pub mod empty;
pub mod inference;
pub mod labels;
pub mod statement;

pub use empty::{EmptyTask, EmptyTaskBuilder};
pub use inference::{
    LoadImage, LoadImageBuilder, MakeInferenceSession, MakeInferenceSessionBuilder, RunInference,
    RunInferenceBuilder,
};
pub use labels::{LoadClassLabels, LoadClassLabelsBuilder};
pub use statement::{StatementTask, StatementTaskBuilder};
