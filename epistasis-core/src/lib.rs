//! Epistasis Core: model inputs, statistics and the figure scene graph.
//!
//! This crate holds everything the plot builders need that is not a plot:
//! - Model traits (`EpistasisModel`, `RegressionModel`, `NonlinearModel`,
//!   `PcaModel`) and their serde carriers
//! - Statistics primitives (normal and F distributions, p-values)
//! - Colors, line styles and matplotlib format strings
//! - A backend-independent `Figure` / `Axes` / `Artist` scene graph
//! - Seeded synthetic models for demos and tests

pub mod color;
pub mod error;
pub mod figure;
pub mod model;
pub mod pca;
pub mod stats;
pub mod synthetic;

pub use color::Color;
pub use error::ModelError;
pub use figure::{Artist, Axes, Figure, Style};
pub use model::{
    EpistasisModel, ErrorBounds, FittedModel, Interactions, Label, NonlinearModel, RegressionModel,
};
pub use pca::{PcaModel, PcaProjection};
