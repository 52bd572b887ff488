//! Perfect maze generation.
//!
//! A [`maze::Maze`] is carved into a spanning tree by one of six [`generators::Generator`]s,
//! driven step by step through an [`engine::Engine`] that reports every change as a
//! [`maze::MazeEvent`]. Once carving is done the engine reconstructs the route from the
//! bottom-right exit back to the top-left entry, coloured along a red-to-yellow gradient.

pub mod app;
pub mod engine;
pub mod error;
pub mod generators;
pub mod logging;
pub mod maze;
pub mod solution;

pub use engine::Engine;
pub use error::MazeError;
pub use generators::Generator;
