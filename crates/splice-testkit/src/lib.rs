//! Splice Testing Infrastructure
//!
//! An in-memory host application for exercising the extension registry
//! without a real host: nodes with native attributes, parameters, identity
//! reuse and destruction events.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! splice-testkit = { workspace = true }
//! ```
//!
//! Then in your tests:
//! ```rust,ignore
//! use splice_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     let scene = MockScene::new();
//!     let cam = fixtures::camera(&scene);
//!     scene.destroy(&cam);
//! }
//! ```

pub mod fixtures;
pub mod node;
pub mod scene;

pub use node::MockNode;
pub use scene::{MockScene, NodeBuilder};
