//! Request model and its binary wire format.
//!
//! A request is an [`InstructionSet`](model::InstructionSet): a canvas size plus an ordered
//! list of images with placements. The response is a single image.

/// Big-endian wire encoding of images and instruction sets.
pub mod codec;
/// JSON manifests that reference images on disk.
pub mod manifest;
/// In-memory instruction model.
pub mod model;
