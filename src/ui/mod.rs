//! Rendering layer: the virtual document and the block widgets bound to it

pub mod blocks;
pub mod dom;
