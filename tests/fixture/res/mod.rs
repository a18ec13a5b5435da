// @generated by resgen. Do not edit.
//! Generated resource accessors.

mod shards;
pub mod drawable;
pub mod string;
