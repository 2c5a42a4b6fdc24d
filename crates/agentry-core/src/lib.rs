//! Business logic for Agentry: the turn engine, tool catalogue, builder
//! operations, and the collaborator traits infrastructure implements.
//!
//! Nothing in this crate touches the network or the filesystem directly;
//! everything goes through the traits in [`llm`], [`storage`], and [`hub`].

pub mod hub;
pub mod llm;
pub mod ops;
pub mod session;
pub mod storage;
pub mod turn;

#[cfg(test)]
pub(crate) mod testing;
