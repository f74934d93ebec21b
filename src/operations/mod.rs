//! Typed operations against the GraphQLZero demo API, one module per
//! entity/verb pair.

pub mod photo;
pub mod post;
