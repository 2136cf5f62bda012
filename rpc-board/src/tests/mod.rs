//! Test module for rpc-board
//!
//! Property-based tests (proptest) for the resolver, the operation tree,
//! the input store, field classification and expansion state.


#[cfg(test)]
pub mod resolver_tests;



#[cfg(test)]
pub mod field_tests;
