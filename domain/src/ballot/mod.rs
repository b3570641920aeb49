//! Voting primitives: vote values, tallies, the closure rule, and the
//! callback action token codec.

pub mod action;
pub mod rule;
pub mod vote;

pub use action::{ActionToken, ActionTokenError};
pub use rule::{Verdict, VotingRule};
pub use vote::{Tally, VoteValue};
