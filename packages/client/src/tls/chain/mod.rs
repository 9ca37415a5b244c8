//! Trust-chain construction
//!
//! - `hop`: single-anchor path validation with a tri-state outcome
//! - `self_signed`: root detection
//! - `validator`: the recursive climb through the candidate set

pub mod hop;
pub mod self_signed;
pub mod validator;

pub use hop::{HopOutcome, validate_hop};
pub use self_signed::is_self_signed;
pub use validator::ChainValidator;
