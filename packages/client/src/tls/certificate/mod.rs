//! Certificate values and names
//!
//! - `parser`: the immutable [`Certificate`] value built from DER or PEM
//! - `name`: structured [`DistinguishedName`] used for issuer/subject matching

pub mod name;
pub mod parser;

pub use name::DistinguishedName;
pub use parser::Certificate;
