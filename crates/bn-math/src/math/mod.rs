//! Core math modules.

pub mod posterior;
pub mod radix;
pub mod stable;
