//! Command implementations.
//!
//! Each command returns the text to print so `main` owns stdout.

pub mod clear;
pub mod inspect;
pub mod track;
pub mod verify;

pub use self::clear::execute_clear;
pub use self::inspect::{execute_lineage, execute_list, execute_show, execute_stats};
pub use self::track::execute_track;
pub use self::verify::execute_verify;
