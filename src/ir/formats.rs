//! Output formats for constructed trees

pub mod treeviz;

pub use treeviz::to_treeviz_str;
