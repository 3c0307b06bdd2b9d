pub mod collect;
pub mod list;
pub mod prepare;
pub mod submit;
