pub mod check;
pub mod colimit;
pub mod complete;
pub mod decode;
pub mod extend;
pub mod graph;
pub mod join;
pub mod le;
pub mod meet;
