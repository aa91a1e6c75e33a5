pub mod audit;
pub mod parsers;
pub mod renderers;
