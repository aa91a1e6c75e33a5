pub mod audit;
pub mod parser;
pub mod renderer;
