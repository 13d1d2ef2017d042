pub mod check;
pub mod dump;
pub mod pipeline;
pub mod source_loader;
