pub mod simple_pipeline;

pub use simple_pipeline::SimplePipeline;
