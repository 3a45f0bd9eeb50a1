pub mod local_pipeline;

pub use local_pipeline::LocalPipeline;
