// Application layer: concrete pipelines wiring the core steps to real storage.

pub mod pipelines;
