// pixie-batch/src/processors/mod.rs
mod batch;
mod compressor;
mod enhancer;
mod filters;
mod loader;
mod organizer;
mod resizer;

pub use batch::{collect_candidates, BatchReport, BatchRunner, BatchSummary, Candidate, FileOutcome};
pub use compressor::Compressor;
pub use enhancer::{EdsrUpscaler, Enhancer, SuperResolution, Upscaler};
pub use filters::FilterSet;
pub use loader::Loader;
pub use organizer::Organizer;
pub use resizer::Resizer;
