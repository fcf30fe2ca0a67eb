//! Loading of external files. Everything here is CPU-only; uploading is the
//! renderer's job.

pub mod texture;
