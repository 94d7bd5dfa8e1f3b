pub mod batch;
pub mod retry;
pub mod runtime;
pub mod writer;
