pub mod batch;
pub mod cli;
pub mod ctx;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod measure;
pub mod pipeline;
pub mod reference;
pub mod schema;
pub mod scores;
