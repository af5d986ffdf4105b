pub mod media;
pub mod runtime;
pub mod server;
pub mod timer;
