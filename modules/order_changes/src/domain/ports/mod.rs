pub mod references;

pub use references::ReferenceDirectory;
