// External I/O operations module
pub mod instance; // Running-daemon discovery and signalling
pub mod lock; // Lock file operations
