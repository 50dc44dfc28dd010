pub mod batch;
pub mod loader;
pub mod packer;
pub mod record;
pub mod source;
pub mod split;
