mod album;
mod media;

pub use album::*;
pub use media::*;
