pub mod feed;
pub mod media;
