pub mod constants;
pub mod error;
pub mod frame;
pub mod region;
pub mod source_media;
pub mod video_metadata;
