//! Value Objects - Immutable, identity-less domain primitives

pub mod artifact_name;
mod device_tag;
mod image_extension;
mod request_token;

pub use artifact_name::{
    audio_file_name, face_file_name, parse_video_file_name, sanitize_file_name, video_file_name,
};
pub use device_tag::DeviceTag;
pub use image_extension::ImageExtension;
pub use request_token::RequestToken;
