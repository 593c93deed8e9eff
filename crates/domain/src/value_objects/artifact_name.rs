//! File naming scheme for per-request artifacts
//!
//! Uploads, audio and video live in three sibling directories with no index
//! linking them; the shared request token in each file name is the only
//! correlation.

use crate::errors::DomainError;
use crate::value_objects::{ImageExtension, RequestToken};

const FACE_PREFIX: &str = "face_";
const AUDIO_PREFIX: &str = "audio_";
const VIDEO_PREFIX: &str = "video_";
const VIDEO_SUFFIX: &str = ".mp4";

/// Name of the stored face image: `face_<token>_<stem>.<extension>`
///
/// The extension always comes from the validated upload and is the only dot
/// in the name; Wav2Lip picks static-image mode from the text after the dot.
#[must_use]
pub fn face_file_name(token: RequestToken, original: &str, extension: ImageExtension) -> String {
    let base = base_name(original);
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);
    let stem = sanitize_file_name(stem).replace('.', "_");
    format!("{FACE_PREFIX}{token}_{stem}.{}", extension.as_str())
}

/// Name of the synthesized audio file: `audio_<token>.wav`
#[must_use]
pub fn audio_file_name(token: RequestToken) -> String {
    format!("{AUDIO_PREFIX}{token}.wav")
}

/// Name of the generated video file: `video_<token>.mp4`
///
/// This name doubles as the video reference handed to clients.
#[must_use]
pub fn video_file_name(token: RequestToken) -> String {
    format!("{VIDEO_PREFIX}{token}{VIDEO_SUFFIX}")
}

/// Recover the token from a video reference
///
/// Anything that is not exactly `video_<32 hex>.mp4` is rejected, which also
/// keeps path separators and `..` out of download lookups.
pub fn parse_video_file_name(name: &str) -> Result<RequestToken, DomainError> {
    let token = name
        .strip_prefix(VIDEO_PREFIX)
        .and_then(|rest| rest.strip_suffix(VIDEO_SUFFIX))
        .ok_or_else(|| DomainError::InvalidVideoReference(name.to_string()))?;
    RequestToken::parse(token).map_err(|_| DomainError::InvalidVideoReference(name.to_string()))
}

/// Reduce an untrusted upload name to a safe single path component
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; whitespace becomes `_`;
/// everything else is dropped. Leading dots and underscores are stripped so
/// the result can never be hidden or climb directories.
#[must_use]
pub fn sanitize_file_name(original: &str) -> String {
    let mapped: String = base_name(original)
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let trimmed = mapped.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

// Browsers on Windows may send the full client path.
fn base_name(original: &str) -> &str {
    original.rsplit(['/', '\\']).next().unwrap_or(original)
}
