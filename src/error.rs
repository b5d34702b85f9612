use thiserror::Error;

/// User-reportable command failures. The `Display` text is what the caller
/// sees in the ephemeral reply; none of these touch the store or take the
/// process down.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid time format. Use `1:10 PM`, `3:30 AM`, etc.")]
    InvalidTimeFormat,
    #[error("Unknown rank `{0}`.")]
    InvalidRank(String),
    #[error("You do not have permission to do that.")]
    Unauthorized,
    #[error("Rating must be between {min} and {max}.")]
    RatingOutOfRange { min: i64, max: i64 },
}
