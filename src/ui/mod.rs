pub mod embeds;
pub mod report;
