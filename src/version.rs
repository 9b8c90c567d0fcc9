// Version and build tracking for icebreaker

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    format!("v{}", VERSION)
}

/// User-Agent sent to every upstream API
pub fn user_agent() -> String {
    format!("icebreaker/{}", VERSION)
}
