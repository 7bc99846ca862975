pub const BASE_URL_ENV: &str = "GROUP_CHAT_BASE_URL";
pub const API_KEY_ENV: &str = "GROUP_CHAT_API_KEY";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
