pub(crate) fn turn_url(base_url: &str, conversation: &str) -> String {
    format!(
        "{}/api/group-conversations/{}/assistant/stream",
        base_url, conversation
    )
}

pub(crate) fn pause_url(base_url: &str, conversation: &str) -> String {
    format!("{}/api/group-conversations/{}/pause", base_url, conversation)
}

pub(crate) fn resume_url(base_url: &str, conversation: &str) -> String {
    format!("{}/api/group-conversations/{}/resume", base_url, conversation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_conversation_endpoints() {
        assert_eq!(
            turn_url("http://127.0.0.1:8000", "g-1"),
            "http://127.0.0.1:8000/api/group-conversations/g-1/assistant/stream"
        );
        assert_eq!(
            pause_url("http://127.0.0.1:8000", "g-1"),
            "http://127.0.0.1:8000/api/group-conversations/g-1/pause"
        );
        assert_eq!(
            resume_url("http://127.0.0.1:8000", "g-1"),
            "http://127.0.0.1:8000/api/group-conversations/g-1/resume"
        );
    }
}
