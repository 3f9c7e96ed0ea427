//! Response cleanup before announcing

/// Characters that only carry markdown structure
const MARKDOWN_CHARS: &[char] = &['*', '_', '`', '~', '#', '>', '[', ']', '{', '}', '|'];

/// Strip markdown control characters and collapse whitespace
pub fn clean_response(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !MARKDOWN_CHARS.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
