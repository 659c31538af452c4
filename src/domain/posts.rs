use super::error::DomainError;

/// Number of characters of post content shown in a profile preview.
pub const PREVIEW_CONTENT_LIMIT: usize = 200;
pub const PREVIEW_ELLIPSIS: &str = "...";

/// Cut `content` to the preview limit and mark it as truncated.
///
/// The marker is appended unconditionally, so even short posts read as previews.
pub fn preview_content(content: &str) -> String {
    let mut preview: String = content.chars().take(PREVIEW_CONTENT_LIMIT).collect();
    preview.push_str(PREVIEW_ELLIPSIS);
    preview
}

/// Parse a post identifier taken from a URL segment.
///
/// Leading whitespace and an optional sign are accepted, then the longest run of
/// ASCII digits; trailing garbage is ignored (`"12abc"` is post 12). A segment
/// without leading digits, or one that overflows `i64`, is rejected.
pub fn parse_post_id(raw: &str) -> Result<i64, DomainError> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(DomainError::validation(format!(
            "post id `{raw}` is not an integer"
        )));
    }

    let magnitude: i64 = rest[..digits_len]
        .parse()
        .map_err(|_| DomainError::validation(format!("post id `{raw}` is out of range")))?;

    Ok(if negative { -magnitude } else { magnitude })
}
