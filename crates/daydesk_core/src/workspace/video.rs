//! Video link recognition for the embedded player.

use once_cell::sync::Lazy;
use regex::Regex;

const VIDEO_ID_LEN: usize = 11;

static VIDEO_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("valid video url regex")
});

/// Extracts the 11-character video id from a share, embed or watch URL.
pub fn video_id(url: &str) -> Option<&str> {
    let id = VIDEO_URL_RE.captures(url)?.get(2)?.as_str();
    (id.chars().count() == VIDEO_ID_LEN).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::video_id;

    #[test]
    fn recognizes_common_link_shapes() {
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn rejects_links_without_a_full_length_id() {
        assert_eq!(video_id("https://youtu.be/short"), None);
        assert_eq!(video_id("https://example.com/page"), None);
        assert_eq!(video_id(""), None);
    }
}
