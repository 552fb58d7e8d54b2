//! Response Extractor — pulls the poem and title out of free-form model text.
//!
//! The model is asked for `<poem>…</poem>` and `<title>…</title>` but nothing
//! enforces it, so the text is treated as untrusted: each marker pair is
//! searched for independently, the first well-formed pair wins, and a missing
//! poem is a hard failure.

use thiserror::Error;

pub const POEM_TAG: &str = "poem";
pub const TITLE_TAG: &str = "title";

#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("model output has no <poem>…</poem> section")]
    MissingPoem,

    #[error("model output has an empty <poem> section")]
    EmptyPoem,
}

/// Poem body and title, each trimmed. `title` is empty when the model gave none.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPoem {
    pub poem: String,
    pub title: String,
}

/// Returns the text between the first `<tag>` and the first `</tag>` after it.
pub fn extract_tagged<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let start = text.find(&open)? + open.len();
    let len = text[start..].find(&close)?;
    Some(&text[start..start + len])
}

pub fn extract_poem(text: &str) -> Result<ExtractedPoem, ExtractionError> {
    let poem = extract_tagged(text, POEM_TAG)
        .ok_or(ExtractionError::MissingPoem)?
        .trim();
    if poem.is_empty() {
        return Err(ExtractionError::EmptyPoem);
    }

    let title = extract_tagged(text, TITLE_TAG).map(str::trim).unwrap_or_default();

    Ok(ExtractedPoem {
        poem: poem.to_string(),
        title: title.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_text_comes_back_trimmed() {
        for body in ["Line one", "  padded \n", "\n\tA\nB\n\n", "é — ünïcode ✓"] {
            let wrapped = format!("<poem>{body}</poem>");
            let extracted = extract_poem(&wrapped).unwrap();
            assert_eq!(extracted.poem, body.trim());
        }
    }

    #[test]
    fn test_title_before_poem() {
        let text = "<title>Night</title><poem>Line one\nLine two\nLine three</poem>";
        let extracted = extract_poem(text).unwrap();
        assert_eq!(extracted.poem, "Line one\nLine two\nLine three");
        assert_eq!(extracted.title, "Night");
    }

    #[test]
    fn test_title_after_poem_with_padding() {
        let text = "\n<poem>\n  Still water  \n</poem>\n\n<title>  Pond </title>\n";
        let extracted = extract_poem(text).unwrap();
        assert_eq!(extracted.poem, "Still water");
        assert_eq!(extracted.title, "Pond");
    }

    #[test]
    fn test_missing_title_is_not_an_error() {
        let extracted = extract_poem("Here you go:\n<poem>Dusk</poem>").unwrap();
        assert_eq!(extracted.poem, "Dusk");
        assert_eq!(extracted.title, "");
    }

    #[test]
    fn test_missing_poem_is_an_error_even_with_title() {
        assert_eq!(
            extract_poem("<title>Orphan</title> no poem here"),
            Err(ExtractionError::MissingPoem)
        );
        assert_eq!(extract_poem(""), Err(ExtractionError::MissingPoem));
    }

    #[test]
    fn test_unclosed_poem_is_an_error() {
        assert_eq!(
            extract_poem("<poem>runs off the end"),
            Err(ExtractionError::MissingPoem)
        );
        assert_eq!(
            extract_poem("</poem>backwards<poem>"),
            Err(ExtractionError::MissingPoem)
        );
    }

    #[test]
    fn test_blank_poem_is_an_error() {
        assert_eq!(
            extract_poem("<title>T</title><poem>  \n </poem>"),
            Err(ExtractionError::EmptyPoem)
        );
    }

    #[test]
    fn test_first_bounded_occurrence_wins() {
        let text = "I will put it in <poem>this</poem> form.\n<poem>The real one</poem>";
        assert_eq!(extract_poem(text).unwrap().poem, "this");
    }

    #[test]
    fn test_extract_tagged_handles_arbitrary_tags() {
        assert_eq!(extract_tagged("a<x>b</x>c", "x"), Some("b"));
        assert_eq!(extract_tagged("<x></x>", "x"), Some(""));
        assert_eq!(extract_tagged("<y>b</y>", "x"), None);
    }
}
