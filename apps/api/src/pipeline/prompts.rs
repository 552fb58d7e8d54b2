//! Poem prompt template and the artwork renderer that feeds it.

use serde::Serialize;

use crate::llm_client::prompts::{tagged_output_instruction, NO_PREAMBLE_INSTRUCTION};
use crate::pipeline::extractor::{POEM_TAG, TITLE_TAG};

/// Poem prompt template.
/// Replace: {artwork_json}, {style}, {poem_instruction}, {title_instruction},
///          {no_preamble}
pub const POEM_PROMPT_TEMPLATE: &str = "{artwork_json}
Use the above <json> document, to inspire a poem in the {style} style.
{poem_instruction}
Also, give your poem a title. {title_instruction}
{no_preamble}";

/// Renders the artwork as pretty JSON: two-space indent, keys in document
/// order, no HTML escaping.
pub fn render_artwork<T: Serialize + ?Sized>(artwork: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(artwork)
}

/// Builds the full model prompt for one artwork and one style.
pub fn build_poem_prompt<T: Serialize + ?Sized>(
    artwork: &T,
    style: &str,
) -> Result<String, serde_json::Error> {
    let artwork_json = render_artwork(artwork)?;

    Ok(POEM_PROMPT_TEMPLATE
        .replace("{poem_instruction}", &tagged_output_instruction("the poem", POEM_TAG))
        .replace("{title_instruction}", &tagged_output_instruction("the title", TITLE_TAG))
        .replace("{no_preamble}", NO_PREAMBLE_INSTRUCTION)
        .replace("{style}", style)
        // Last, so placeholders inside artwork text are never substituted.
        .replace("{artwork_json}", &artwork_json))
}
