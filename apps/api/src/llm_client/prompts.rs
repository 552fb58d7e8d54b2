// Shared prompt fragments.
// The poem prompt itself lives in pipeline/prompts.rs; this file holds
// cross-cutting instructions reusable by any model call.

/// Appended to prompts whose output is parsed mechanically.
pub const NO_PREAMBLE_INSTRUCTION: &str = "Don't include any explanation or introduction.";

/// Renders an instruction asking the model to wrap a field in `<tag>` markers.
pub fn tagged_output_instruction(what: &str, tag: &str) -> String {
    format!("Return {what} between <{tag}> and </{tag}> tags.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_output_instruction_names_both_markers() {
        let line = tagged_output_instruction("the poem", "poem");
        assert!(line.contains("<poem>"));
        assert!(line.contains("</poem>"));
    }
}
