//! Prompt builders for section synthesis and refinement.

/// Approximate word count requested for freshly generated sections.
pub const SECTION_TARGET_WORDS: u32 = 200;

/// Prompt asking for the initial body of one section.
pub fn section_prompt(document_title: &str, section_header: &str) -> String {
    format!(
        "You are writing a professional business document about '{document_title}'.\n\
         Write a detailed section (approx {SECTION_TARGET_WORDS} words) for the header: '{section_header}'.\n\
         Return ONLY the content, no introductory text."
    )
}

/// Prompt asking to rewrite `current_text` according to `instruction`.
pub fn refine_prompt(current_text: &str, instruction: &str) -> String {
    format!(
        "Refine the following text based on this instruction: \"{instruction}\".\n\n\
         Current Text:\n{current_text}\n\n\
         Return ONLY the refined text."
    )
}
