//! Canned prompt suggestions and prompt enhancement

const MASKED_SUGGESTIONS: [&str; 5] = [
    "Make it red",
    "Remove this object",
    "Change to a cat",
    "Add flowers",
    "Make it brighter",
];

const SUGGESTIONS: [&str; 5] = [
    "Remove background",
    "Cyberpunk city style",
    "Pencil sketch",
    "Add a cute robot",
    "Vintage polaroid",
];

const ENHANCE_EMPTY: &str =
    "Enhance image quality, professional lighting, 4k resolution, highly detailed, sharp focus";
const ENHANCE_SUFFIX: &str = concat!(
    "professional studio lighting, 8k resolution, highly detailed, ",
    "cinematic composition, masterpiece"
);

/// Quick suggestions; mask-specific ones when a mask is active
pub fn suggestions(mask_active: bool) -> &'static [&'static str] {
    if mask_active {
        &MASKED_SUGGESTIONS
    } else {
        &SUGGESTIONS
    }
}

/// Prompt text inserted when a suggestion is picked
pub fn expand_suggestion(suggestion: &str) -> String {
    match suggestion {
        "Remove background" => "Remove background, isolate subject, white background".to_string(),
        other => other.to_string(),
    }
}

/// Add quality modifiers to a prompt, or supply a generic enhancement prompt
pub fn enhance(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        ENHANCE_EMPTY.to_string()
    } else {
        format!("{trimmed}, {ENHANCE_SUFFIX}")
    }
}
