//! Prompt text sent to every provider.

use artifact_core::GenerationRequest;

/// Describes the three-key response schema and shows a worked example.
pub const SYSTEM_PROMPT: &str = r#"You are a UI component generator. Reply with a single JSON object and nothing else.

The object MUST have exactly these three keys:
- "components": an array of {"id": string, "type": string} entries, one per component.
- "layout": an object mapping a component id to {"styles": object, "children": [child ids]}. Only containers need entries.
- "componentDetails": an object mapping every component id to {"type": string, "props": object, "content": string}.

Rules:
- Component types are one of: container, text, button, input, image, chart, calculator, quiz.
- Every id used in "layout" must appear in "componentDetails".
- A component has at most one parent. Never make a component its own ancestor.
- Put visible text for text and button components in "content".
- Use camelCase CSS property names inside "styles".

Example for "a welcome card with a title and a button":
{
  "components": [
    {"id": "card", "type": "container"},
    {"id": "title", "type": "text"},
    {"id": "cta", "type": "button"}
  ],
  "layout": {
    "card": {"styles": {"padding": "24px", "borderRadius": "12px"}, "children": ["title", "cta"]}
  },
  "componentDetails": {
    "card": {"type": "container", "props": {"className": "card"}},
    "title": {"type": "text", "props": {}, "content": "Welcome back"},
    "cta": {"type": "button", "props": {"className": "btn-primary"}, "content": "Get started"}
  }
}"#;

/// User message echoing every request field.
pub fn build_user_prompt(request: &GenerationRequest) -> String {
    format!(
        "Create a UI for: {}\n\
         Framework: {}\n\
         Styling: {}\n\
         Interactivity: {}\n\
         Theme: {}",
        request.prompt, request.framework, request.styling, request.interactivity, request.theme
    )
}
