pub mod aiml;
pub mod common;
pub mod openai;
pub mod openrouter;

pub use aiml::AimlProvider;
pub use openai::OpenAIProvider;
pub use openrouter::OpenRouterProvider;
