pub mod credentials;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod provider_factory;
pub mod providers;
pub mod unified;

pub use credentials::CredentialSource;
pub use pipeline::{Artifact, ArtifactPipeline};
pub use provider::{
    ComponentProvider, LLMError, LLMStream, ProviderKind, ProviderOutput, Usage,
    PROVIDER_PRIORITY,
};
pub use provider_factory::create_providers;
pub use providers::{AimlProvider, OpenAIProvider, OpenRouterProvider};
pub use unified::{CreateOptions, FailedAttempt, Generation, GenerationError, UnifiedProvider};
