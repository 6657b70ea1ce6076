//! AI generation request and its validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest prompt forwarded to a provider, in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("invalid {field}: '{value}' (expected one of: {expected})")]
    InvalidOption {
        field: &'static str,
        value: String,
        expected: String,
    },
}

macro_rules! request_option {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, default = $default:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RequestError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(RequestError::InvalidOption {
                        field: $field,
                        value: value.to_string(),
                        expected: [$($text),+].join(", "),
                    }),
                }
            }
        }
    };
}

request_option!(
    /// Target framework for emitted code.
    Framework, "framework", default = React,
    { React => "react", Vue => "vue", Svelte => "svelte" }
);

request_option!(
    /// Styling approach the model is asked to use.
    Styling, "styling", default = Tailwind,
    { Tailwind => "tailwindcss", Css => "css", StyledComponents => "styled-components" }
);

request_option!(
    Interactivity, "interactivity", default = Medium,
    { Low => "low", Medium => "medium", High => "high" }
);

request_option!(
    Theme, "theme", default = Default,
    { Default => "default", Modern => "modern", Minimalist => "minimalist" }
);

/// A natural-language component request plus generation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub framework: Framework,
    #[serde(default)]
    pub styling: Styling,
    #[serde(default)]
    pub interactivity: Interactivity,
    #[serde(default)]
    pub theme: Theme,
}

impl GenerationRequest {
    /// Build a request with default options from a sanitised prompt.
    pub fn new(prompt: &str) -> Result<Self, RequestError> {
        Ok(Self {
            prompt: sanitize_prompt(prompt)?,
            framework: Framework::default(),
            styling: Styling::default(),
            interactivity: Interactivity::default(),
            theme: Theme::default(),
        })
    }

    /// Build a request from loosely typed input (query strings, CLI args).
    /// `None` options take their defaults.
    pub fn from_parts(
        prompt: &str,
        framework: Option<&str>,
        styling: Option<&str>,
        interactivity: Option<&str>,
        theme: Option<&str>,
    ) -> Result<Self, RequestError> {
        Ok(Self {
            prompt: sanitize_prompt(prompt)?,
            framework: parse_or_default(framework)?,
            styling: parse_or_default(styling)?,
            interactivity: parse_or_default(interactivity)?,
            theme: parse_or_default(theme)?,
        })
    }

    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = framework;
        self
    }

    pub fn with_styling(mut self, styling: Styling) -> Self {
        self.styling = styling;
        self
    }

    pub fn with_interactivity(mut self, interactivity: Interactivity) -> Self {
        self.interactivity = interactivity;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Re-apply prompt sanitisation, e.g. after deserialising from an untrusted body.
    pub fn sanitized(mut self) -> Result<Self, RequestError> {
        self.prompt = sanitize_prompt(&self.prompt)?;
        Ok(self)
    }
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T, RequestError>
where
    T: FromStr<Err = RequestError> + Default,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value.parse(),
        None => Ok(T::default()),
    }
}

/// Trim, drop control characters (keeping newlines and tabs) and cap the length.
pub fn sanitize_prompt(prompt: &str) -> Result<String, RequestError> {
    let cleaned: String = prompt
        .trim()
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(MAX_PROMPT_CHARS)
        .collect();
    let cleaned = cleaned.trim_end().to_string();

    if cleaned.is_empty() {
        return Err(RequestError::EmptyPrompt);
    }
    Ok(cleaned)
}
