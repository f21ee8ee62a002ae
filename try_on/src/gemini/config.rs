pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_VARIABLES: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
const MODEL_VARIABLE: &str = "GEMINI_MODEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}
impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Native builds read the environment at startup.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Web builds have no environment, the values are baked in at build time.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| {
            let value = match name {
                "GEMINI_API_KEY" => option_env!("GEMINI_API_KEY"),
                "API_KEY" => option_env!("API_KEY"),
                "GEMINI_MODEL" => option_env!("GEMINI_MODEL"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let api_key = API_KEY_VARIABLES.iter().find_map(|name| non_empty(name));
        if api_key.is_none() {
            log::warn!("No Gemini API key found, set GEMINI_API_KEY");
        }
        let mut config = Self {
            api_key,
            ..Default::default()
        };
        if let Some(model) = non_empty(MODEL_VARIABLE) {
            config.model = model;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}
