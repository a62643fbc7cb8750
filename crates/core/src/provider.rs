/// Endpoint configuration for the hosted completion service.
///
/// The Puter driver endpoint wraps an OpenAI-style chat completion behind a
/// generic `drivers/call` envelope, so the interface/driver/method triple is
/// part of the request body rather than the URL.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_url: &'static str,
    pub interface: &'static str,
    pub driver: &'static str,
    pub method: &'static str,
    pub model: &'static str,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.puter.com/drivers/call",
            interface: "puter-chat-completion",
            driver: "openai-completion",
            method: "complete",
            model: "gpt-4o-mini",
        }
    }
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        "Puter"
    }
}
