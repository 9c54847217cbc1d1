//! Model catalog
//!
//! Static per-provider descriptors. Only the id lists come from the
//! adapters; limits and prices are fixed here.

use super::adapters::GoogleModelInfo;
use super::providers::ProviderTag;
use super::types::ModelDescriptor;

/// Catalog limits and price for one family of models
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogDefaults {
    pub max_tokens: u32,
    pub cost_per_token: f64,
    pub supports_images: bool,
}

pub const OPENAI_DEFAULTS: CatalogDefaults = CatalogDefaults {
    max_tokens: 4000,
    cost_per_token: 0.00003,
    supports_images: false,
};

pub const CLAUDE_DEFAULTS: CatalogDefaults = CatalogDefaults {
    max_tokens: 200_000,
    cost_per_token: 0.000015,
    supports_images: false,
};

pub const GEMINI_MAX_TOKENS: u32 = 8192;

/// Per-model Gemini prices
pub const GEMINI_COSTS: &[(&str, f64)] = &[
    ("gemini-1.5-flash", 0.000001),
    ("gemini-1.5-pro", 0.000007),
];

impl ModelDescriptor {
    /// Descriptor for a static-list entry; the name is the id
    pub fn from_static(id: &str, provider: ProviderTag, defaults: CatalogDefaults) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            provider,
            max_tokens: defaults.max_tokens,
            cost_per_token: defaults.cost_per_token,
            supports_images: defaults.supports_images,
            supports_text: true,
        }
    }
}

fn gemini_descriptor(info: &GoogleModelInfo) -> ModelDescriptor {
    let cost = GEMINI_COSTS
        .iter()
        .find(|(id, _)| *id == info.id)
        .map(|(_, cost)| *cost)
        .unwrap_or(0.0);

    ModelDescriptor {
        id: info.id.clone(),
        name: info.name.clone(),
        provider: ProviderTag::Google,
        max_tokens: GEMINI_MAX_TOKENS,
        cost_per_token: cost,
        supports_images: info.supports_images,
        supports_text: info.supports_text,
    }
}

/// Assemble the catalog: OpenAI, then Claude, then Gemini
pub fn build_catalog(
    openai_ids: &[String],
    claude_ids: &[String],
    gemini: &[GoogleModelInfo],
) -> Vec<ModelDescriptor> {
    let openai = openai_ids
        .iter()
        .map(|id| ModelDescriptor::from_static(id, ProviderTag::OpenAI, OPENAI_DEFAULTS));
    let claude = claude_ids
        .iter()
        .map(|id| ModelDescriptor::from_static(id, ProviderTag::Claude, CLAUDE_DEFAULTS));
    let google = gemini.iter().map(gemini_descriptor);

    openai.chain(claude).chain(google).collect()
}
