use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow};
use std::str::FromStr;
use super::UnknownVariant;

macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                let folded = wanted.to_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().to_lowercase() == folded)
                    .ok_or_else(|| UnknownVariant::new($kind, wanted))
            }
        }
    };
}

labelled_enum!(ProviderCategory, "category", {
    Food => "Alimento",
    AutoTransport => "Autos y transporte",
    Beauty => "Belleza",
    RealEstate => "Bienes Raíces",
    Wellness => "Bienestar",
    HomeDecor => "Casa y Decoración",
    Emergencies => "Emergencias",
    Entertainment => "Entretenimiento / Parques",
    SchoolsClasses => "Escuelas y clases",
    Parties => "Fiestas",
    PhotoPrintDesign => "Fotografía/Impresiones/Diseñadores",
    Pets => "Mascotas",
    Doctors => "Médicos",
    Environment => "Medio Ambiente",
    Trades => "Oficios",
    Paperwork => "Trámites y servicios",
});

labelled_enum!(ProviderZone, "zone", {
    Bucerias => "Bucerías",
    NuevoVallarta => "Nuevo Vallarta",
    PuertoVallarta => "Puerto Vallarta",
    PuntaMita => "Punta Mita",
    Mezcales => "Mezcales",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub zone: Option<String>,
    pub phone: Option<String>,
    pub tags: Json<Vec<String>>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable listing fields, already validated and normalized.
#[derive(Debug, Clone, Default)]
pub struct ProviderDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<ProviderCategory>,
    pub zone: Option<ProviderZone>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub address: Option<String>,
}

impl Provider {
    /// Listings always start inactive until an admin activates them.
    pub fn new(draft: ProviderDraft, created_by: String) -> Self {
        let now = Utc::now();
        let mut provider = Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            description: None,
            category: None,
            zone: None,
            phone: None,
            tags: Json(Vec::new()),
            website: None,
            facebook: None,
            instagram: None,
            address: None,
            is_active: false,
            created_by,
            created_at: now,
            updated_at: now,
        };
        provider.apply(draft);
        provider
    }

    pub fn apply(&mut self, draft: ProviderDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.category = draft.category.map(|c| c.label().to_string());
        self.zone = draft.zone.map(|z| z.label().to_string());
        self.phone = draft.phone;
        self.tags = Json(draft.tags);
        self.website = draft.website;
        self.facebook = draft.facebook;
        self.instagram = draft.instagram;
        self.address = draft.address;
        self.updated_at = Utc::now();
    }

    pub fn has_all_tags(&self, wanted: &[String]) -> bool {
        wanted.iter().all(|t| self.tags.0.contains(t))
    }

    /// `needle` must already be lower-cased.
    pub fn mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.as_deref().is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// Trims, lower-cases and de-duplicates tags, keeping first-seen order.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct ProviderFilter {
    pub active_only: bool,
    pub created_by: Option<String>,
    pub query: Option<String>,
    pub category: Option<ProviderCategory>,
    pub zone: Option<ProviderZone>,
    pub tags: Vec<String>,
}

impl ProviderFilter {
    /// Lower-cased search term, `None` when blank.
    pub fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Text and tag criteria. Folding is done here rather than in SQL since
    /// SQLite's `LOWER`/`LIKE` only know ASCII.
    pub fn admits(&self, provider: &Provider) -> bool {
        let text_ok = match self.needle() {
            Some(needle) => provider.mentions(&needle),
            None => true,
        };
        text_ok && provider.has_all_tags(&self.tags)
    }
}
