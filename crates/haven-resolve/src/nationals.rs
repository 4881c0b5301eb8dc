//! Compiled-in national resource catalogs.
//!
//! One fixed list per supported country. These are the floor under every
//! response: even in full degraded mode a caller always receives at least the
//! national resources, never an empty list.

use haven_core::postal::Country;

use crate::types::{NationalResource, ResourceKind};

struct CatalogEntry {
    name: &'static str,
    description: &'static str,
    website: &'static str,
    phone: &'static str,
}

const US_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "988 Suicide & Crisis Lifeline",
        description: "24/7 call, text, and chat support for people in suicidal \
                      crisis or emotional distress.",
        website: "https://988lifeline.org",
        phone: "988",
    },
    CatalogEntry {
        name: "Crisis Text Line",
        description: "Free 24/7 text-based support with a trained volunteer \
                      crisis counselor.",
        website: "https://www.crisistextline.org",
        phone: "Text HOME to 741741",
    },
    CatalogEntry {
        name: "SAMHSA National Helpline",
        description: "Free, confidential treatment referral and information \
                      service for mental health and substance use.",
        website: "https://www.samhsa.gov/find-help/national-helpline",
        phone: "1-800-662-4357",
    },
    CatalogEntry {
        name: "NAMI HelpLine",
        description: "Information, resource referrals, and support for people \
                      affected by mental illness.",
        website: "https://www.nami.org/help",
        phone: "1-800-950-6264",
    },
];

const CA_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "9-8-8 Suicide Crisis Helpline",
        description: "24/7 bilingual call and text support for anyone in \
                      Canada thinking about suicide.",
        website: "https://988.ca",
        phone: "988",
    },
    CatalogEntry {
        name: "Kids Help Phone",
        description: "24/7 support for young people by phone, text, and chat.",
        website: "https://kidshelpphone.ca",
        phone: "1-800-668-6868",
    },
    CatalogEntry {
        name: "Wellness Together Canada",
        description: "Free mental health and substance use support, including \
                      counselling sessions.",
        website: "https://www.wellnesstogether.ca",
        phone: "1-866-585-0445",
    },
];

/// The always-available resources for `country`.
#[must_use]
pub fn nationals_for(country: Country) -> Vec<NationalResource> {
    let catalog = match country {
        Country::Us => US_CATALOG,
        Country::Ca => CA_CATALOG,
    };
    catalog
        .iter()
        .map(|entry| NationalResource {
            name: entry.name.to_owned(),
            description: entry.description.to_owned(),
            website: entry.website.to_owned(),
            phone: entry.phone.to_owned(),
            kind: ResourceKind::National,
        })
        .collect()
}
