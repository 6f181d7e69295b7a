use crate::models::{Client, Property, SearchFilters, SearchResults};

/// Queries shorter than this return nothing
const MIN_QUERY_LEN: usize = 2;

/// Check if a property matches a free-text query on title, area or city
#[inline]
pub fn property_matches_text(property: &Property, needle: &str) -> bool {
    property.title.to_lowercase().contains(needle)
        || property.location.area.to_lowercase().contains(needle)
        || property.location.city.to_lowercase().contains(needle)
}

/// Check if a client matches a free-text query on name (case-insensitive) or phone
#[inline]
pub fn client_matches_text(client: &Client, needle: &str, raw: &str) -> bool {
    client.name.to_lowercase().contains(needle) || client.phone.contains(raw)
}

/// Local quick search over a tenant's records
pub fn quick_search(query: &str, properties: &[Property], clients: &[Client]) -> SearchResults {
    let raw = query.trim();
    if raw.chars().count() < MIN_QUERY_LEN {
        return SearchResults::default();
    }
    let needle = raw.to_lowercase();

    SearchResults {
        properties: properties
            .iter()
            .filter(|p| property_matches_text(p, &needle))
            .cloned()
            .collect(),
        clients: clients
            .iter()
            .filter(|c| client_matches_text(c, &needle, raw))
            .cloned()
            .collect(),
    }
}

/// Check if a property satisfies every filter that is present
#[inline]
pub fn matches_filters(property: &Property, filters: &SearchFilters) -> bool {
    if let Some(bhk) = &filters.bhk {
        if !property.bhk.contains(bhk.as_str()) {
            return false;
        }
    }

    if let Some(city) = &filters.city {
        if !property.location.city.to_lowercase().contains(&city.to_lowercase()) {
            return false;
        }
    }

    if let Some(max_price) = filters.max_price {
        if property.price > max_price {
            return false;
        }
    }

    if let Some(transaction_type) = &filters.transaction_type {
        if !property
            .transaction_type
            .to_string()
            .to_lowercase()
            .contains(&transaction_type.to_lowercase())
        {
            return false;
        }
    }

    true
}

/// Apply structured filters
///
/// Properties must satisfy all present filters. Clients are only returned
/// when a client name filter is given and matches.
pub fn apply_filters(
    filters: &SearchFilters,
    properties: &[Property],
    clients: &[Client],
) -> SearchResults {
    let clients = match &filters.client_name {
        Some(name) if !name.trim().is_empty() => {
            let needle = name.trim().to_lowercase();
            clients
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
        _ => Vec::new(),
    };

    SearchResults {
        properties: properties
            .iter()
            .filter(|p| matches_filters(p, filters))
            .cloned()
            .collect(),
        clients,
    }
}
