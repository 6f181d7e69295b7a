use crate::models::{
    Client, FurnishingStatus, MaritalStatus, MatchResult, Property, ScoreBreakdown, ScoringWeights,
};

/// Calculate a match score (0-100) for a property against a client
///
/// Scoring formula (canonical weights):
/// score = min(100,
///     budget         # 30 in range, 20 under the floor, 0 over the ceiling
///   + area           # 25 on area/city match, 10 otherwise
///   + bhk            # 15 when the configuration is accepted
///   + furnishing     # 10 when accepted or the client takes Any
///   + lifestyle      # 10 for married clients or bachelor-friendly listings
///   + availability   # 10 when the transaction type matches the requirement
/// )
///
/// Every dimension that loses points pushes one reason, in the order above.
pub fn calculate_match_score(
    property: &Property,
    client: &Client,
    weights: &ScoringWeights,
) -> MatchResult {
    let mut reasons = Vec::new();
    let mut breakdown = ScoreBreakdown::default();

    let (budget, reason) =
        budget_score(property.price, client.budget_min, client.budget_max, weights);
    breakdown.budget = budget;
    reasons.extend(reason);

    let (area, reason) = area_score(property, client, weights);
    breakdown.area = area;
    reasons.extend(reason);

    let (bhk, reason) = bhk_score(property, client, weights);
    breakdown.bhk = bhk;
    reasons.extend(reason);

    let (furnishing, reason) = furnishing_score(property, client, weights);
    breakdown.furnishing = furnishing;
    reasons.extend(reason);

    let (lifestyle, reason) = lifestyle_score(property, client, weights);
    breakdown.lifestyle = lifestyle;
    reasons.extend(reason);

    let (availability, reason) = availability_score(property, client, weights);
    breakdown.availability = availability;
    reasons.extend(reason);

    MatchResult {
        property_id: property.id.clone(),
        client_id: client.id.clone(),
        score: breakdown.total().min(100),
        breakdown,
        reasons,
    }
}

/// Budget score
/// A zero ceiling means the client never set a budget, so nothing can be judged against it.
#[inline]
fn budget_score(
    price: u64,
    budget_min: u64,
    budget_max: u64,
    weights: &ScoringWeights,
) -> (u32, Option<String>) {
    if budget_max == 0 {
        return (0, Some("Client budget is not set".to_string()));
    }

    if price > budget_max {
        return (
            0,
            Some(format!("Price is ₹{} above max budget.", price - budget_max)),
        );
    }

    if price < budget_min {
        return (
            weights.under_budget,
            Some(format!("Price is ₹{} below the budget floor.", budget_min - price)),
        );
    }

    (weights.budget, None)
}

/// Area score
/// Full credit when any preferred area occurs in the listing's area, or the city matches.
#[inline]
fn area_score(
    property: &Property,
    client: &Client,
    weights: &ScoringWeights,
) -> (u32, Option<String>) {
    let area = property.location.area.trim().to_lowercase();

    let area_match = client
        .preferred_areas
        .iter()
        .map(|preferred| preferred.trim().to_lowercase())
        .filter(|preferred| !preferred.is_empty())
        .any(|preferred| area.contains(&preferred));

    let preferred_city = client.preferred_city.trim();
    let city_match = !preferred_city.is_empty()
        && property.location.city.trim().to_lowercase() == preferred_city.to_lowercase();

    if area_match || city_match {
        (weights.area, None)
    } else {
        (
            weights.area_fallback,
            Some(format!(
                "Different city/area: {}, {}",
                property.location.area, property.location.city
            )),
        )
    }
}

#[inline]
fn bhk_score(
    property: &Property,
    client: &Client,
    weights: &ScoringWeights,
) -> (u32, Option<String>) {
    if client.bhk_preference.iter().any(|bhk| *bhk == property.bhk) {
        return (weights.bhk, None);
    }

    let preferred = if client.bhk_preference.is_empty() {
        "none".to_string()
    } else {
        client.bhk_preference.join("/")
    };

    (0, Some(format!("{} vs preferred {}", property.bhk, preferred)))
}

#[inline]
fn furnishing_score(
    property: &Property,
    client: &Client,
    weights: &ScoringWeights,
) -> (u32, Option<String>) {
    let accepted = client
        .furnishing_preference
        .iter()
        .any(|f| *f == property.furnishing || *f == FurnishingStatus::Any);

    if accepted {
        (weights.furnishing, None)
    } else {
        (0, Some(format!("{} furnishing not preferred", property.furnishing)))
    }
}

#[inline]
fn lifestyle_score(
    property: &Property,
    client: &Client,
    weights: &ScoringWeights,
) -> (u32, Option<String>) {
    match client.marital_status {
        MaritalStatus::Married => (weights.lifestyle, None),
        MaritalStatus::Bachelor if property.bachelors_allowed => (weights.lifestyle, None),
        MaritalStatus::Bachelor => (0, Some("Bachelors not allowed".to_string())),
    }
}

#[inline]
fn availability_score(
    property: &Property,
    client: &Client,
    weights: &ScoringWeights,
) -> (u32, Option<String>) {
    if property.transaction_type == client.requirement {
        (weights.availability, None)
    } else {
        (
            0,
            Some(format!(
                "Listed for {}, client wants {}",
                property.transaction_type, client.requirement
            )),
        )
    }
}
