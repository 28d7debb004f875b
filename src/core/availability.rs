use crate::models::{AvailabilityWindow, Offer};

/// Check if a single availability window covers an offer
///
/// The window must start no later than the offer and end no earlier than it,
/// and at least one of its place labels must appear in the offer address.
/// Containment is one-way: the label is searched inside the address, never
/// the address inside the label.
#[inline]
pub fn matches(window: &AvailabilityWindow, offer: &Offer) -> bool {
    matches_address(window, offer.start, offer.end, &offer.address_line().to_lowercase())
}

/// Check if any of a candidate's windows covers the offer
///
/// An empty window list never matches.
#[inline]
pub fn is_eligible(windows: &[AvailabilityWindow], offer: &Offer) -> bool {
    let address = offer.address_line().to_lowercase();
    windows
        .iter()
        .any(|window| matches_address(window, offer.start, offer.end, &address))
}

#[inline]
fn matches_address(
    window: &AvailabilityWindow,
    offer_start: chrono::DateTime<chrono::Utc>,
    offer_end: chrono::DateTime<chrono::Utc>,
    lowered_address: &str,
) -> bool {
    if window.start > offer_start || window.end < offer_end {
        return false;
    }

    window
        .places
        .iter()
        .any(|place| lowered_address.contains(&place.to_lowercase()))
}
