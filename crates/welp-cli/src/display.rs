//! Plain-text rendering of the headless map and list.

use rust_decimal::Decimal;
use welp_search::{MarkerKind, MemorySurface, RecentSearches, ResultSet, ViewSynchronizer};

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// The result list, the map state and any open popup.
pub(crate) fn render_results(results: &ResultSet, view: &ViewSynchronizer<MemorySurface>) -> String {
    let surface = view.surface();
    if surface.no_results_shown() {
        return "No restaurants found within your budget.\n".to_string();
    }

    let mut lines = Vec::new();
    for (index, result) in results.iter().enumerate() {
        lines.push(format!("{:>2}. {}", index + 1, result.name));
        lines.push(format!("    {}", result.address));
        lines.push(format!(
            "    {} per person, rating {}",
            money(result.cost_for_one()),
            result.rating.as_deref().unwrap_or("n/a")
        ));
    }

    if let Some(me) = surface
        .markers()
        .find(|marker| marker.kind == MarkerKind::UserPosition)
    {
        lines.push(format!("You are at {}", me.position));
    }
    if let (Some(center), Some(zoom)) = (surface.center(), surface.zoom()) {
        lines.push(format!("Map centered on {center} at zoom {zoom}"));
    }
    for popup in surface.open_popups() {
        lines.push(format!(
            "[{}] {} (rating {})",
            popup.title,
            popup.description,
            popup.rating.as_deref().unwrap_or("n/a")
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub(crate) fn render_recent(recent: &RecentSearches) -> String {
    if recent.is_empty() {
        return "No recent searches.\n".to_string();
    }
    recent
        .labels()
        .iter()
        .enumerate()
        .map(|(index, label)| format!("{:>2}. {label}\n", index + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use welp_core::{Coordinate, FilteredResult};
    use welp_search::ViewEvent;

    use super::*;

    fn results() -> ResultSet {
        vec![
            FilteredResult {
                name: "Taco Stand".to_string(),
                address: "1 Main St".to_string(),
                coordinate: Coordinate::new(30.1, -97.1),
                average_cost_for_two: Decimal::from(15),
                rating: Some("4.2".to_string()),
            },
            FilteredResult {
                name: "Noodle Bar".to_string(),
                address: "2 Oak Ave".to_string(),
                coordinate: Coordinate::new(30.2, -97.2),
                average_cost_for_two: Decimal::from(20),
                rating: None,
            },
        ]
        .into()
    }

    #[test]
    fn lists_results_with_cost_for_one() {
        let results = results();
        let mut view = ViewSynchronizer::new(MemorySurface::default());
        view.render(&results, None);

        let text = render_results(&results, &view);

        assert!(text.contains(" 1. Taco Stand"));
        assert!(text.contains("$7.50 per person, rating 4.2"));
        assert!(text.contains(" 2. Noodle Bar"));
        assert!(text.contains("$10.00 per person, rating n/a"));
        assert!(text.contains("Map centered on 30.10000,-97.10000 at zoom 11.5"));
        assert!(!text.contains("You are at"));
    }

    #[test]
    fn shows_user_position_and_open_popup() {
        let results = results();
        let mut view = ViewSynchronizer::new(MemorySurface::default());
        view.render(&results, Some(Coordinate::new(30.5, -97.5)));
        view.handle(ViewEvent::RowClick(1)).unwrap();

        let text = render_results(&results, &view);

        assert!(text.contains("You are at 30.50000,-97.50000"));
        assert!(text.contains("[Noodle Bar] 2 Oak Ave (rating n/a)"));
    }

    #[test]
    fn empty_results_print_message() {
        let mut view = ViewSynchronizer::new(MemorySurface::default());
        view.render(&ResultSet::empty(), None);
        assert_eq!(
            render_results(&ResultSet::empty(), &view),
            "No restaurants found within your budget.\n"
        );
    }

    #[test]
    fn empty_history_prints_message() {
        assert_eq!(render_recent(&RecentSearches::new()), "No recent searches.\n");
    }
}
