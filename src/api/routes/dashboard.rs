use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::Html;
use tracing::{debug, warn};

use crate::api::render::{page, SectionView};
use crate::api::state::{AppState, Dataset};
use crate::parse::DocumentIndex;
use crate::table::{plot_choices, roster_chart, roster_table};

/// Build the view of one source from `{source}_match` / `{source}_plot`.
pub fn section_view(dataset: &Dataset, params: &HashMap<String, String>) -> SectionView {
    let source = dataset.source.as_str();
    let options = dataset.match_options();
    let index = DocumentIndex::new(&dataset.document);

    let requested = params.get(&format!("{}_match", source));
    let selected_match = requested
        .filter(|id| index.find_match(id).is_some())
        .cloned()
        .or_else(|| options.first().map(|o| o.value.clone()));

    let mut view = SectionView {
        source: dataset.source,
        title: dataset.title.clone(),
        options,
        selected_match: selected_match.clone(),
        plot_choices: Vec::new(),
        selected_plot: None,
        table: None,
        chart: None,
    };

    let Some(match_id) = selected_match else {
        return view;
    };
    debug!("Rendering {} match {}", source, match_id);

    let (choices, default_plot) = plot_choices(&index, &match_id);
    let selected_plot = params
        .get(&format!("{}_plot", source))
        .cloned()
        .or(default_plot);

    view.table = Some(roster_table(&index, &match_id));
    view.chart = selected_plot.as_ref().map(|stat| {
        roster_chart(&index, &match_id, stat).map_err(|e| {
            warn!("Plot for {} match {} failed: {}", source, match_id, e);
            e.to_string()
        })
    });
    view.plot_choices = choices;
    view.selected_plot = selected_plot;
    view
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let sections: Vec<SectionView> = state
        .datasets
        .iter()
        .map(|dataset| section_view(dataset, &params))
        .collect();
    Html(page(&sections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::render::{NO_MATCH_SELECTED, PAGE_TITLE, PLOT_FAILED};
    use crate::api::state::Source;
    use crate::api::test_support::{get_body, test_state};
    use crate::parse::fixtures::two_match_document;
    use axum::http::StatusCode;

    fn demo() -> Dataset {
        Dataset::new(Source::Demo, "demo", two_match_document())
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_match_selected_by_default() {
        let view = section_view(&demo(), &HashMap::new());

        assert_eq!(view.selected_match.as_deref(), Some("m1"));
        assert_eq!(view.selected_plot.as_deref(), Some("gold"));
        assert_eq!(view.table.as_ref().unwrap().len(), 2);
        assert!(matches!(view.chart, Some(Ok(_))));
    }

    #[test]
    fn test_unknown_match_falls_back_to_first() {
        let view = section_view(&demo(), &params(&[("demo_match", "zzz")]));
        assert_eq!(view.selected_match.as_deref(), Some("m1"));
    }

    #[test]
    fn test_match_without_numeric_stats_has_no_plot() {
        let view = section_view(&demo(), &params(&[("demo_match", "m2")]));

        assert_eq!(view.selected_match.as_deref(), Some("m2"));
        assert!(view.plot_choices.is_empty());
        assert!(view.chart.is_none());
    }

    #[test]
    fn test_bad_plot_type_is_reported_not_fatal() {
        let view = section_view(
            &demo(),
            &params(&[("demo_match", "m1"), ("demo_plot", "side")]),
        );

        assert!(matches!(view.chart, Some(Err(_))));
        assert!(view.table.is_some());
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let app = build_router(test_state());
        let (status, body) = get_body(app, "/?demo_match=m1&demo_plot=heroKills").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(PAGE_TITLE));
        assert!(body.contains("<option value=\"m1\" selected>1: m1</option>"));
        assert!(body.contains("value=\"heroKills\" checked"));
        assert!(body.contains("<th>gold</th>"));
        assert!(body.contains("<svg"));
        // The API section has no matches.
        assert!(body.contains(NO_MATCH_SELECTED));
    }

    #[tokio::test]
    async fn test_dashboard_plot_failure_message() {
        let app = build_router(test_state());
        let (status, body) = get_body(app, "/?demo_plot=side").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(PLOT_FAILED));
        assert!(body.contains("<table>"));
    }
}
