use application::SearchRequest;
use domain::Document;
use tracing::trace;

/// Checks whether a document satisfies a search request.
///
/// Present criteria are OR-combined into a single accumulator that starts at
/// `false`: the document matches as soon as any one criterion holds. Absent
/// criteria (and empty lists) contribute nothing, so a request without
/// criteria matches no document. A document missing the field a criterion
/// looks at (title, content, author, created) fails that criterion.
pub fn matches(document: &Document, request: &SearchRequest) -> bool {
    let mut matched = false;

    // Title prefixes
    if let Some(prefixes) = request.title_prefixes() {
        matched |= document
            .title()
            .is_some_and(|title| prefixes.iter().any(|prefix| title.starts_with(prefix.as_str())));
    }

    // Content substrings
    if let Some(needles) = request.contains_contents() {
        matched |= document
            .content()
            .is_some_and(|content| needles.iter().any(|needle| content.contains(needle.as_str())));
    }

    // Author ids
    if let Some(author_ids) = request.author_ids() {
        matched |= document
            .author()
            .is_some_and(|author| author_ids.iter().any(|id| id == author.id()));
    }

    // Created bounds, both inclusive
    if let (Some(from), Some(created)) = (request.created_from, document.created()) {
        matched |= created >= from;
    }
    if let (Some(to), Some(created)) = (request.created_to, document.created()) {
        matched |= created <= to;
    }

    trace!(doc_id = %document.id(), matched, "Evaluated search criteria");
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use domain::{Author, Timestamp};

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn report() -> Document {
        Document::new()
            .with_id("a")
            .with_title("Report2023")
            .with_content("quarterly numbers")
            .with_created(at(10))
    }

    fn other() -> Document {
        Document::new()
            .with_id("b")
            .with_title("Other")
            .with_author(Author::new("u1", "Ann"))
            .with_created(at(10))
    }

    #[test]
    fn unconstrained_request_matches_nothing() {
        assert!(!matches(&report(), &SearchRequest::new()));
        assert!(!matches(&Document::new(), &SearchRequest::new()));
    }

    #[test]
    fn empty_lists_do_not_match() {
        let request = SearchRequest::new()
            .with_title_prefixes(Vec::<String>::new())
            .with_author_ids(Vec::<String>::new());
        assert!(!matches(&report(), &request));
    }

    #[test]
    fn title_prefix_match_is_case_sensitive() {
        let request = SearchRequest::new().with_title_prefixes(["Report"]);
        assert!(matches(&report(), &request));

        let lowercase = Document::new().with_id("c").with_title("report");
        assert!(!matches(&lowercase, &request));
    }

    #[test]
    fn any_listed_prefix_is_enough() {
        let request = SearchRequest::new().with_title_prefixes(["Memo", "Rep"]);
        assert!(matches(&report(), &request));
        assert!(!matches(&other(), &request));
    }

    #[test]
    fn content_substring_match_is_case_sensitive() {
        assert!(matches(
            &report(),
            &SearchRequest::new().with_contains_contents(["numbers"])
        ));
        assert!(!matches(
            &report(),
            &SearchRequest::new().with_contains_contents(["Numbers"])
        ));
    }

    #[test]
    fn missing_fields_never_match_their_criterion() {
        let bare = Document::new().with_id("bare");
        let request = SearchRequest::new()
            .with_title_prefixes([""])
            .with_contains_contents([""])
            .with_author_ids(["u1"])
            .with_created_from(at(1))
            .with_created_to(at(30));
        assert!(!matches(&bare, &request));
    }

    #[test]
    fn author_id_must_be_listed() {
        assert!(matches(&other(), &SearchRequest::new().with_author_ids(["u2", "u1"])));
        assert!(!matches(&other(), &SearchRequest::new().with_author_ids(["U1"])));
        assert!(!matches(&report(), &SearchRequest::new().with_author_ids(["u1"])));
    }

    #[test]
    fn created_bounds_are_inclusive() {
        let doc = report();
        let created = at(10);

        assert!(matches(&doc, &SearchRequest::new().with_created_from(created)));
        assert!(matches(&doc, &SearchRequest::new().with_created_to(created)));
        assert!(!matches(
            &doc,
            &SearchRequest::new().with_created_from(created + Duration::seconds(1))
        ));
        assert!(!matches(
            &doc,
            &SearchRequest::new().with_created_to(created - Duration::seconds(1))
        ));
    }

    #[test]
    fn criteria_are_or_combined() {
        let request = SearchRequest::new()
            .with_title_prefixes(["Report"])
            .with_author_ids(["u1"]);

        // Each document fails one criterion but satisfies the other.
        assert!(matches(&report(), &request));
        assert!(matches(&other(), &request));
    }

    #[test]
    fn disjoint_date_window_still_matches_through_either_bound() {
        // from > to: under OR, a document before `to` or after `from` matches.
        let request = SearchRequest::new()
            .with_created_from(at(20))
            .with_created_to(at(5));

        assert!(!matches(&report(), &request));
        assert!(matches(&report().with_created(at(25)), &request));
        assert!(matches(&report().with_created(at(2)), &request));
    }
}
