//! Display-ready values derived from a CSL item.
//!
//! Every function here is total: a missing or oddly shaped field yields
//! `None` (or an empty string for authors) rather than an error.

use chrono::Month;
use serde_json::Value;

use crate::models::{CslItem, CONTRIBUTOR_ROLES};

/// Default character budget for [`authors_text`]
pub const DEFAULT_AUTHORS_MAX_LENGTH: usize = 100;

/// Marker appended when the author list is cut short
pub const ET_AL: &str = "et al";

/// Venue-like fields, most specific first
pub const JOURNAL_KEYS: &[&str] = &[
    "container-title",
    "container-title-short",
    "publisher",
    "event",
    "collection-title",
];

pub const TITLE_KEYS: &[&str] = &["title", "title-short"];

/// Value of the first key present in the item.
///
/// The first present key wins even when its value is unusable.
fn first_present<'a>(item: &'a CslItem, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| item.get(key))
}

/// Strings as-is; arrays give their first string element.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(values) => values.iter().find_map(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Journal or other venue name
pub fn journal(item: &CslItem) -> Option<String> {
    first_present(item, JOURNAL_KEYS).and_then(value_text)
}

pub fn title(item: &CslItem) -> Option<String> {
    first_present(item, TITLE_KEYS).and_then(value_text)
}

/// Comma-separated family names, such as
/// `Ching, Himmelstein, Beaulieu-Jones, Kalinin, Do, Way, et al`.
///
/// Contributors come from the first role present in [`CONTRIBUTOR_ROLES`].
/// A contributor without a family name falls back to its literal name and is
/// skipped when it has neither. Once adding the next name would push the
/// text past `max_length` characters, "et al" is appended in its place and
/// the list ends; names are never cut. The result is at most `max_length`
/// plus the width of "et al".
pub fn authors_text(item: &CslItem, max_length: usize) -> String {
    let contributors = match first_present(item, CONTRIBUTOR_ROLES) {
        Some(Value::Array(contributors)) => contributors.as_slice(),
        _ => &[],
    };

    let names: Vec<&str> = contributors
        .iter()
        .filter_map(|contributor| {
            contributor
                .get("family")
                .and_then(Value::as_str)
                .or_else(|| contributor.get("literal").and_then(Value::as_str))
        })
        .collect();

    let mut text = String::new();
    let mut text_len = 0;
    for (index, name) in names.iter().enumerate() {
        if !text.is_empty() {
            text.push_str(", ");
            text_len += 2;
        }
        let name_len = name.chars().count();
        let more_names = index + 1 < names.len();
        // A name ending within two characters of the budget guarantees the
        // next one overflows, and ", et al" after it would pass the bound.
        if name_len + text_len > max_length
            || (more_names && name_len + text_len + 2 > max_length)
        {
            text.push_str(ET_AL);
            break;
        }
        text.push_str(name);
        text_len += name_len;
    }
    text
}

/// Integer value of a date part given as a number or a numeric string
fn date_part(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Issue date in ISO-like form: `2019`, `2019-05` or `2019-05-01`
pub fn date_iso(item: &CslItem) -> Option<String> {
    let parts = item
        .get("issued")?
        .get("date-parts")?
        .as_array()?
        .first()?
        .as_array()?;

    if parts.is_empty() {
        return None;
    }

    let parts = parts
        .iter()
        .map(|part| date_part(part).map(|n| format!("{n:02}")))
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("-"))
}

/// Issue date for display: `2019` or `Jun 2019`
pub fn date_human(item: &CslItem) -> Option<String> {
    let date = date_iso(item)?;
    let mut parts = date.split('-').map(|part| part.parse::<i64>().ok());
    let year = parts.next()??;
    let month = parts
        .next()
        .flatten()
        .and_then(|month| u8::try_from(month).ok())
        .and_then(|month| Month::try_from(month).ok());

    Some(match month {
        Some(month) => format!("{} {}", &month.name()[..3], year),
        None => year.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> CslItem {
        CslItem::from(value.as_object().unwrap().clone())
    }

    fn people(families: &[&str]) -> Value {
        Value::Array(
            families
                .iter()
                .map(|family| json!({"family": family, "given": "A."}))
                .collect(),
        )
    }

    #[test]
    fn test_journal_preference_order() {
        let csl = item(json!({
            "publisher": "Cold Spring Harbor Laboratory",
            "container-title-short": "bioRxiv",
            "event": "ISMB"
        }));
        assert_eq!(journal(&csl).as_deref(), Some("bioRxiv"));

        let csl = item(json!({"container-title": ["PLOS Computational Biology"]}));
        assert_eq!(journal(&csl).as_deref(), Some("PLOS Computational Biology"));

        assert_eq!(journal(&item(json!({"title": "T"}))), None);
    }

    #[test]
    fn test_title() {
        assert_eq!(title(&item(json!({"title-short": "Short"}))).as_deref(), Some("Short"));
        assert_eq!(
            title(&item(json!({"title-short": "Short", "title": "Long"}))).as_deref(),
            Some("Long")
        );
        assert_eq!(title(&item(json!({"container-title": "J"}))), None);
    }

    #[test]
    fn test_authors_single_author() {
        let csl = item(json!({"author": [{"family": "Smith"}]}));
        assert_eq!(authors_text(&csl, DEFAULT_AUTHORS_MAX_LENGTH), "Smith");
    }

    #[test]
    fn test_authors_literal_and_skip() {
        let csl = item(json!({"author": [
            {"family": "Himmelstein"},
            {"given": "Nobody"},
            {"literal": "The Sci-Hub Consortium"}
        ]}));
        assert_eq!(authors_text(&csl, 100), "Himmelstein, The Sci-Hub Consortium");
    }

    #[test]
    fn test_authors_role_preference() {
        let csl = item(json!({
            "translator": [{"family": "Later"}],
            "editor": [{"family": "Earlier"}]
        }));
        assert_eq!(authors_text(&csl, 100), "Earlier");
        assert_eq!(authors_text(&item(json!({"title": "T"})), 100), "");
    }

    #[test]
    fn test_authors_et_al() {
        let csl = item(json!({"author": people(&[
            "Ching", "Himmelstein", "Beaulieu-Jones", "Kalinin", "Do", "Way", "Ferrero",
            "Agapow", "Zietz", "Hoffman", "Xie", "Rosen", "Lengerich", "Israeli",
        ])}));
        assert_eq!(
            authors_text(&csl, 100),
            "Ching, Himmelstein, Beaulieu-Jones, Kalinin, Do, Way, Ferrero, Agapow, \
             Zietz, Hoffman, Xie, Rosen, et al"
        );
    }

    #[test]
    fn test_authors_length_bound() {
        let names: Vec<String> = (0..40).map(|i| format!("Author{i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let csl = item(json!({ "author": people(&refs) }));

        for max_length in [0, 7, 18, 20, 33, 100] {
            let text = authors_text(&csl, max_length);
            assert!(text.ends_with(ET_AL), "{text:?}");
            assert!(text.chars().count() <= max_length + ET_AL.len(), "{text:?}");
        }
        assert_eq!(authors_text(&csl, 18), "Author00, et al");
    }

    #[test]
    fn test_date_iso() {
        let date = |parts: Value| date_iso(&item(json!({"issued": {"date-parts": [parts]}})));
        assert_eq!(date(json!([2019])).as_deref(), Some("2019"));
        assert_eq!(date(json!([2019, 5])).as_deref(), Some("2019-05"));
        assert_eq!(date(json!([2019, 5, 1])).as_deref(), Some("2019-05-01"));
        assert_eq!(date(json!(["2019", "11"])).as_deref(), Some("2019-11"));
        assert_eq!(date(json!([2019, "May"])), None);
        assert_eq!(date(json!([])), None);
    }

    #[test]
    fn test_date_iso_structural_errors() {
        assert_eq!(date_iso(&item(json!({"title": "T"}))), None);
        assert_eq!(date_iso(&item(json!({"issued": {"raw": "2019"}}))), None);
        assert_eq!(date_iso(&item(json!({"issued": {"date-parts": []}}))), None);
        assert_eq!(date_iso(&item(json!({"issued": {"date-parts": 2019}}))), None);
    }

    #[test]
    fn test_date_human() {
        let human = |parts: Value| date_human(&item(json!({"issued": {"date-parts": [parts]}})));
        assert_eq!(human(json!([2019])).as_deref(), Some("2019"));
        assert_eq!(human(json!([2019, 5])).as_deref(), Some("May 2019"));
        assert_eq!(human(json!([2020, 3, 17])).as_deref(), Some("Mar 2020"));
        assert_eq!(human(json!([2019, 9])).as_deref(), Some("Sep 2019"));
        assert_eq!(human(json!([2019, 0])).as_deref(), Some("2019"));
        assert_eq!(date_human(&item(json!({"title": "T"}))), None);
    }
}
