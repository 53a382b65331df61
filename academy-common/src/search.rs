//! Program search over an already-fetched catalog
//!
//! Case-insensitive substring match on name, slug, description, sport and age
//! range. Blank queries return the catalog unchanged; result order follows
//! the input.

use crate::api::types::Program;

/// Filter `programs` down to the ones matching `query`
///
/// # Examples
///
/// ```
/// use academy_common::api::types::Program;
/// use academy_common::search::filter_programs;
///
/// let program = |slug: &str, sport: &str| Program {
///     id: slug.to_string(),
///     slug: slug.to_string(),
///     name: slug.replace('-', " "),
///     description: String::new(),
///     price_cents: 1_000,
///     schedule: None,
///     age_range: None,
///     sport: Some(sport.to_string()),
///     active: true,
///     created_at: chrono::Utc::now(),
///     updated_at: chrono::Utc::now(),
/// };
/// let catalog = vec![program("skills-lab", "soccer"), program("speed-camp", "football")];
///
/// let found = filter_programs(&catalog, "FOOT");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].slug, "speed-camp");
/// assert_eq!(filter_programs(&catalog, "  ").len(), 2);
/// ```
pub fn filter_programs<'a>(programs: &'a [Program], query: &str) -> Vec<&'a Program> {
    let query = query.trim();
    programs
        .iter()
        .filter(|p| {
            let fields = [
                p.name.as_str(),
                p.slug.as_str(),
                p.description.as_str(),
                p.sport.as_deref().unwrap_or(""),
                p.age_range.as_deref().unwrap_or(""),
            ];
            matches_query(&fields, query)
        })
        .collect()
}

/// True when any field contains the query, ignoring case
///
/// ```
/// use academy_common::search::matches_query;
///
/// assert!(matches_query(&["Skills Lab", "fundamentals"], "LAB"));
/// assert!(!matches_query(&["Skills Lab"], "soccer"));
/// ```
pub fn matches_query(fields: &[&str], query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}
