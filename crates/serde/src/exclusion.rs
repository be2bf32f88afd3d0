//! Group and version exclusion rules shared by properties and relations.

use std::cmp::Ordering;

use hateoas_support::Property;

use crate::context::SerializationContext;

/// Name of the group that members without explicit groups belong to.
pub const DEFAULT_GROUP: &str = "Default";

/// Whether a member declared with `declared` groups is visible when `active`
/// groups are requested. No active groups means no filtering.
pub fn groups_match(declared: Option<&[String]>, active: Option<&[String]>) -> bool {
    let Some(active) = active else {
        return true;
    };
    match declared {
        Some(declared) if !declared.is_empty() => {
            declared.iter().any(|group| active.contains(group))
        }
        _ => active.iter().any(|group| group == DEFAULT_GROUP),
    }
}

/// Compares dotted version strings numerically (`1.10 > 1.9`). Missing
/// segments count as zero; non-numeric segments compare as text.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let l = l.unwrap_or("0");
                let r = r.unwrap_or("0");
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Whether `version` lies within `[since, until]`. Without a version every
/// member is visible.
pub fn version_matches(version: Option<&str>, since: Option<&str>, until: Option<&str>) -> bool {
    let Some(version) = version else {
        return true;
    };
    if since.is_some_and(|since| compare_versions(version, since) == Ordering::Less) {
        return false;
    }
    if until.is_some_and(|until| compare_versions(version, until) == Ordering::Greater) {
        return false;
    }
    true
}

/// Whether a property is left out of the output for this context.
pub fn should_skip_property(property: &Property, context: &SerializationContext) -> bool {
    property.is_excluded()
        || !groups_match(property.group_list(), context.groups())
        || !version_matches(
            context.version(),
            property.since_version(),
            property.until_version(),
        )
}
