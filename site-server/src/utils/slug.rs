//! Slug derivation for gallery category URLs

/// Derive a URL slug from a display name.
///
/// Lowercase, every run of non-alphanumeric characters collapses to a
/// single hyphen, no leading or trailing hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Live Music"), "live-music");
        assert_eq!(slugify("Beer & Food"), "beer-food");
    }

    #[test]
    fn collapses_runs_and_trims_edges() {
        assert_eq!(slugify("  Summer -- Terrace!  "), "summer-terrace");
        assert_eq!(slugify("___"), "");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("Oktoberfest 2024"), "oktoberfest-2024");
    }
}
