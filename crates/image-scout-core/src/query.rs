//! Provider query composition.
//!
//! Builds the query string sent to the image-search provider: the product
//! name as a quoted phrase, optionally preceded by a free-text keyword and
//! scoped to one or more domains with `site:` restriction syntax.

/// Compose a provider query for `product_name` scoped to `domains`.
///
/// - no domains → `"name"`
/// - one domain → `site:d "name"`
/// - several → `(site:d1 OR site:d2 ...) "name"`
///
/// When `extra_keyword` is non-blank it is injected directly ahead of the
/// quoted name. Embedded double quotes in the product name are passed
/// through untouched: existing score fixtures depend on the exact bytes
/// this function produces.
pub fn build_query(product_name: &str, domains: &[String], extra_keyword: Option<&str>) -> String {
    let quoted = match extra_keyword {
        Some(kw) if !kw.trim().is_empty() => format!("{} \"{}\"", kw.trim(), product_name),
        _ => format!("\"{}\"", product_name),
    };

    match domains.len() {
        0 => quoted,
        1 => format!("site:{} {}", domains[0], quoted),
        _ => {
            let clause = domains
                .iter()
                .map(|d| format!("site:{}", d))
                .collect::<Vec<_>>()
                .join(" OR ");
            format!("({}) {}", clause, quoted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn no_domains_is_just_the_quoted_name() {
        assert_eq!(build_query("Widget Pro", &[], None), "\"Widget Pro\"");
    }

    #[test]
    fn single_domain_uses_site_prefix() {
        assert_eq!(
            build_query("Widget Pro", &domains(&["example.com"]), None),
            "site:example.com \"Widget Pro\""
        );
    }

    #[test]
    fn multiple_domains_build_an_or_clause() {
        assert_eq!(
            build_query("Widget", &domains(&["a.com", "b.com", "c.com"]), None),
            "(site:a.com OR site:b.com OR site:c.com) \"Widget\""
        );
    }

    #[test]
    fn extra_keyword_lands_ahead_of_the_quoted_name() {
        assert_eq!(
            build_query("Widget", &domains(&["a.com"]), Some("red")),
            "site:a.com red \"Widget\""
        );
        assert_eq!(build_query("Widget", &[], Some("  red  ")), "red \"Widget\"");
    }

    #[test]
    fn blank_keyword_is_ignored() {
        assert_eq!(build_query("Widget", &[], Some("   ")), "\"Widget\"");
    }

    #[test]
    fn embedded_quotes_pass_through_unescaped() {
        assert_eq!(build_query("15\" Monitor", &[], None), "\"15\" Monitor\"");
    }
}
