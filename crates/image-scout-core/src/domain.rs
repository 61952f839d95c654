//! Allowed-domain matching for candidate source hosts.
//!
//! A candidate is considered in-scope when the hostname of its source page
//! equals an allowed domain exactly or sits under it as a proper subdomain.
//! Matching is case-insensitive and iterates the allowed list in
//! caller-supplied order, returning the first hit — when domains overlap
//! (`["example.com", "shop.example.com"]`), the earlier entry wins. Callers
//! that need a different precedence must order the list accordingly.

use url::Url;

/// Return the first allowed domain that `host` satisfies, lowercased.
///
/// `host` matches a domain `d` iff `host == d` or `host` ends with `"." + d`;
/// a bare suffix like `notexample.com` vs `example.com` never matches.
/// Returns `None` for an empty host, an empty allowed list, or no match.
pub fn match_host(host: &str, allowed: &[String]) -> Option<String> {
    let host = host.to_lowercase();
    if host.is_empty() {
        return None;
    }
    for d in allowed {
        let domain = d.to_lowercase();
        if host == domain || host.ends_with(&format!(".{}", domain)) {
            return Some(domain);
        }
    }
    None
}

/// Lowercased hostname of `raw`, or an empty string when the URL does not
/// parse or carries no host. Downstream treats an empty host as a non-match.
pub fn host_of(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn exact_and_subdomain_match() {
        let allowed = domains(&["example.com"]);
        assert_eq!(match_host("example.com", &allowed), Some("example.com".into()));
        assert_eq!(match_host("shop.example.com", &allowed), Some("example.com".into()));
    }

    #[test]
    fn bare_suffix_does_not_match() {
        let allowed = domains(&["example.com"]);
        assert_eq!(match_host("notexample.com", &allowed), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let allowed = domains(&["Example.COM"]);
        assert_eq!(match_host("SHOP.example.com", &allowed), Some("example.com".into()));
    }

    #[test]
    fn first_match_wins_on_overlapping_domains() {
        let allowed = domains(&["example.com", "shop.example.com"]);
        assert_eq!(match_host("shop.example.com", &allowed), Some("example.com".into()));
    }

    #[test]
    fn empty_inputs_never_match() {
        assert_eq!(match_host("", &domains(&["example.com"])), None);
        assert_eq!(match_host("example.com", &[]), None);
    }

    #[test]
    fn host_of_extracts_lowercased_hostname() {
        assert_eq!(host_of("https://Shop.Example.com/product/1"), "shop.example.com");
        assert_eq!(host_of("http://example.com"), "example.com");
    }

    #[test]
    fn host_of_unparsable_is_empty() {
        assert_eq!(host_of("not a url"), "");
        assert_eq!(host_of(""), "");
    }
}
