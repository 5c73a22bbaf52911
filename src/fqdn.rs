/// Expands a record-name key into the fully-qualified name inside `domain`.
///
/// `@` stands for the zone apex. A key that already ends with `domain` is
/// returned untouched; anything else gets `.domain` appended. Matching is a
/// plain byte suffix check, so case and trailing dots are not normalized.
pub fn resolve_fqdn(key: &str, domain: &str) -> String {
    if key == "@" {
        return domain.to_string();
    }

    if key.ends_with(domain) {
        key.to_string()
    } else {
        format!("{}.{}", key, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_key_resolves_to_domain() {
        assert_eq!(resolve_fqdn("@", "example.com"), "example.com");
        assert_eq!(resolve_fqdn("@", "sub.example.org"), "sub.example.org");
    }

    #[test]
    fn key_with_domain_suffix_is_unchanged() {
        assert_eq!(resolve_fqdn("www.example.com", "example.com"), "www.example.com");
        assert_eq!(resolve_fqdn("example.com", "example.com"), "example.com");
    }

    #[test]
    fn bare_key_gets_domain_appended() {
        assert_eq!(resolve_fqdn("www", "example.com"), "www.example.com");
        assert_eq!(resolve_fqdn("a.b", "example.com"), "a.b.example.com");
    }

    #[test]
    fn suffix_check_is_literal() {
        // No label boundary check: "myexample.com" already ends with "example.com".
        assert_eq!(resolve_fqdn("myexample.com", "example.com"), "myexample.com");
        // No case folding or trailing-dot handling.
        assert_eq!(resolve_fqdn("WWW.EXAMPLE.COM", "example.com"), "WWW.EXAMPLE.COM.example.com");
        assert_eq!(resolve_fqdn("www.example.com.", "example.com"), "www.example.com..example.com");
    }
}
