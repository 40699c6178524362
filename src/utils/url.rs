//! URL 工具
//!
//! `registrable_domain` 是唯一的"同站"判断依据：子链接过滤和 primary 邮箱分类都用它。
//! 邮箱的域名部分必须与可注册域名完全相同（见 `is_primary_email_domain`），子域名邮箱不算 primary。

use url::Url;

/// 不会产生可导航链接的 href
const SKIPPED_PREFIXES: [&str; 3] = ["mailto:", "tel:", "javascript:"];

/// 取主机名的可注册域名
///
/// 默认取最后两段；当倒数第二段长度 ≤ 2 且总段数 > 3 时取最后三段（处理 `co.uk` 一类后缀）。
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    let len = labels.len();

    if len > 2 {
        if labels[len - 2].len() <= 2 && len > 3 {
            return labels[len - 3..].join(".");
        }
        return labels[len - 2..].join(".");
    }

    host
}

/// 取 URL 的可注册域名，无法解析或没有主机名时返回 None
pub fn registrable_domain_of_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(registrable_domain)
}

/// 邮箱域名部分是否属于页面所在站点
///
/// `page_registrable` 是页面主机名的可注册域名；邮箱域名与它相同，
/// 或与它的最后两段相同时返回 true。子域名邮箱（如 `mail.example.com`）返回 false。
pub fn is_primary_email_domain(email_domain: &str, page_registrable: &str) -> bool {
    let email_domain = email_domain.trim_end_matches('.');
    email_domain.eq_ignore_ascii_case(page_registrable)
        || email_domain.eq_ignore_ascii_case(last_two_labels(page_registrable))
}

fn last_two_labels(domain: &str) -> &str {
    match domain.rmatch_indices('.').nth(1) {
        Some((idx, _)) => &domain[idx + 1..],
        None => domain,
    }
}

/// 把 href 规范化为绝对的 http(s) URL
///
/// 无法解析、锚点、mailto/tel/javascript 以及非 http(s) 协议都返回 None。
pub fn normalize_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href == "#" {
        return None;
    }
    let lower = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return None;
    }

    let resolved = if lower.starts_with("http://") || lower.starts_with("https://") {
        Url::parse(href).ok()?
    } else if href.starts_with("//") {
        Url::parse(&format!("https:{}", href)).ok()?
    } else {
        base.join(href).ok()?
    };

    is_http(&resolved).then_some(resolved)
}

pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// 给裸域名补上 `https://`
pub fn with_default_scheme(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrable_domain() {
        assert_eq!(registrable_domain("www.example.com"), "example.com");
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("foo.bar.co.uk"), "bar.co.uk");
        assert_eq!(registrable_domain("www.festival.co.uk"), "festival.co.uk");
        assert_eq!(registrable_domain("localhost"), "localhost");
        assert_eq!(registrable_domain("WWW.Example.COM."), "example.com");
    }

    #[test]
    fn test_registrable_domain_is_idempotent() {
        for host in ["a.b.example.com", "foo.bar.co.uk", "example.org"] {
            let once = registrable_domain(host);
            assert_eq!(registrable_domain(&once), once, "host: {}", host);
        }
    }

    #[test]
    fn test_three_labels_with_short_second_label_keeps_two() {
        // 只有三段时不触发三段规则
        assert_eq!(registrable_domain("example.co.uk"), "co.uk");
    }

    #[test]
    fn test_primary_email_domain_is_exact() {
        assert!(is_primary_email_domain("example.com", "example.com"));
        assert!(is_primary_email_domain("Example.COM", "example.com"));
        assert!(!is_primary_email_domain("mail.example.com", "example.com"));
        assert!(!is_primary_email_domain("example.org", "example.com"));

        assert!(is_primary_email_domain("festival.co.uk", "festival.co.uk"));
        assert!(!is_primary_email_domain("rival-agency.co.uk", "festival.co.uk"));
        assert_eq!(last_two_labels("festival.co.uk"), "co.uk");
        assert_eq!(last_two_labels("localhost"), "localhost");
    }

    #[test]
    fn test_normalize_url() {
        let base = Url::parse("https://example.com/festival/").unwrap();

        let cases = [
            ("/apply", Some("https://example.com/apply")),
            ("bands", Some("https://example.com/festival/bands")),
            ("../kontakt", Some("https://example.com/kontakt")),
            ("//example.com/bands", Some("https://example.com/bands")),
            ("http://example.com/x", Some("http://example.com/x")),
            ("HTTPS://Example.com/Y", Some("https://example.com/Y")),
            ("", None),
            ("#", None),
            ("mailto:a@b.com", None),
            ("tel:+41123", None),
            ("javascript:void(0)", None),
            ("ftp://example.com/file", None),
        ];

        for (href, expected) in cases {
            let got = normalize_url(&base, href).map(|u| u.to_string());
            assert_eq!(got.as_deref(), expected, "href: {}", href);
        }
    }

    #[test]
    fn test_with_default_scheme() {
        assert_eq!(with_default_scheme("example.com"), "https://example.com");
        assert_eq!(with_default_scheme("http://example.com"), "http://example.com");
    }
}
