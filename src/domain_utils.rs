/// Address and URL host helpers shared by the analyzers.
pub struct DomainUtils;

impl DomainUtils {
    /// Domain part of an address: everything after the last `@`.
    /// An address without `@` has an empty domain.
    pub fn extract_domain(address: &str) -> &str {
        match address.rfind('@') {
            Some(at) => &address[at + 1..],
            None => "",
        }
    }

    /// Network location of a URL: the text between `scheme://` and the
    /// first `/`, `?` or `#`. Userinfo and port are kept as written.
    pub fn url_host(url: &str) -> &str {
        let rest = match url.find("://") {
            Some(idx) => &url[idx + 3..],
            None => return "",
        };
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        &rest[..end]
    }

    /// Number of `.` separators in a host.
    pub fn dot_count(host: &str) -> usize {
        host.matches('.').count()
    }
}
