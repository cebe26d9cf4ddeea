//! Which navigations stay inside the chat web view

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    OpenExternally,
    Block,
}

#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    allowed_hosts: Vec<String>,
    open_external: bool,
}

impl NavigationPolicy {
    pub fn new<I, S>(allowed_hosts: I, open_external: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_hosts = allowed_hosts
            .into_iter()
            .map(|host| host.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();
        Self {
            allowed_hosts,
            open_external,
        }
    }

    pub fn decide(&self, url: &Url) -> NavigationDecision {
        match url.scheme() {
            "about" | "data" | "blob" => NavigationDecision::Allow,
            "http" | "https" => {
                let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
                if self.is_allowed_host(&host) {
                    NavigationDecision::Allow
                } else {
                    self.external()
                }
            }
            "mailto" => self.external(),
            _ => NavigationDecision::Block,
        }
    }

    fn external(&self) -> NavigationDecision {
        if self.open_external {
            NavigationDecision::OpenExternally
        } else {
            NavigationDecision::Block
        }
    }

    fn is_allowed_host(&self, host: &str) -> bool {
        self.allowed_hosts.iter().any(|allowed| {
            host == allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}
