//! Issue link extraction
//!
//! Finds references to other issues in free text (epic and theme bodies):
//!
//! - long links `https://<host>/<org>/<repo>/issues/<number>` yield `repo#number`
//! - short links `#<number>` yield `<current repo>#number`
//!
//! This is a best-effort heuristic. Any `#<digits>` in prose, a URL fragment
//! or a quoted diff counts as a reference; `#bookmark=...` does not, and the
//! number at the end of `/issues/346` is not picked up a second time.

use crate::issue_ref::IssueRef;
use gh_janitor_client::DEFAULT_HOST;
use regex::Regex;
use std::sync::OnceLock;

fn short_link_regex() -> &'static Regex {
    static SHORT_LINK: OnceLock<Regex> = OnceLock::new();
    SHORT_LINK.get_or_init(|| Regex::new(r"#([0-9]+)").unwrap())
}

/// Extracts issue references for one organization
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    long_link: Regex,
}

impl LinkExtractor {
    /// Build an extractor matching long links on `host` for `org`
    pub fn new(host: &str, org: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"https://{}/{}/([^/]+)/issues/([0-9]+)",
            regex::escape(host),
            regex::escape(org)
        );
        Ok(Self {
            long_link: Regex::new(&pattern)?,
        })
    }

    /// All issue references in `body`
    ///
    /// Long links come first, then short links, each group in document
    /// order. Duplicates are kept and nothing is validated against the API.
    pub fn extract(&self, body: &str, current_repo: &str) -> Vec<IssueRef> {
        let long_links = self.long_link.captures_iter(body).filter_map(|caps| {
            let repo = caps.get(1)?.as_str();
            let number = caps.get(2)?.as_str().parse().ok()?;
            Some(IssueRef::new(repo, number))
        });

        let short_links = short_link_regex().captures_iter(body).filter_map(|caps| {
            let number = caps.get(1)?.as_str().parse().ok()?;
            Some(IssueRef::new(current_repo, number))
        });

        long_links.chain(short_links).collect()
    }
}

/// Extract issue references from `body` for `org` on github.com
pub fn extract_issue_links(body: &str, org: &str, current_repo: &str) -> Vec<IssueRef> {
    match LinkExtractor::new(DEFAULT_HOST, org) {
        Ok(extractor) => extractor.extract(body, current_repo),
        Err(e) => {
            log::warn!("Can't build link pattern for org {:?}: {}", org, e);
            Vec::new()
        }
    }
}
