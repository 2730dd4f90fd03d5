//! ContentDirectory browsing and searching
//!
//! Browse and Search results are DIDL-Lite documents returned in the
//! `Result` output argument. Servers cap how many entries one call returns,
//! so directory listings and searches are fetched page by page until
//! `TotalMatches` entries have been seen.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::action::{ActionArgs, ActionResult, ServiceClient};
use crate::didl::DirContent;
use crate::service::Service;
use crate::transport::ActionTransport;
use crate::Result;

/// Paging and filtering used for Browse and Search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Entries requested per call
    pub page_size: u32,
    /// Metadata filter sent with every request
    pub filter: String,
    /// Sort criteria sent with every request, empty for server order
    pub sort_criteria: String,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            filter: "*".to_string(),
            sort_criteria: String::new(),
        }
    }
}

impl BrowseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// One page of a Browse or Search answer
struct Page {
    content: DirContent,
    returned: u32,
    total: u32,
}

impl Page {
    fn from_result(result: &ActionResult) -> Result<Self> {
        let didl = result.string("Result");
        let content = if didl.trim().is_empty() {
            DirContent::default()
        } else {
            DirContent::parse(&didl)?
        };
        Ok(Self {
            content,
            returned: u32::try_from(result.int("NumberReturned")).unwrap_or(0),
            total: u32::try_from(result.int("TotalMatches")).unwrap_or(0),
        })
    }
}

/// Control point for a media server's ContentDirectory
#[derive(Debug, Clone)]
pub struct ContentDirectoryService<T> {
    client: ServiceClient<T>,
    config: BrowseConfig,
}

impl<T: ActionTransport> ContentDirectoryService<T> {
    pub fn new(transport: T, control_url: impl Into<String>) -> Self {
        Self::with_config(transport, control_url, BrowseConfig::default())
    }

    pub fn with_config(transport: T, control_url: impl Into<String>, config: BrowseConfig) -> Self {
        Self {
            client: ServiceClient::new(transport, Service::ContentDirectory, control_url),
            config,
        }
    }

    pub fn config(&self) -> &BrowseConfig {
        &self.config
    }

    /// List the children of container `object_id` (`"0"` is the root)
    pub fn read_dir(&self, object_id: &str) -> Result<DirContent> {
        self.paged("Browse", |start, count| {
            ActionArgs::new()
                .string("ObjectID", object_id)
                .string("BrowseFlag", "BrowseDirectChildren")
                .string("Filter", self.config.filter.as_str())
                .int("StartingIndex", i64::from(start))
                .int("RequestedCount", i64::from(count))
                .string("SortCriteria", self.config.sort_criteria.as_str())
        })
    }

    /// Metadata of the object `object_id` itself
    pub fn get_metadata(&self, object_id: &str) -> Result<DirContent> {
        let args = ActionArgs::new()
            .string("ObjectID", object_id)
            .string("BrowseFlag", "BrowseMetadata")
            .string("Filter", self.config.filter.as_str())
            .int("StartingIndex", 0)
            .int("RequestedCount", 1)
            .string("SortCriteria", "");
        let result = self.client.invoke("Browse", args)?;
        Page::from_result(&result).map(|page| page.content)
    }

    /// Run a search below `container_id`
    ///
    /// `criteria` is passed through as given, e.g.
    /// `upnp:class derivedfrom "object.item.audioItem" and dc:title contains "blue"`.
    pub fn search(&self, container_id: &str, criteria: &str) -> Result<DirContent> {
        self.paged("Search", |start, count| {
            ActionArgs::new()
                .string("ContainerID", container_id)
                .string("SearchCriteria", criteria)
                .string("Filter", self.config.filter.as_str())
                .int("StartingIndex", i64::from(start))
                .int("RequestedCount", i64::from(count))
                .string("SortCriteria", self.config.sort_criteria.as_str())
        })
    }

    /// Property names the server accepts in search criteria
    ///
    /// An empty set means the server does not support searching.
    pub fn get_search_capabilities(&self) -> Result<BTreeSet<String>> {
        let result = self.client.invoke("GetSearchCapabilities", ActionArgs::new())?;
        Ok(result
            .string("SearchCaps")
            .split(',')
            .map(str::trim)
            .filter(|cap| !cap.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn paged<F>(&self, action: &str, make_args: F) -> Result<DirContent>
    where
        F: Fn(u32, u32) -> ActionArgs,
    {
        let mut content = DirContent::default();
        let mut start = 0u32;

        loop {
            let result = self.client.invoke(action, make_args(start, self.config.page_size))?;
            let page = Page::from_result(&result)?;
            debug!(action, start, returned = page.returned, total = page.total, "page received");

            content.containers.extend(page.content.containers);
            content.items.extend(page.content.items);

            if page.returned == 0 {
                if start < page.total {
                    warn!(action, start, total = page.total, "server returned an empty page early");
                }
                break;
            }
            start = start.saturating_add(page.returned);
            if start >= page.total {
                break;
            }
        }

        Ok(content)
    }
}
