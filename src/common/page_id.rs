//! Page and tenant identifier types.

use std::fmt;
use std::hash::Hash;

/// Identifies a virtual page in a single-process trace.
///
/// Using `u32` allows for 4 billion distinct pages, far more than any
/// synthetic or recorded trace needs.
///
/// # Example
/// ```
/// use pagesim::PageId;
///
/// let page_id = PageId::new(42);
/// assert_eq!(page_id.0, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Create a new PageId.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a simulated process in a multi-tenant trace.
///
/// Tenant ids are 1-based, matching the way generated traces number them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantId(pub u32);

impl TenantId {
    /// Create a new TenantId.
    #[inline]
    pub fn new(id: u32) -> Self {
        TenantId(id)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A page reference tagged with the tenant that issued it.
///
/// Under global allocation the pair itself is the page key, so page 5 of
/// tenant 1 and page 5 of tenant 2 occupy different frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantPage {
    pub tenant: TenantId,
    pub page: PageId,
}

impl TenantPage {
    /// Create a new tenant-tagged page reference.
    #[inline]
    pub fn new(tenant: u32, page: u32) -> Self {
        TenantPage {
            tenant: TenantId(tenant),
            page: PageId(page),
        }
    }
}

impl fmt::Display for TenantPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.tenant.0, self.page.0)
    }
}

/// Anything a replacement policy can keep resident.
///
/// Policies only need identity (equality + hashing); `Display` is used by
/// reports and log lines.
pub trait PageKey: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send {}

impl<T> PageKey for T where T: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send {}
