//! Package list filtering: id search plus a status selector

use crate::models::{Package, PackageStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PackageStatus),
}

impl StatusFilter {
    /// All -> each active status in order -> All
    pub fn next(&self) -> StatusFilter {
        let mut active = PackageStatus::active();
        match self {
            StatusFilter::All => active.next().map(StatusFilter::Only).unwrap_or(StatusFilter::All),
            StatusFilter::Only(current) => active
                .skip_while(|s| s != current)
                .nth(1)
                .map(StatusFilter::Only)
                .unwrap_or(StatusFilter::All),
        }
    }

    pub fn label(&self) -> String {
        match self {
            StatusFilter::All => "All".to_string(),
            StatusFilter::Only(status) => status.label(),
        }
    }

    fn matches(&self, status: PackageStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackageFilter {
    pub search: String,
    pub status: StatusFilter,
}

impl PackageFilter {
    pub fn matches(&self, package: &Package) -> bool {
        let needle = self.search.trim().to_lowercase();
        let id_matches = needle.is_empty() || package.package_id.to_lowercase().contains(&needle);
        id_matches && self.status.matches(package.current_status)
    }

    pub fn apply<'a>(&self, packages: &'a [Package]) -> Vec<&'a Package> {
        packages.iter().filter(|p| self.matches(p)).collect()
    }
}
