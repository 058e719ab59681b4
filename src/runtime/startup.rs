use tokio::runtime::Runtime;

use crate::app::CatalogSource;
use crate::config::LibrarySettings;
use crate::library::{Catalog, scan};
use crate::mood::HttpMoodService;

/// Fetch the catalog from the service, falling back to the local library
/// and finally to an empty catalog.
pub fn load_catalog(
    runtime: &Runtime,
    service: &HttpMoodService,
    library: &LibrarySettings,
) -> (Catalog, CatalogSource) {
    match runtime.block_on(service.fetch_catalog()) {
        Ok(catalog) => return (catalog, CatalogSource::Service),
        Err(e) => log::warn!("catalog fetch from {} failed: {e}", service.base()),
    }

    let Some(dir) = library.dir.as_deref() else {
        log::info!("no local library configured; starting with an empty catalog");
        return (Catalog::new(), CatalogSource::Empty);
    };

    let catalog = scan(dir, library);
    if catalog.is_empty() {
        log::warn!("no playable files under {}", dir.display());
        (catalog, CatalogSource::Empty)
    } else {
        log::info!("loaded {} tracks from {}", catalog.len(), dir.display());
        (catalog, CatalogSource::LocalLibrary)
    }
}
