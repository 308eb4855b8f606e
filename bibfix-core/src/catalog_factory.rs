use crate::catalog::CatalogClient;
use crate::catalog_http::HttpCatalog;
use crate::error::Result;

pub enum Backend {
    Http,
}

#[derive(Clone, Debug)]
pub struct CatalogParams {
    pub base_url: String,
    pub token: Option<String>,
}

pub fn open_catalog(backend: Backend, p: CatalogParams) -> Result<Box<dyn CatalogClient>> {
    match backend {
        Backend::Http => Ok(Box::new(HttpCatalog::new(&p.base_url, p.token)?)),
    }
}
