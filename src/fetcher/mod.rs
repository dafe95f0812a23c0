pub mod http_fetcher;

pub use http_fetcher::{
    extension_for, extension_from_content_type, extension_from_url, FetchedResource, HttpFetcher,
    ResourceFetcher, DEFAULT_EXTENSION,
};
